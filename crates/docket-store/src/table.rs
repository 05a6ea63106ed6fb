//! Shared access to append-only CSV tables
//!
//! An interrupted write can leave the last record short or inside an open
//! quoted field. Readers are therefore flexible about record length, and
//! the first append of a store closes any partial tail so new rows start
//! on a fresh line.

use crate::Result;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::warn;

/// Open a reader that yields short records instead of failing on them
pub(crate) fn open_reader(path: &Path) -> Result<csv::Reader<File>> {
    Ok(csv::ReaderBuilder::new().flexible(true).from_path(path)?)
}

/// Terminate a record left unfinished at the end of `path`
///
/// Returns whether anything was written. Quotes inside quoted fields are
/// doubled, so an odd quote count means the tail is inside an open field.
pub(crate) fn seal_tail(path: &Path) -> Result<bool> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    let Some(&last) = bytes.last() else {
        return Ok(false);
    };

    let open_quote = bytes.iter().filter(|&&b| b == b'"').count() % 2 == 1;
    if !open_quote && last == b'\n' {
        return Ok(false);
    }

    let mut file = OpenOptions::new().append(true).open(path)?;
    if open_quote {
        file.write_all(b"\"")?;
    }
    file.write_all(b"\n")?;
    file.flush()?;

    warn!(path = %path.display(), "Closed a partial record left by an interrupted write");
    Ok(true)
}
