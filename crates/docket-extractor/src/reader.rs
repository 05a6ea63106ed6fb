//! Source discovery, decoding and markup normalisation

use crate::error::ExtractorError;
use docket_domain::TextCleaner;
use scraper::{Html, Node};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Elements whose text never reaches the output
const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Recursively list files under `dir` with one of `extensions`
///
/// Extensions match case-insensitively. The result is sorted by path.
pub fn discover(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, ExtractorError> {
    if !dir.is_dir() {
        return Err(ExtractorError::MissingDirectory(dir.to_path_buf()));
    }

    let wanted: Vec<String> = extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    let mut files = Vec::new();
    walk(dir, &wanted, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, wanted: &[String], files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            walk(&path, wanted, files)?;
        } else if file_type.is_file() && has_extension(&path, wanted) {
            files.push(path);
        }
    }
    Ok(())
}

fn has_extension(path: &Path, wanted: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| wanted.iter().any(|w| w.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Document id of a source file: its file name
pub fn document_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Read a file as UTF-8, falling back to Latin-1
pub fn read_document(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(decode(bytes))
}

fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        },
        // Every byte is a valid Latin-1 code point
        Err(err) => err.into_bytes().iter().map(|&b| char::from(b)).collect(),
    }
}

/// Collapse every whitespace run to one space and trim
pub fn collapse_whitespace(input: &str) -> String {
    let mut buf = String::with_capacity(input.len());
    let mut last_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !last_space && !buf.is_empty() {
                buf.push(' ');
            }
            last_space = true;
        } else {
            buf.push(ch);
            last_space = false;
        }
    }
    buf.trim_end().to_string()
}

/// HTML/XML to plain text
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupCleaner;

impl MarkupCleaner {
    fn is_skipped(node: &scraper::node::Element) -> bool {
        SKIPPED_ELEMENTS
            .iter()
            .any(|name| node.name().eq_ignore_ascii_case(name))
    }
}

impl TextCleaner for MarkupCleaner {
    fn clean(&self, markup: &str) -> String {
        if !markup.contains('<') {
            return collapse_whitespace(markup);
        }

        let document = Html::parse_document(markup);
        let mut raw = String::with_capacity(markup.len() / 2);
        for node in document.tree.root().descendants() {
            let Node::Text(text) = node.value() else {
                continue;
            };
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(MarkupCleaner::is_skipped)
            });
            if !hidden {
                raw.push_str(text);
                raw.push(' ');
            }
        }
        collapse_whitespace(&raw)
    }
}
