//! Docket CLI library.
//!
//! Argument parsing, configuration loading, pipeline wiring and report
//! formatting for the `docket` binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;

pub use cli::{Cli, DocTypeArg, Mode};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
