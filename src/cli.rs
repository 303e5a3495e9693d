use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UsageError {
    #[error("no such file: '{0}'")]
    MissingFile(String),
    #[error("not a regular file: '{0}'")]
    NotRegularFile(String),
    #[error("the grep pattern must not be empty")]
    EmptyPattern,
}

/// Ad-hoc log analysis - count severities, rank IPv4 addresses, filter lines
///
/// Reads the given files in order, or standard input when no files are
/// given, and runs exactly one of the three analysis modes over the stream.
#[derive(Parser, Debug)]
#[command(version)]
pub struct LogsiftArgs {
    /// Count ERROR/CRITICAL occurrences (the default mode)
    #[arg(long, group = "mode")]
    pub errors: bool,

    /// Extract IPv4 addresses and rank them by occurrence count
    #[arg(long, group = "mode")]
    pub ips: bool,

    /// Select lines matching a regex pattern
    #[arg(short = 'e', long = "grep", value_name = "REGEX", group = "mode")]
    pub grep: Option<String>,

    /// Read from FILE instead of stdin; repeatable, files are concatenated
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Keep only the top N ranked rows (ips mode)
    #[arg(short = 't', long = "top", value_name = "N")]
    pub top: Option<usize>,

    /// Write results to OUTFILE instead of stdout, overwriting it
    #[arg(short = 'o', long = "output", value_name = "OUTFILE")]
    pub output: Option<PathBuf>,

    /// Match case-insensitively
    #[arg(short = 'i', long = "ignore-case")]
    pub ignore_case: bool,

    /// Deduplicate and sort matching lines (grep mode)
    #[arg(short = 'u', long = "unique")]
    pub unique: bool,
}

impl LogsiftArgs {
    /// Post-parse validation. Everything rejected here is a usage error and
    /// must fail before any input is read.
    pub fn validate(&self) -> Result<(), UsageError> {
        for path in &self.files {
            if !path.exists() {
                return Err(UsageError::MissingFile(path.display().to_string()));
            }
            if !path.is_file() {
                return Err(UsageError::NotRegularFile(path.display().to_string()));
            }
        }

        if matches!(self.grep.as_deref(), Some("")) {
            return Err(UsageError::EmptyPattern);
        }

        Ok(())
    }
}
