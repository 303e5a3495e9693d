// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes the result rows to stdout, or to `path` when an output file was
/// requested.
///
/// Rows are fully materialized before this is called, so no output file is
/// touched until results exist. File output goes through a temporary file in
/// the destination directory which is renamed over the target on success;
/// the destination is never left half-written, and the confirmation notice
/// on the diagnostic stream is only printed after the rename.
pub fn write_results(rows: &[String], path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => write_file(rows, path),
        None => write_stream(rows, &mut io::stdout().lock()),
    }
}

fn write_stream<W: Write>(rows: &[String], writer: &mut W) -> Result<()> {
    for row in rows {
        writeln!(writer, "{row}")?;
    }
    writer.flush()?;
    Ok(())
}

fn write_file(rows: &[String], path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("cannot create output file in '{}'", dir.display()))?;
    write_stream(rows, staged.as_file_mut())
        .with_context(|| format!("cannot write '{}'", path.display()))?;
    staged
        .persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("cannot write '{}'", path.display()))?;

    eprintln!("[logsift] results written to '{}'", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn rows(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_stream_rows_are_newline_terminated() {
        let mut out = Vec::new();
        write_stream(&rows(&["COUNT IP", "2 10.0.0.1"]), &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "COUNT IP\n2 10.0.0.1\n");
    }

    #[test]
    fn test_empty_results_write_nothing() {
        let mut out = Vec::new();
        write_stream(&[], &mut out).unwrap();

        assert!(out.is_empty());
    }

    #[test]
    fn test_file_output_contains_exactly_the_rows() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("report.txt");

        write_file(&rows(&["3 ERROR", "1 CRITICAL"]), &target).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "3 ERROR\n1 CRITICAL\n");
    }

    #[test]
    fn test_file_output_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("report.txt");
        fs::write(&target, "stale results from an earlier run\n").unwrap();

        write_file(&rows(&["1 ERROR"]), &target).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "1 ERROR\n");
    }

    #[test]
    fn test_unwritable_destination_fails_without_touching_it() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("no-such-subdir").join("report.txt");

        let result = write_file(&rows(&["1 ERROR"]), &target);

        assert!(result.is_err());
        assert!(!target.exists());
    }
}
