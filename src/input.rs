use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

/// Opens the resolved input sources as one byte stream.
///
/// Named files are concatenated in the order they were given. With no files,
/// standard input is the sole source; when it is an interactive terminal a
/// one-line prompt goes to the diagnostic stream before the read blocks.
pub fn open(files: &[PathBuf]) -> Result<Box<dyn Read>> {
    if files.is_empty() {
        if io::stdin().is_terminal() {
            eprintln!("reading from STDIN... Ctrl+D to end");
        }
        return Ok(Box::new(io::stdin()));
    }

    let mut reader: Box<dyn Read> = Box::new(io::empty());
    for path in files {
        let file =
            File::open(path).with_context(|| format!("cannot open '{}'", path.display()))?;
        reader = Box::new(reader.chain(file));
    }
    Ok(reader)
}
