use crate::analyzer::{Analyze, ModeAnalyzer};
use anyhow::Result;
use std::io::{BufRead, BufReader, Read};

pub struct StreamProcessor<R: Read> {
    reader: BufReader<R>,
    analyzer: ModeAnalyzer,
}

impl<R: Read> StreamProcessor<R> {
    pub fn new(reader: R, analyzer: ModeAnalyzer) -> Self {
        Self {
            reader: BufReader::new(reader),
            analyzer,
        }
    }

    /// Feed the stream line by line until EOF, then collect the active
    /// mode's result rows. A final line without a trailing newline is still
    /// processed.
    pub fn process(mut self) -> Result<Vec<String>> {
        let mut line = String::new();

        while self.reader.read_line(&mut line)? > 0 {
            // Remove trailing newline if present
            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }

            self.analyzer.consume_line(&line);
            line.clear();
        }

        Ok(self.analyzer.finish())
    }
}
