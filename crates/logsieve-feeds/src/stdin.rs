//! Stdin feed: reads until EOF, then normalises the whole blob.

use std::io::Read;

use logsieve_core::{normalizer, LogRecord};

use crate::{Feed, FeedError};

pub struct StdinFeed<R = std::io::Stdin> {
    reader: R,
}

impl StdinFeed {
    pub fn new() -> Self {
        Self {
            reader: std::io::stdin(),
        }
    }
}

impl Default for StdinFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Read> StdinFeed<R> {
    /// Any reader standing in for stdin.
    pub fn from_reader(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> Feed for StdinFeed<R> {
    fn name(&self) -> String {
        "stdin".to_string()
    }

    fn read_records(&mut self) -> Result<Vec<LogRecord>, FeedError> {
        let mut bytes = Vec::new();
        self.reader
            .read_to_end(&mut bytes)
            .map_err(FeedError::Stdin)?;
        let text = crate::file::decode_text(&bytes);
        Ok(normalizer::parse(&text))
    }
}
