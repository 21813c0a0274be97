//! File and folder feed.
//!
//! A single file is read whole and normalised. A folder contributes every
//! regular `.log`, `.txt`, `.text` and `.json` file directly inside it (no
//! recursion), in file-name order. Each folder file is normalised on its own,
//! so a JSON envelope in one file does not swallow its neighbours, and its
//! records take the file name as their `source`.

use std::path::{Path, PathBuf};

use logsieve_core::{normalizer, LogRecord};

use crate::{Feed, FeedError};

const LOG_EXTENSIONS: &[&str] = &["log", "txt", "text", "json"];

const BOM: char = '\u{FEFF}';

pub struct FileFeed {
    path: PathBuf,
    /// Case-sensitive substring a folder file name must contain.
    name_pattern: Option<String>,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name_pattern: None,
        }
    }

    /// Only read folder files whose name contains `pattern`. An empty
    /// pattern keeps every file. Ignored for a single file.
    pub fn with_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        self.name_pattern = (!pattern.is_empty()).then_some(pattern);
        self
    }

    /// Files this feed will read, in order.
    pub fn files(&self) -> Result<Vec<PathBuf>, FeedError> {
        if !self.path.is_dir() {
            return Ok(vec![self.path.clone()]);
        }

        let entries =
            std::fs::read_dir(&self.path).map_err(|e| FeedError::io(&self.path, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| FeedError::io(&self.path, e))?.path();
            if path.is_file() && self.name_matches(&path) && has_log_extension(&path) {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    fn name_matches(&self, path: &Path) -> bool {
        let Some(pattern) = &self.name_pattern else {
            return true;
        };
        file_name(path).contains(pattern.as_str())
    }

    fn read_folder(&self) -> Result<Vec<LogRecord>, FeedError> {
        let files = self.files()?;
        Ok(self.read_folder_files(&files))
    }

    /// Files that cannot be read are logged and skipped.
    fn read_folder_files(&self, files: &[PathBuf]) -> Vec<LogRecord> {
        let mut records = Vec::new();
        let mut read = 0usize;
        for path in files {
            let text = match read_lossy(path) {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(%err, "file: skipping unreadable file");
                    continue;
                }
            };
            let source = file_name(path);
            let parsed = normalizer::parse(&text);
            tracing::debug!(path = %path.display(), records = parsed.len(), "file: parsed");
            records.extend(parsed.into_iter().map(|record| record.with_source(source.clone())));
            read += 1;
        }
        tracing::debug!(folder = %self.path.display(), files = read, records = records.len(), "file: folder drained");
        records
    }
}

impl Feed for FileFeed {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn read_records(&mut self) -> Result<Vec<LogRecord>, FeedError> {
        if self.path.is_dir() {
            return self.read_folder();
        }
        let text = read_lossy(&self.path)?;
        Ok(normalizer::parse(&text))
    }
}

fn has_log_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| LOG_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read a file as text, replacing invalid UTF-8 rather than failing.
pub(crate) fn read_lossy(path: &Path) -> Result<String, FeedError> {
    let bytes = std::fs::read(path).map_err(|e| FeedError::io(path, e))?;
    Ok(decode_text(&bytes))
}

/// Lossy UTF-8 decode with a leading byte-order mark removed.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => text.into_owned(),
    }
}
