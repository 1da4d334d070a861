//! JSON file output handler

use super::traits::{CrawlOutput, OutputHandler, OutputResult};
use crate::OutputError;
use std::path::{Path, PathBuf};

/// Writes the crawl result as pretty-printed JSON to a file
///
/// The file is created or truncated on every write.
#[derive(Debug, Clone)]
pub struct JsonFileOutput {
    path: PathBuf,
}

impl JsonFileOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> OutputError {
        OutputError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl OutputHandler for JsonFileOutput {
    fn write(&self, output: &CrawlOutput) -> OutputResult<()> {
        let json = output.to_json_pretty()?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))?;

        tracing::info!(
            "Wrote {} URLs to {}",
            output.len(),
            self.path.display()
        );
        Ok(())
    }
}
