//! Live output adapters backed by a file or stdout.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use crate::ports::output::{OutputResource, OutputStream};

/// Writes the cassette to a file, created on first open.
#[derive(Debug, Clone)]
pub struct FileOutput {
    path: PathBuf,
}

impl FileOutput {
    /// Creates an output for `path`. The file is not touched until opened.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputResource for FileOutput {
    fn open(&self) -> io::Result<OutputStream> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Writes the cassette to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutOutput;

impl OutputResource for StdoutOutput {
    fn open(&self) -> io::Result<OutputStream> {
        Ok(Box::new(io::stdout()))
    }

    fn describe(&self) -> String {
        "<stdout>".to_string()
    }
}
