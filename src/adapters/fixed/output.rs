//! In-memory output shared between the writer and its owner.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crate::ports::output::{OutputResource, OutputStream};

/// Collects cassette bytes in a shared buffer.
///
/// Clones share the same buffer, so a caller can hand one clone to a
/// writer and read the document back through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryOutput {
    buffer: Arc<Mutex<Vec<u8>>>,
    opens: Arc<Mutex<usize>>,
}

impl MemoryOutput {
    /// Creates an empty output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, decoded lossily as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// How many times the output has been opened.
    #[must_use]
    pub fn open_count(&self) -> usize {
        *self.opens.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OutputResource for MemoryOutput {
    fn open(&self) -> io::Result<OutputStream> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner).clear();
        *self.opens.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(Box::new(MemoryStream { buffer: Arc::clone(&self.buffer) }))
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

struct MemoryStream {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_buffer_and_open_truncates() {
        let output = MemoryOutput::new();
        let handle = output.clone();

        let mut stream = output.open().unwrap();
        stream.write_all(b"first").unwrap();
        assert_eq!(handle.contents(), "first");

        let mut stream = output.open().unwrap();
        stream.write_all(b"second").unwrap();
        assert_eq!(handle.contents(), "second");
        assert_eq!(handle.open_count(), 2);
    }
}
