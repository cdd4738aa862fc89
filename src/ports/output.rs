//! Output port for the destination of a cassette.

use std::io::{self, Write};

/// An open, write-only stream owned by one writer.
pub type OutputStream = Box<dyn Write + Send>;

/// A lazily-opened destination for cassette bytes.
///
/// Nothing is created or truncated until [`OutputResource::open`] is called.
/// The writer that opened the stream owns it until it drops the stream,
/// which releases the underlying handle.
pub trait OutputResource: Send + Sync {
    /// Open the destination for writing, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be created or opened.
    fn open(&self) -> io::Result<OutputStream>;

    /// Human-readable description for logs and error messages.
    fn describe(&self) -> String;
}
