//! Cassette writing: a YAML event emitter, the document state machine on
//! top of it, and the streaming and buffered writers.

pub mod buffered;
pub mod document;
pub mod emitter;
pub mod encoder;
pub mod format;
pub mod recorder;
pub mod writer;

pub use buffered::BufferedCassetteWriter;
pub use writer::StreamingCassetteWriter;
