//! Live adapters for the real clock, files, and stdout.

pub mod clock;
pub mod output;

pub use clock::LiveClock;
pub use output::{FileOutput, StdoutOutput};
