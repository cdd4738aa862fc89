//! Deterministic adapters for tests and embedding.

pub mod clock;
pub mod output;

pub use clock::FixedClock;
pub use output::MemoryOutput;
