//! Port traits defining external boundaries.
//!
//! The cassette writers only reach the outside world through these traits:
//! the wall clock for `meta.start_time`, and the output resource the
//! document is written to. Implementations live in `src/adapters/`.

pub mod clock;
pub mod output;

pub use clock::Clock;
pub use output::{OutputResource, OutputStream};
