//! Event handler lifecycle.
//!
//! Every handler sees the same sequence: `initialize` once, `handle_event`
//! for each runner event in order, then `finalize` once.

pub mod logging;

pub use logging::LoggingHandler;

use crate::error::Result;
use crate::runner::context::ExecutionContext;
use crate::runner::events::ExecutionEvent;

/// Consumer of runner events.
pub trait EventHandler {
    /// Called once before the first event.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler cannot start.
    fn initialize(&mut self, _context: &ExecutionContext) -> Result<()> {
        Ok(())
    }

    /// Called for every event, in the order the runner produced them.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler cannot process the event.
    fn handle_event(&mut self, context: &ExecutionContext, event: &ExecutionEvent) -> Result<()>;

    /// Called once after the last event, even if earlier calls failed.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler cannot release its resources cleanly.
    fn finalize(&mut self) -> Result<()> {
        Ok(())
    }
}
