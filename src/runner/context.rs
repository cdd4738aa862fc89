//! Run-wide state shared with event handlers.

use super::events::ExecutionEvent;

/// Counters describing the run so far.
///
/// Only the event driver mutates the context; handlers receive it by
/// shared reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Operations announced by the `initialized` event, if seen.
    pub operations_count: Option<usize>,
    /// Operations that finished executing.
    pub operations_processed: usize,
    /// Interactions observed across all finished operations.
    pub interactions_seen: usize,
}

impl ExecutionContext {
    /// Fold one event into the counters.
    pub fn observe(&mut self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::Initialized { operations_count, .. } => {
                self.operations_count = Some(*operations_count);
            }
            ExecutionEvent::AfterExecution(after) => {
                self.operations_processed += 1;
                self.interactions_seen += after.result.interactions.len();
            }
            ExecutionEvent::BeforeExecution { .. }
            | ExecutionEvent::Interrupted
            | ExecutionEvent::InternalError { .. }
            | ExecutionEvent::Finished { .. } => {}
        }
    }
}
