//! Handler that reports run progress through `tracing`.

use tracing::{error, info, warn};

use super::EventHandler;
use crate::constants::user_agent;
use crate::error::Result;
use crate::runner::context::ExecutionContext;
use crate::runner::events::ExecutionEvent;

/// Logs one structured record per event.
#[derive(Debug, Default)]
pub struct LoggingHandler;

impl EventHandler for LoggingHandler {
    fn initialize(&mut self, _context: &ExecutionContext) -> Result<()> {
        info!(user_agent = %user_agent(), "run starting");
        Ok(())
    }

    fn handle_event(&mut self, context: &ExecutionContext, event: &ExecutionEvent) -> Result<()> {
        match event {
            ExecutionEvent::Initialized { schema_address, operations_count } => {
                let schema = schema_address.as_deref().unwrap_or("-");
                info!(schema, operations_count, "schema loaded");
            }
            ExecutionEvent::BeforeExecution { method, path } => {
                info!(%method, %path, "executing operation");
            }
            ExecutionEvent::AfterExecution(after) => {
                info!(
                    method = %after.result.method,
                    path = %after.result.path,
                    status = after.status.name(),
                    interactions = after.result.interactions.len(),
                    processed = context.operations_processed,
                    total = ?context.operations_count,
                    "operation finished"
                );
            }
            ExecutionEvent::Interrupted => warn!("run interrupted"),
            ExecutionEvent::InternalError { message } => error!(%message, "runner error"),
            ExecutionEvent::Finished {
                passed_count,
                failed_count,
                errored_count,
                running_time,
            } => {
                info!(passed_count, failed_count, errored_count, running_time, "run finished");
            }
        }
        Ok(())
    }
}
