//! Runner-side types and the loop that feeds events to handlers.

pub mod context;
pub mod events;

use std::io::BufRead;

use tracing::warn;

use crate::error::{CassetteError, Result};
use crate::handlers::EventHandler;
use context::ExecutionContext;
use events::ExecutionEvent;

/// Drive `handlers` through one run.
///
/// Every handler is initialized, then sees each event in order, then is
/// finalized exactly once. Dispatch stops at the first failure, but
/// finalization always happens.
///
/// # Errors
///
/// Returns the first error raised by a handler or by the event source.
/// Later errors are logged.
pub fn run_handlers<I>(
    handlers: &mut [Box<dyn EventHandler>],
    context: &mut ExecutionContext,
    events: I,
) -> Result<()>
where
    I: IntoIterator<Item = Result<ExecutionEvent>>,
{
    let mut first_error: Option<CassetteError> = None;
    let note = |result: Result<()>, first_error: &mut Option<CassetteError>| {
        if let Err(e) = result {
            if first_error.is_some() {
                warn!(error = %e, "additional handler failure");
            } else {
                *first_error = Some(e);
            }
        }
    };

    for handler in handlers.iter_mut() {
        note(handler.initialize(context), &mut first_error);
    }

    if first_error.is_none() {
        'events: for event in events {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    note(Err(e), &mut first_error);
                    break;
                }
            };
            context.observe(&event);
            for handler in handlers.iter_mut() {
                note(handler.handle_event(context, &event), &mut first_error);
                if first_error.is_some() {
                    break 'events;
                }
            }
        }
    }

    for handler in handlers.iter_mut() {
        note(handler.finalize(), &mut first_error);
    }

    first_error.map_or(Ok(()), Err)
}

/// Parse newline-delimited JSON events. Blank lines are skipped.
pub fn read_events<R: BufRead>(reader: R) -> impl Iterator<Item = Result<ExecutionEvent>> {
    reader.lines().enumerate().filter_map(|(index, line)| {
        let line = match line {
            Ok(line) => line,
            Err(e) => return Some(Err(CassetteError::io("Failed to read events", e))),
        };
        if line.trim().is_empty() {
            return None;
        }
        Some(
            serde_json::from_str(&line)
                .map_err(|source| CassetteError::InvalidEvent { line: index + 1, source }),
        )
    })
}
