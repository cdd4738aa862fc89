//! Command dispatch and handlers.

pub mod record;

use crate::cli::Command;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Record { events, store_network_log, cassette_mode } => {
            record::run(events, store_network_log, *cassette_mode)
        }
    }
}
