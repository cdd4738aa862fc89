//! `netcassette record` command.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use crate::adapters::live::{FileOutput, LiveClock, StdoutOutput};
use crate::cassette::{BufferedCassetteWriter, StreamingCassetteWriter};
use crate::cli::CassetteMode;
use crate::handlers::{EventHandler, LoggingHandler};
use crate::ports::OutputResource;
use crate::runner::context::ExecutionContext;
use crate::runner::{read_events, run_handlers};

/// Build the cassette writer for `mode`, writing to `store` (`-` for stdout).
#[must_use]
pub fn writer_for(store: &Path, mode: CassetteMode) -> Box<dyn EventHandler> {
    let output: Box<dyn OutputResource> = if store == Path::new("-") {
        Box::new(StdoutOutput)
    } else {
        Box::new(FileOutput::new(store))
    };
    match mode {
        CassetteMode::Streaming => {
            Box::new(StreamingCassetteWriter::new(output, Box::new(LiveClock)))
        }
        CassetteMode::Buffered => {
            Box::new(BufferedCassetteWriter::new(output, Box::new(LiveClock)))
        }
    }
}

/// Execute the `record` command.
///
/// # Errors
///
/// Returns an error string if the event stream cannot be opened or parsed,
/// or if the cassette could not be written completely.
pub fn run(events: &str, store: &Path, mode: CassetteMode) -> Result<(), String> {
    let mut handlers: Vec<Box<dyn EventHandler>> =
        vec![Box::new(LoggingHandler) as Box<dyn EventHandler>, writer_for(store, mode)];
    let mut context = ExecutionContext::default();

    let result = if events == "-" {
        run_handlers(&mut handlers, &mut context, read_events(io::stdin().lock()))
    } else {
        let file = File::open(events)
            .map_err(|e| format!("Failed to open events file {events}: {e}"))?;
        run_handlers(&mut handlers, &mut context, read_events(BufReader::new(file)))
    };
    result.map_err(|e| format!("Cassette {} is incomplete or invalid: {e}", store.display()))?;

    if store != Path::new("-") {
        eprintln!(
            "Recorded {} interactions from {} operations to: {}",
            context.interactions_seen,
            context.operations_processed,
            store.display()
        );
    }
    Ok(())
}
