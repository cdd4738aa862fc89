//! Buffered cassette writer.
//!
//! Keeps the whole cassette in memory and writes it once, at finalization.
//! The destination is opened only after the document has serialized, so a
//! serialization failure leaves it untouched rather than half-written.

use std::io::Write;

use tracing::{debug, info};

use super::format::{Cassette, InteractionRecord, Meta};
use super::recorder::IdSequence;
use crate::error::{CassetteError, Result};
use crate::handlers::EventHandler;
use crate::ports::{Clock, OutputResource};
use crate::runner::context::ExecutionContext;
use crate::runner::events::{ExecutionEvent, Interaction, Status};

enum Phase {
    Pending,
    Recording(Cassette),
    Finalized,
}

/// Accumulates interactions and writes the YAML cassette at the end of the run.
pub struct BufferedCassetteWriter {
    output: Box<dyn OutputResource>,
    clock: Box<dyn Clock>,
    ids: IdSequence,
    phase: Phase,
}

impl BufferedCassetteWriter {
    /// Create a writer. The output is not opened until [`Self::finish`].
    pub fn new(output: Box<dyn OutputResource>, clock: Box<dyn Clock>) -> Self {
        Self { output, clock, ids: IdSequence::default(), phase: Phase::Pending }
    }

    /// The cassette built so far, if recording.
    #[must_use]
    pub fn cassette(&self) -> Option<&Cassette> {
        match &self.phase {
            Phase::Recording(cassette) => Some(cassette),
            Phase::Pending | Phase::Finalized => None,
        }
    }

    /// Capture the start time and begin an empty cassette.
    ///
    /// # Errors
    ///
    /// Returns [`CassetteError::AlreadyInitialized`] or
    /// [`CassetteError::AlreadyFinalized`] on repeated use.
    pub fn start(&mut self) -> Result<()> {
        match self.phase {
            Phase::Pending => {}
            Phase::Recording(_) => return Err(CassetteError::AlreadyInitialized),
            Phase::Finalized => return Err(CassetteError::AlreadyFinalized),
        }
        let meta = Meta { start_time: self.clock.now() };
        debug!(start_time = %meta.start_time, "buffered cassette started");
        self.phase = Phase::Recording(Cassette { meta, interactions: Vec::new() });
        Ok(())
    }

    /// Append one record per interaction.
    ///
    /// # Errors
    ///
    /// Returns [`CassetteError::NotInitialized`] before [`Self::start`] or
    /// [`CassetteError::AlreadyFinalized`] after [`Self::finish`].
    pub fn record(&mut self, status: Status, interactions: &[Interaction]) -> Result<()> {
        let cassette = match &mut self.phase {
            Phase::Recording(cassette) => cassette,
            Phase::Pending => return Err(CassetteError::NotInitialized),
            Phase::Finalized => return Err(CassetteError::AlreadyFinalized),
        };
        for interaction in interactions {
            cassette.interactions.push(InteractionRecord {
                id: self.ids.allocate().to_string(),
                status: status.upper_name().to_string(),
                request: interaction.request.clone(),
                response: interaction.response.clone(),
            });
        }
        Ok(())
    }

    /// Serialize the cassette, then open, write, and release the output.
    ///
    /// # Errors
    ///
    /// Returns [`CassetteError::NotInitialized`] before [`Self::start`],
    /// [`CassetteError::AlreadyFinalized`] on a second call, an encoding
    /// error (output untouched), or an I/O error.
    pub fn finish(&mut self) -> Result<()> {
        let cassette = match std::mem::replace(&mut self.phase, Phase::Finalized) {
            Phase::Recording(cassette) => cassette,
            Phase::Pending => {
                self.phase = Phase::Pending;
                return Err(CassetteError::NotInitialized);
            }
            Phase::Finalized => return Err(CassetteError::AlreadyFinalized),
        };
        let yaml = serde_yaml::to_string(&cassette)?;

        let describe = self.output.describe();
        let mut stream = self
            .output
            .open()
            .map_err(|e| CassetteError::io(format!("Failed to open cassette {describe}"), e))?;
        stream
            .write_all(yaml.as_bytes())
            .and_then(|()| stream.flush())
            .map_err(|e| CassetteError::io(format!("Failed to write cassette {describe}"), e))?;
        info!(output = %describe, interactions = cassette.interactions.len(), "cassette written");
        Ok(())
    }
}

impl EventHandler for BufferedCassetteWriter {
    fn initialize(&mut self, _context: &ExecutionContext) -> Result<()> {
        self.start()
    }

    fn handle_event(&mut self, _context: &ExecutionContext, event: &ExecutionEvent) -> Result<()> {
        match event {
            ExecutionEvent::AfterExecution(after) => {
                self.record(after.status, &after.result.interactions)
            }
            ExecutionEvent::Initialized { .. }
            | ExecutionEvent::BeforeExecution { .. }
            | ExecutionEvent::Interrupted
            | ExecutionEvent::InternalError { .. }
            | ExecutionEvent::Finished { .. } => Ok(()),
        }
    }

    fn finalize(&mut self) -> Result<()> {
        self.finish()
    }
}
