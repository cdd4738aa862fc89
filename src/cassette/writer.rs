//! Streaming cassette writer.
//!
//! Writes the cassette while the run is in progress: metadata and the
//! opening of the `interactions` list at initialization, one record per
//! interaction as each batch arrives, and the closing events at
//! finalization. Nothing already written is held in memory.
//!
//! If the process dies between initialization and finalization the file
//! is left with unclosed containers.

use tracing::{debug, info, warn};

use super::document::{CassetteDocument, DocumentState};
use super::emitter::{EventSink, YamlEmitter};
use super::format::format_start_time;
use super::recorder::InteractionRecorder;
use crate::error::{CassetteError, Result};
use crate::handlers::EventHandler;
use crate::ports::{Clock, OutputResource, OutputStream};
use crate::runner::context::ExecutionContext;
use crate::runner::events::{ExecutionEvent, Interaction, Status};

enum Phase {
    Pending,
    Recording(InteractionRecorder<YamlEmitter<OutputStream>>),
    Finalized,
}

/// Streams interactions into a YAML cassette as they are observed.
pub struct StreamingCassetteWriter {
    output: Box<dyn OutputResource>,
    clock: Box<dyn Clock>,
    phase: Phase,
}

impl StreamingCassetteWriter {
    /// Create a writer. The output is not opened until [`Self::start`].
    pub fn new(output: Box<dyn OutputResource>, clock: Box<dyn Clock>) -> Self {
        Self { output, clock, phase: Phase::Pending }
    }

    /// Number of interactions written so far.
    #[must_use]
    pub fn recorded(&self) -> u64 {
        match &self.phase {
            Phase::Recording(recorder) => recorder.recorded(),
            Phase::Pending | Phase::Finalized => 0,
        }
    }

    /// Open the output, write the metadata block, and open the
    /// `interactions` list.
    ///
    /// # Errors
    ///
    /// Returns [`CassetteError::AlreadyInitialized`] or
    /// [`CassetteError::AlreadyFinalized`] on repeated use, an I/O error if
    /// the output cannot be opened, or any emission error.
    pub fn start(&mut self) -> Result<()> {
        match self.phase {
            Phase::Pending => {}
            Phase::Recording(_) => return Err(CassetteError::AlreadyInitialized),
            Phase::Finalized => return Err(CassetteError::AlreadyFinalized),
        }
        let start_time = format_start_time(self.clock.now());
        let stream = self.output.open().map_err(|e| {
            CassetteError::io(format!("Failed to open cassette {}", self.output.describe()), e)
        })?;

        let mut document = CassetteDocument::new(YamlEmitter::new(stream));
        document.open()?;
        document.write_meta(&start_time)?;
        document.open_interactions()?;
        info!(output = %self.output.describe(), %start_time, "cassette opened");

        self.phase = Phase::Recording(InteractionRecorder::new(document));
        Ok(())
    }

    /// Append one record per interaction.
    ///
    /// # Errors
    ///
    /// Returns [`CassetteError::NotInitialized`] before [`Self::start`],
    /// [`CassetteError::AlreadyFinalized`] after [`Self::finish`],
    /// [`CassetteError::Poisoned`] after an earlier failure, or the emission
    /// error itself.
    pub fn record(&mut self, status: Status, interactions: &[Interaction]) -> Result<()> {
        let recorder = match &mut self.phase {
            Phase::Recording(recorder) => recorder,
            Phase::Pending => return Err(CassetteError::NotInitialized),
            Phase::Finalized => return Err(CassetteError::AlreadyFinalized),
        };
        recorder.record(status, interactions).inspect_err(|e| {
            warn!(error = %e, "cassette write failed; output will be incomplete");
        })
    }

    /// Close the `interactions` list and the document, then flush and
    /// release the output.
    ///
    /// The output is released even when the document cannot be closed.
    ///
    /// # Errors
    ///
    /// Returns [`CassetteError::NotInitialized`] before [`Self::start`],
    /// [`CassetteError::AlreadyFinalized`] on a second call,
    /// [`CassetteError::Incomplete`] if an earlier write failed, or an I/O
    /// error from the final flush.
    pub fn finish(&mut self) -> Result<()> {
        let recorder = match std::mem::replace(&mut self.phase, Phase::Finalized) {
            Phase::Recording(recorder) => recorder,
            Phase::Pending => {
                self.phase = Phase::Pending;
                return Err(CassetteError::NotInitialized);
            }
            Phase::Finalized => return Err(CassetteError::AlreadyFinalized),
        };
        let recorded = recorder.recorded();
        let mut document = recorder.into_document();

        let closed = if document.state() == DocumentState::Failed {
            Err(CassetteError::Incomplete)
        } else {
            document.close_interactions().and_then(|()| document.close())
        };
        let mut emitter = document.into_sink();
        let flushed = emitter.flush();
        drop(emitter);

        closed?;
        flushed?;
        info!(output = %self.output.describe(), interactions = recorded, "cassette closed");
        Ok(())
    }
}

impl EventHandler for StreamingCassetteWriter {
    fn initialize(&mut self, _context: &ExecutionContext) -> Result<()> {
        self.start()
    }

    fn handle_event(&mut self, context: &ExecutionContext, event: &ExecutionEvent) -> Result<()> {
        match event {
            ExecutionEvent::AfterExecution(after) => {
                debug!(processed = context.operations_processed, "recording operation");
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
