//! Error type shared by the cassette writers and event handlers.

use std::io;

use thiserror::Error;

use crate::cassette::document::DocumentState;

/// Errors raised while writing a cassette.
#[derive(Debug, Error)]
pub enum CassetteError {
    /// A request or response field holds a value the encoder cannot represent.
    #[error("cannot encode `{field}`: {source}")]
    Unsupported {
        /// Name of the mapping being encoded (`request` or `response`).
        field: String,
        /// Underlying conversion failure.
        #[source]
        source: serde_json::Error,
    },

    /// The YAML encoder rejected a value.
    #[error("failed to encode YAML: {0}")]
    Encode(#[from] serde_yaml::Error),

    /// The output resource could not be opened, written, or flushed.
    #[error("{context}: {source}")]
    Io {
        /// What the writer was doing when the failure happened.
        context: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A line of the event stream could not be parsed.
    #[error("invalid event on line {line}: {source}")]
    InvalidEvent {
        /// 1-based line number.
        line: usize,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// The low-level emitter received an event that is illegal at its position.
    #[error("emitter received an out-of-order event: {0}")]
    Emitter(String),

    /// The document state machine was asked for a transition it does not allow.
    #[error("cannot {action} while the document is {state:?}")]
    IllegalTransition {
        /// State the document was in.
        state: DocumentState,
        /// The transition that was requested.
        action: &'static str,
    },

    /// An event arrived before `initialize`.
    #[error("cassette writer used before initialize")]
    NotInitialized,

    /// `initialize` was called more than once.
    #[error("cassette writer already initialized")]
    AlreadyInitialized,

    /// `finalize` was called more than once, or the writer was used after it.
    #[error("cassette writer already finalized")]
    AlreadyFinalized,

    /// An earlier emission failed and the document can no longer be extended.
    #[error("cassette writer is unusable after an earlier write failure")]
    Poisoned,

    /// Finalization closed the output, but the document on disk is incomplete.
    #[error("cassette is incomplete: an earlier write failed before the document was closed")]
    Incomplete,
}

impl CassetteError {
    /// Wraps an I/O failure with a short description of the operation.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = CassetteError> = std::result::Result<T, E>;
