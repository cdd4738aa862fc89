//! Cassette document state machine.
//!
//! Tracks which containers are open and allows only the transitions that
//! produce a well-formed cassette:
//!
//! ```text
//! Unopened -> DocumentOpen -> MetaWritten -> InteractionsOpen
//!     InteractionsOpen <-> RecordOpen
//! InteractionsOpen -> InteractionsClosed -> DocumentClosed
//! ```
//!
//! A transition whose emission fails moves the document to `Failed`, from
//! which nothing further is accepted.

use serde::Serialize;

use super::emitter::{Event, EventSink};
use super::encoder::{write_mapping, write_pair, write_str};
use crate::error::{CassetteError, Result};

/// Position of the document within its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    /// Nothing has been emitted.
    Unopened,
    /// Document and top-level mapping are open, `meta` key written.
    DocumentOpen,
    /// The `meta` mapping is complete.
    MetaWritten,
    /// The `interactions` sequence is open and between records.
    InteractionsOpen,
    /// An interaction record mapping is open.
    RecordOpen,
    /// The `interactions` sequence is closed.
    InteractionsClosed,
    /// The document is complete.
    DocumentClosed,
    /// An emission failed partway through; the output is incomplete.
    Failed,
}

/// Drives an [`EventSink`] through the cassette layout.
#[derive(Debug)]
pub struct CassetteDocument<S: EventSink> {
    sink: S,
    state: DocumentState,
}

impl<S: EventSink> CassetteDocument<S> {
    /// Wrap a sink that has not received any events yet.
    pub fn new(sink: S) -> Self {
        Self { sink, state: DocumentState::Unopened }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> DocumentState {
        self.state
    }

    /// Release the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn transition<F>(
        &mut self,
        from: DocumentState,
        to: DocumentState,
        action: &'static str,
        emit: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut S) -> Result<()>,
    {
        if self.state != from {
            return Err(CassetteError::IllegalTransition { state: self.state, action });
        }
        match emit(&mut self.sink) {
            Ok(()) => {
                self.state = to;
                Ok(())
            }
            Err(e) => {
                self.state = DocumentState::Failed;
                Err(e)
            }
        }
    }

    /// Start the document and top-level mapping, and write the `meta` key.
    ///
    /// # Errors
    ///
    /// Fails unless the document is `Unopened`, or if emission fails.
    pub fn open(&mut self) -> Result<()> {
        self.transition(
            DocumentState::Unopened,
            DocumentState::DocumentOpen,
            "open the document",
            |sink| {
                sink.emit(Event::DocumentStart)?;
                sink.emit(Event::MappingStart)?;
                write_str(sink, "meta")
            },
        )
    }

    /// Write the `meta` mapping.
    ///
    /// # Errors
    ///
    /// Fails unless the document is `DocumentOpen`, or if emission fails.
    pub fn write_meta(&mut self, start_time: &str) -> Result<()> {
        self.transition(
            DocumentState::DocumentOpen,
            DocumentState::MetaWritten,
            "write metadata",
            |sink| {
                sink.emit(Event::MappingStart)?;
                write_pair(sink, "start_time", start_time)?;
                sink.emit(Event::MappingEnd)
            },
        )
    }

    /// Write the `interactions` key and open its sequence.
    ///
    /// # Errors
    ///
    /// Fails unless the document is `MetaWritten`, or if emission fails.
    pub fn open_interactions(&mut self) -> Result<()> {
        self.transition(
            DocumentState::MetaWritten,
            DocumentState::InteractionsOpen,
            "open the interactions list",
            |sink| {
                write_str(sink, "interactions")?;
                sink.emit(Event::SequenceStart)
            },
        )
    }

    /// Open one interaction record and write its `id` and `status`.
    ///
    /// # Errors
    ///
    /// Fails unless the document is `InteractionsOpen`, or if emission fails.
    pub fn open_record(&mut self, id: &str, status: &str) -> Result<()> {
        self.transition(
            DocumentState::InteractionsOpen,
            DocumentState::RecordOpen,
            "open a record",
            |sink| {
                sink.emit(Event::MappingStart)?;
                write_pair(sink, "id", id)?;
                write_pair(sink, "status", status)
            },
        )
    }

    /// Write the `request` and `response` mappings and close the record.
    ///
    /// # Errors
    ///
    /// Fails unless a record is open, if either value cannot be encoded, or
    /// if emission fails.
    pub fn close_record<Req, Resp>(&mut self, request: &Req, response: &Resp) -> Result<()>
    where
        Req: Serialize + ?Sized,
        Resp: Serialize + ?Sized,
    {
        self.transition(
            DocumentState::RecordOpen,
            DocumentState::InteractionsOpen,
            "close a record",
            |sink| {
                write_mapping(sink, "request", request)?;
                write_mapping(sink, "response", response)?;
                sink.emit(Event::MappingEnd)
            },
        )
    }

    /// Close the `interactions` sequence.
    ///
    /// # Errors
    ///
    /// Fails unless the document is `InteractionsOpen`, or if emission fails.
    pub fn close_interactions(&mut self) -> Result<()> {
        self.transition(
            DocumentState::InteractionsOpen,
            DocumentState::InteractionsClosed,
            "close the interactions list",
            |sink| sink.emit(Event::SequenceEnd),
        )
    }

    /// Close the top-level mapping and end the document.
    ///
    /// # Errors
    ///
    /// Fails unless the document is `InteractionsClosed`, or if emission fails.
    pub fn close(&mut self) -> Result<()> {
        self.transition(
            DocumentState::InteractionsClosed,
            DocumentState::DocumentClosed,
            "close the document",
            |sink| {
                sink.emit(Event::MappingEnd)?;
                sink.emit(Event::DocumentEnd)
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use serde::ser::{Error as _, Serializer};
    use serde_json::json;

    use super::*;
    use crate::cassette::emitter::YamlEmitter;

    struct Broken;

    impl Serialize for Broken {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("broken"))
        }
    }

    fn opened() -> CassetteDocument<YamlEmitter<Vec<u8>>> {
        let mut doc = CassetteDocument::new(YamlEmitter::new(Vec::new()));
        doc.open().unwrap();
        doc.write_meta("2026-01-01T00:00:00Z").unwrap();
        doc.open_interactions().unwrap();
        doc
    }

    fn text(doc: CassetteDocument<YamlEmitter<Vec<u8>>>) -> String {
        String::from_utf8(doc.into_sink().into_inner()).unwrap()
    }

    #[test]
    fn full_lifecycle_produces_cassette_layout() {
        let mut doc = opened();
        doc.open_record("0", "SUCCESS").unwrap();
        doc.close_record(&json!({"method": "GET"}), &json!({"status_code": 200})).unwrap();
        doc.close_interactions().unwrap();
        doc.close().unwrap();
        assert_eq!(doc.state(), DocumentState::DocumentClosed);

        let value: serde_yaml::Value = serde_yaml::from_str(&text(doc)).unwrap();
        assert_eq!(value["meta"]["start_time"].as_str(), Some("2026-01-01T00:00:00Z"));
        let interactions = value["interactions"].as_sequence().unwrap();
        assert_eq!(interactions.len(), 1);
        assert_eq!(interactions[0]["id"].as_str(), Some("0"));
        assert_eq!(interactions[0]["status"].as_str(), Some("SUCCESS"));
        assert_eq!(interactions[0]["request"]["method"].as_str(), Some("GET"));
        assert_eq!(interactions[0]["response"]["status_code"].as_u64(), Some(200));
    }

    #[test]
    fn empty_interactions_list_is_written_inline() {
        let mut doc = opened();
        doc.close_interactions().unwrap();
        doc.close().unwrap();
        let yaml = text(doc);
        assert!(yaml.starts_with("meta:\n  start_time: "));
        assert!(yaml.ends_with("\ninteractions: []\n"));
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert!(value["interactions"].as_sequence().unwrap().is_empty());
    }

    #[test]
    fn record_before_interactions_open_is_rejected() {
        let mut doc = CassetteDocument::new(YamlEmitter::new(Vec::new()));
        doc.open().unwrap();
        let err = doc.open_record("0", "SUCCESS").unwrap_err();
        assert!(matches!(
            err,
            CassetteError::IllegalTransition { state: DocumentState::DocumentOpen, .. }
        ));
        // Rejected transitions emit nothing and leave the state alone.
        assert_eq!(doc.state(), DocumentState::DocumentOpen);
        assert_eq!(text(doc), "meta:");
    }

    #[test]
    fn closing_with_record_open_is_rejected() {
        let mut doc = opened();
        doc.open_record("0", "SUCCESS").unwrap();
        assert!(doc.close_interactions().is_err());
        assert_eq!(doc.state(), DocumentState::RecordOpen);
    }

    #[test]
    fn encoding_failure_marks_document_failed() {
        let mut doc = opened();
        doc.open_record("0", "ERROR").unwrap();
        let err = doc.close_record(&json!({}), &Broken).unwrap_err();
        assert!(matches!(err, CassetteError::Unsupported { .. }));
        assert_eq!(doc.state(), DocumentState::Failed);
        assert!(doc.open_record("1", "ERROR").is_err());
        assert!(doc.close_interactions().is_err());
    }
}
