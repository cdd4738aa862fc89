//! Writes interaction records into an open cassette document.

use tracing::debug;

use super::document::{CassetteDocument, DocumentState};
use super::emitter::EventSink;
use crate::error::{CassetteError, Result};
use crate::runner::events::{Interaction, Status};

/// Allocates interaction ids: contiguous, starting at 0.
#[derive(Debug, Default)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    /// Return the current value and advance.
    pub fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next allocation will return.
    #[must_use]
    pub fn peek(&self) -> u64 {
        self.next
    }
}

/// Appends interaction records to a document whose `interactions` list is open.
#[derive(Debug)]
pub struct InteractionRecorder<S: EventSink> {
    document: CassetteDocument<S>,
    ids: IdSequence,
}

impl<S: EventSink> InteractionRecorder<S> {
    /// Wrap a document. Records are only accepted once it is `InteractionsOpen`.
    pub fn new(document: CassetteDocument<S>) -> Self {
        Self { document, ids: IdSequence::default() }
    }

    /// Number of records written so far.
    #[must_use]
    pub fn recorded(&self) -> u64 {
        self.ids.peek()
    }

    /// Current state of the underlying document.
    #[must_use]
    pub fn state(&self) -> DocumentState {
        self.document.state()
    }

    /// Release the document.
    pub fn into_document(self) -> CassetteDocument<S> {
        self.document
    }

    /// Write one record per interaction, in order, all with the same status.
    ///
    /// An empty batch writes nothing and allocates no ids.
    ///
    /// # Errors
    ///
    /// Returns [`CassetteError::Poisoned`] if an earlier write failed, or the
    /// emission error if this batch fails partway. After a failure the
    /// document is left `Failed`.
    pub fn record(&mut self, status: Status, interactions: &[Interaction]) -> Result<()> {
        if self.document.state() == DocumentState::Failed {
            return Err(CassetteError::Poisoned);
        }
        if interactions.is_empty() {
            return Ok(());
        }
        let first_id = self.ids.peek();
        for interaction in interactions {
            let id = self.ids.allocate().to_string();
            self.document.open_record(&id, status.upper_name())?;
            self.document.close_record(&interaction.request, &interaction.response)?;
        }
        debug!(
            first_id,
            count = interactions.len(),
            status = status.name(),
            "recorded interactions"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::emitter::YamlEmitter;
    use crate::runner::events::{Request, Response};

    fn interaction(path: &str, code: u16) -> Interaction {
        Interaction {
            request: Request {
                method: "GET".into(),
                uri: format!("http://127.0.0.1:8081{path}"),
                headers: [("Accept".to_string(), vec!["application/json".to_string()])].into(),
                body: None,
            },
            response: Response {
                status_code: code,
                message: "OK".into(),
                headers: Default::default(),
                body: Some(r#"{"ok": true}"#.into()),
                encoding: Some("utf-8".into()),
                http_version: "1.1".into(),
                elapsed: 0.25,
            },
        }
    }

    fn recorder() -> InteractionRecorder<YamlEmitter<Vec<u8>>> {
        let mut document = CassetteDocument::new(YamlEmitter::new(Vec::new()));
        document.open().unwrap();
        document.write_meta("2026-01-01T00:00:00Z").unwrap();
        document.open_interactions().unwrap();
        InteractionRecorder::new(document)
    }

    fn finish(recorder: InteractionRecorder<YamlEmitter<Vec<u8>>>) -> serde_yaml::Value {
        let mut document = recorder.into_document();
        document.close_interactions().unwrap();
        document.close().unwrap();
        let yaml = String::from_utf8(document.into_sink().into_inner()).unwrap();
        serde_yaml::from_str(&yaml).unwrap()
    }

    #[test]
    fn ids_are_contiguous_across_batches() {
        let mut recorder = recorder();
        recorder
            .record(Status::Success, &[interaction("/a", 200), interaction("/b", 200)])
            .unwrap();
        recorder.record(Status::Failure, &[interaction("/c", 500)]).unwrap();
        assert_eq!(recorder.recorded(), 3);

        let value = finish(recorder);
        let records = value["interactions"].as_sequence().unwrap();
        let ids: Vec<_> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
        let statuses: Vec<_> = records.iter().map(|r| r["status"].as_str().unwrap()).collect();
        assert_eq!(ids, ["0", "1", "2"]);
        assert_eq!(statuses, ["SUCCESS", "SUCCESS", "FAILURE"]);
        assert_eq!(records[2]["request"]["uri"].as_str(), Some("http://127.0.0.1:8081/c"));
        assert_eq!(records[2]["response"]["status_code"].as_u64(), Some(500));
        assert_eq!(records[0]["response"]["body"].as_str(), Some(r#"{"ok": true}"#));
        assert_eq!(
            records[0]["request"]["headers"]["Accept"][0].as_str(),
            Some("application/json")
        );
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let mut recorder = recorder();
        recorder.record(Status::Success, &[]).unwrap();
        assert_eq!(recorder.recorded(), 0);
        recorder.record(Status::Error, &[interaction("/x", 503)]).unwrap();

        let value = finish(recorder);
        let records = value["interactions"].as_sequence().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"].as_str(), Some("0"));
    }

    #[test]
    fn record_before_interactions_open_is_rejected() {
        let mut recorder =
            InteractionRecorder::new(CassetteDocument::new(YamlEmitter::new(Vec::new())));
        let err = recorder.record(Status::Success, &[interaction("/a", 200)]).unwrap_err();
        assert!(matches!(
            err,
            CassetteError::IllegalTransition { state: DocumentState::Unopened, .. }
        ));
    }

    #[test]
    fn id_sequence_starts_at_zero() {
        let mut ids = IdSequence::default();
        assert_eq!(ids.allocate(), 0);
        assert_eq!(ids.allocate(), 1);
        assert_eq!(ids.peek(), 2);
    }
}
