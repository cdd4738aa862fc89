//! Cassette data structures.
//!
//! The streaming writer emits this layout event by event; the buffered
//! writer builds a [`Cassette`] value and serializes it once.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::runner::events::{Request, Response};

/// Run metadata written before any interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meta {
    /// When the writer was initialized.
    pub start_time: DateTime<Utc>,
}

/// One recorded request/response pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionRecord {
    /// Position in the cassette, as text: `"0"`, `"1"`, ...
    pub id: String,
    /// Uppercase status of the operation that produced the interaction.
    pub status: String,
    /// The request that was sent.
    pub request: Request,
    /// The response that came back.
    pub response: Response,
}

/// A complete cassette.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Run metadata.
    pub meta: Meta,
    /// Interactions in recording order.
    pub interactions: Vec<InteractionRecord>,
}

/// Format a start time the same way chrono's serde support does.
#[must_use]
pub fn format_start_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn start_time_matches_serde_form() {
        let time = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        let via_serde = serde_json::to_value(time).unwrap();
        assert_eq!(via_serde.as_str(), Some(format_start_time(time).as_str()));
        assert_eq!(format_start_time(time), "2026-10-19T08:30:00Z");
    }
}
