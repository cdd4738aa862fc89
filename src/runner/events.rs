//! Execution events emitted by the test runner.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Header names mapped to every value sent for that name.
pub type Headers = BTreeMap<String, Vec<String>>;

/// Outcome of one executed API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// All checks passed.
    Success,
    /// At least one check failed.
    Failure,
    /// The operation raised an error before checks could run.
    Error,
    /// The operation was not executed.
    Skip,
}

impl Status {
    /// Lowercase status name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Error => "error",
            Self::Skip => "skip",
        }
    }

    /// Uppercase status name as written into cassettes.
    #[must_use]
    pub fn upper_name(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Error => "ERROR",
            Self::Skip => "SKIP",
        }
    }
}

/// A request as it was sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// HTTP method.
    pub method: String,
    /// Full request URI.
    pub uri: String,
    /// Request headers.
    #[serde(default)]
    pub headers: Headers,
    /// Request body, if any.
    #[serde(default)]
    pub body: Option<String>,
}

/// A response as it was received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code.
    pub status_code: u16,
    /// Reason phrase.
    #[serde(default)]
    pub message: String,
    /// Response headers.
    #[serde(default)]
    pub headers: Headers,
    /// Response body, if any.
    #[serde(default)]
    pub body: Option<String>,
    /// Declared body encoding.
    #[serde(default)]
    pub encoding: Option<String>,
    /// Protocol version, e.g. `1.1`.
    #[serde(default = "default_http_version")]
    pub http_version: String,
    /// Seconds between sending the request and receiving the response.
    #[serde(default)]
    pub elapsed: f64,
}

fn default_http_version() -> String {
    "1.1".to_string()
}

/// One observed request/response exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// The request that was sent.
    pub request: Request,
    /// The response that came back.
    pub response: Response,
}

/// Everything observed while executing one API operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// HTTP method of the operation.
    pub method: String,
    /// Path template of the operation.
    pub path: String,
    /// Interactions in the order they happened.
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

/// Payload of [`ExecutionEvent::AfterExecution`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AfterExecution {
    /// Overall outcome of the operation.
    pub status: Status,
    /// Seconds spent on the operation.
    #[serde(default)]
    pub elapsed_time: f64,
    /// Observed interactions.
    pub result: TestResult,
}

/// Lifecycle notifications from the test runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExecutionEvent {
    /// The schema was loaded and the run is about to start.
    Initialized {
        /// Where the schema was loaded from.
        #[serde(default)]
        schema_address: Option<String>,
        /// Number of operations the run will execute.
        operations_count: usize,
    },
    /// An operation is about to execute.
    BeforeExecution {
        /// HTTP method of the operation.
        method: String,
        /// Path template of the operation.
        path: String,
    },
    /// An operation finished and its interactions are available.
    AfterExecution(AfterExecution),
    /// The run was interrupted by the user.
    Interrupted,
    /// The runner failed outside of any operation.
    InternalError {
        /// Error description.
        message: String,
    },
    /// The run is over.
    Finished {
        /// Operations that passed.
        passed_count: usize,
        /// Operations that failed.
        failed_count: usize,
        /// Operations that errored.
        errored_count: usize,
        /// Seconds spent on the whole run.
        running_time: f64,
    },
}

impl ExecutionEvent {
    /// Short name of the event kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Initialized { .. } => "initialized",
            Self::BeforeExecution { .. } => "before_execution",
            Self::AfterExecution(_) => "after_execution",
            Self::Interrupted => "interrupted",
            Self::InternalError { .. } => "internal_error",
            Self::Finished { .. } => "finished",
        }
    }
}
