//! Uniform response envelope.
//!
//! Every call, successful or not, ends as a [`ResponseEnvelope`]. Failures are
//! never raised past the dispatcher; callers branch on `ok`.

use crate::catalog::UnknownOperation;
use crate::generators::GenerationError;
use crate::protocol::{CallToolResponse, ToolContent};
use crate::validator::{ValidationError, ValidationErrorKind};
use serde_json::Value;
use sqlgate_runtime::ExecutionError;
use std::error::Error as StdError;
use std::fmt;

/// Any failure along the dispatch pipeline.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    NotFound(#[from] UnknownOperation),

    #[error("Invalid arguments: {0}")]
    Validation(#[from] ValidationError),

    #[error("Cannot build statement: {0}")]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl DispatchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            DispatchError::NotFound(_) => FailureKind::NotFound,
            DispatchError::Validation(e) => FailureKind::Validation(e.kind),
            DispatchError::Generation(_) => FailureKind::Generation,
            DispatchError::Execution(_) => FailureKind::Execution,
        }
    }

    fn inner(&self) -> &(dyn StdError + 'static) {
        match self {
            DispatchError::NotFound(e) => e,
            DispatchError::Validation(e) => e,
            DispatchError::Generation(e) => e,
            DispatchError::Execution(e) => e,
        }
    }

    /// Messages of the underlying causes, outermost first.
    pub fn causes(&self) -> Vec<String> {
        std::iter::successors(self.inner().source(), |e| (*e).source())
            .map(ToString::to_string)
            .collect()
    }
}

/// Machine-readable failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    Validation(ValidationErrorKind),
    Generation,
    Execution,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::NotFound => f.write_str("not_found"),
            FailureKind::Validation(kind) => write!(f, "validation/{}", kind.as_str()),
            FailureKind::Generation => f.write_str("generation"),
            FailureKind::Execution => f.write_str("execution"),
        }
    }
}

/// Response body: plain text or structured JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Json(Value),
}

impl Payload {
    /// Text form sent to clients; JSON is pretty-printed.
    pub fn render(&self) -> String {
        match self {
            Payload::Text(text) => text.clone(),
            Payload::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// Result of one dispatched call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub ok: bool,
    pub payload: Payload,
    pub failure: Option<FailureKind>,
}

impl ResponseEnvelope {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            ok: true,
            payload: Payload::Text(text.into()),
            failure: None,
        }
    }

    pub fn json(value: Value) -> Self {
        Self {
            ok: true,
            payload: Payload::Json(value),
            failure: None,
        }
    }

    /// `Error executing <operation>: <cause>` followed by diagnostics.
    pub fn failure(operation: &str, error: &DispatchError) -> Self {
        let kind = error.kind();
        let mut text = format!("Error executing {}: {}", operation, error);

        text.push_str("\n\nDiagnostics:");
        text.push_str(&format!("\n  classification: {}", kind));
        if let DispatchError::Validation(e) = error {
            text.push_str(&format!("\n  field: {}", e.field));
        }
        if let DispatchError::Execution(ExecutionError::Database {
            code: Some(code), ..
        }) = error
        {
            text.push_str(&format!("\n  server error: {}", code));
        }
        for cause in error.causes() {
            text.push_str(&format!("\n  caused by: {}", cause));
        }

        Self {
            ok: false,
            payload: Payload::Text(text),
            failure: Some(kind),
        }
    }

    pub fn render(&self) -> String {
        self.payload.render()
    }

    /// Wire form for `tools/call`.
    pub fn into_tool_response(self) -> CallToolResponse {
        CallToolResponse {
            content: vec![ToolContent::Text {
                text: self.payload.render(),
            }],
            is_error: (!self.ok).then_some(true),
        }
    }
}
