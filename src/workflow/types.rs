use serde::Serialize;
use thiserror::Error;

use crate::listing::EnhancementResult;

/// Lifecycle of the enhancement attached to one editing session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkflowState {
    /// Nothing requested, nothing held.
    #[default]
    Idle,
    /// A generation call is in flight.
    Pending,
    /// The latest call returned a usable result.
    Succeeded(EnhancementResult),
    /// The latest call failed.
    Failed(ErrorInfo),
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Pending => "pending",
            WorkflowState::Succeeded(_) => "succeeded",
            WorkflowState::Failed(_) => "failed",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, WorkflowState::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The service answered with a failure, or its answer was unusable.
    Service,
    /// The service did not answer within the configured wait.
    Timeout,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Service => f.write_str("service error"),
            ErrorKind::Timeout => f.write_str("timeout"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub reason: String,
}

impl ErrorInfo {
    pub fn service(reason: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Service,
            reason: reason.into(),
        }
    }

    pub fn timeout(reason: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            reason: reason.into(),
        }
    }
}

/// Errors reported synchronously to whoever drove the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Missing required fields: {}", .missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    #[error("No enhancement to apply (workflow is {state})")]
    InvalidState { state: &'static str },
}

/// Identifies one outbound call. Only the ticket with the current sequence
/// number may settle the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The outcome was recorded as the new state.
    Settled,
    /// The call was superseded or dismissed; the outcome was dropped.
    Stale,
}
