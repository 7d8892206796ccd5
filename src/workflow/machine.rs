use crate::listing::{DraftListing, EnhancementRequest, EnhancementResult};

use super::types::{ErrorInfo, Resolution, Ticket, WorkflowError, WorkflowState};

/// State machine for the enhancement of one draft listing.
///
/// Every accepted request gets a fresh sequence number. An outcome only
/// settles the workflow while it is `Pending` on that same number, so a
/// superseded or dismissed call can never overwrite newer state.
#[derive(Debug, Default)]
pub struct EnhancementWorkflow {
    state: WorkflowState,
    seq: u64,
    request: Option<EnhancementRequest>,
}

impl EnhancementWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Description that was sent with the request behind the current state.
    pub fn original_description(&self) -> Option<&str> {
        self.request.as_ref().map(|r| r.description.as_str())
    }

    /// Validate the request and enter `Pending`. On validation failure nothing changes.
    pub fn begin(&mut self, request: EnhancementRequest) -> Result<Ticket, WorkflowError> {
        let missing = request.missing_fields();
        if !missing.is_empty() {
            return Err(WorkflowError::Validation { missing });
        }

        if self.state.is_pending() {
            tracing::debug!(superseded = self.seq, "Superseding in-flight enhancement");
        }

        self.seq += 1;
        self.state = WorkflowState::Pending;
        self.request = Some(request);

        Ok(Ticket { seq: self.seq })
    }

    /// Record the outcome of the call identified by `ticket`, unless it is stale.
    pub fn resolve(
        &mut self,
        ticket: Ticket,
        outcome: Result<EnhancementResult, ErrorInfo>,
    ) -> Resolution {
        if !self.state.is_pending() || ticket.seq != self.seq {
            return Resolution::Stale;
        }

        self.state = match outcome {
            Ok(result) if result.enhanced_description.trim().is_empty() => {
                WorkflowState::Failed(ErrorInfo::service("Service returned an empty description"))
            }
            Ok(result) => WorkflowState::Succeeded(result),
            Err(info) => WorkflowState::Failed(info),
        };

        Resolution::Settled
    }

    /// Write the held result onto the draft (full replace) and return to `Idle`.
    pub fn apply_result(
        &mut self,
        draft: &mut DraftListing,
    ) -> Result<EnhancementResult, WorkflowError> {
        let result = match &self.state {
            WorkflowState::Succeeded(result) => result.clone(),
            other => {
                return Err(WorkflowError::InvalidState {
                    state: other.name(),
                })
            }
        };

        draft.description = result.enhanced_description.clone();
        draft.tags = result.suggested_tags.clone();
        self.reset();

        Ok(result)
    }

    /// Drop any held result or error. An in-flight call becomes stale.
    pub fn dismiss(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.state = WorkflowState::Idle;
        self.request = None;
    }
}
