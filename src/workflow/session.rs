use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::generator::DescriptionGenerator;
use crate::listing::submit::{self, FieldError, ListedItem};
use crate::listing::{DraftListing, DraftUpdate, EnhancementRequest, EnhancementResult};

use super::machine::EnhancementWorkflow;
use super::notify::{Notification, NotificationSink};
use super::types::{ErrorInfo, Resolution, Ticket, WorkflowError, WorkflowState};

/// Point-in-time view of a session for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: u64,
    pub draft: DraftListing,
    pub state: WorkflowState,
    pub original_description: Option<String>,
}

struct SessionInner {
    draft: DraftListing,
    workflow: EnhancementWorkflow,
}

/// One draft-listing editing session and the enhancement attached to it.
///
/// The draft and workflow share one lock, which is never held across an
/// await. Generation calls run on spawned tasks and report back through
/// the workflow's sequence guard.
pub struct EditingSession {
    id: u64,
    inner: Mutex<SessionInner>,
    generator: Arc<dyn DescriptionGenerator>,
    notifier: Arc<dyn NotificationSink>,
    timeout: Duration,
    state_tx: watch::Sender<WorkflowState>,
}

impl EditingSession {
    pub fn new(
        id: u64,
        draft: DraftListing,
        generator: Arc<dyn DescriptionGenerator>,
        notifier: Arc<dyn NotificationSink>,
        timeout: Duration,
    ) -> Self {
        let (state_tx, _) = watch::channel(WorkflowState::Idle);
        Self {
            id,
            inner: Mutex::new(SessionInner {
                draft,
                workflow: EnhancementWorkflow::new(),
            }),
            generator,
            notifier,
            timeout,
            state_tx,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> WorkflowState {
        self.lock().workflow.state().clone()
    }

    pub fn draft(&self) -> DraftListing {
        self.lock().draft.clone()
    }

    /// Receive every state the workflow moves through.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state_tx.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.lock();
        SessionSnapshot {
            id: self.id,
            draft: inner.draft.clone(),
            state: inner.workflow.state().clone(),
            original_description: inner.workflow.original_description().map(str::to_string),
        }
    }

    pub fn update_draft(&self, update: DraftUpdate) -> DraftListing {
        let mut inner = self.lock();
        inner.draft.update(update);
        inner.draft.clone()
    }

    /// Start an enhancement of the current draft.
    ///
    /// The session is `Pending` by the time this returns. The returned handle
    /// completes once the outcome has been recorded or discarded as stale.
    pub fn request_enhancement(self: &Arc<Self>) -> Result<JoinHandle<()>, WorkflowError> {
        let begun = {
            let mut inner = self.lock();
            let request = inner.draft.enhancement_request();
            inner.workflow.begin(request.clone()).map(|ticket| {
                self.publish(inner.workflow.state());
                (ticket, request)
            })
        };

        let (ticket, request) = match begun {
            Ok(begun) => begun,
            Err(e) => {
                tracing::debug!(session = self.id, error = %e, "Enhancement request rejected");
                self.notifier.notify(Notification::error(
                    "Missing Information",
                    "Please fill in Title, Category, and Description to use AI enhancement.",
                ));
                return Err(e);
            }
        };

        tracing::info!(
            session = self.id,
            seq = ticket.seq,
            category = %request.category,
            "Requesting listing enhancement"
        );

        let session = Arc::clone(self);
        Ok(tokio::spawn(async move {
            let outcome = session.generate(&request).await;
            session.settle(ticket, outcome);
        }))
    }

    /// Write the held suggestion onto the draft. Returns the updated draft.
    pub fn apply_result(&self) -> Result<DraftListing, WorkflowError> {
        let applied = {
            let mut inner = self.lock();
            let SessionInner { draft, workflow } = &mut *inner;
            let applied = workflow.apply_result(draft).map(|_| draft.clone());
            if applied.is_ok() {
                self.publish(workflow.state());
            }
            applied
        };

        match &applied {
            Ok(_) => {
                tracing::info!(session = self.id, "Applied enhancement to draft");
                self.notifier.notify(Notification::info(
                    "AI Suggestions Applied",
                    "Description and tags have been updated.",
                ));
            }
            Err(e) => {
                tracing::debug!(session = self.id, error = %e, "Nothing to apply");
            }
        }

        applied
    }

    pub fn dismiss(&self) {
        let mut inner = self.lock();
        inner.workflow.dismiss();
        self.publish(inner.workflow.state());
    }

    /// Close the session. Any in-flight call is left to finish unobserved.
    pub fn end(&self) {
        self.dismiss();
        tracing::info!(session = self.id, "Editing session ended");
    }

    /// Validate the draft and list it. A successful submission ends the session.
    pub fn submit(
        &self,
        seller_id: &str,
        next_id: impl FnOnce() -> String,
    ) -> Result<ListedItem, Vec<FieldError>> {
        let draft = self.draft();
        let item = submit::submit_draft(&draft, seller_id, next_id)?;

        tracing::info!(session = self.id, item = %item.id, "Draft listed");
        self.notifier.notify(Notification::info(
            "Item Listed",
            "Your item has been successfully listed.",
        ));
        self.end();

        Ok(item)
    }

    async fn generate(&self, request: &EnhancementRequest) -> Result<EnhancementResult, ErrorInfo> {
        match tokio::time::timeout(self.timeout, self.generator.enhance(request)).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(session = self.id, error = %e, "Enhancement call failed");
                Err(ErrorInfo::service(e.to_string()))
            }
            Err(_) => {
                tracing::warn!(
                    session = self.id,
                    timeout = ?self.timeout,
                    "Enhancement call timed out"
                );
                Err(ErrorInfo::timeout(format!("No response within {:?}", self.timeout)))
            }
        }
    }

    /// Record an outcome through the guard. Notifying happens under the same
    /// lock, so a dismiss or newer request cannot slip in between.
    fn settle(&self, ticket: Ticket, outcome: Result<EnhancementResult, ErrorInfo>) {
        let mut inner = self.lock();
        if inner.workflow.resolve(ticket, outcome) == Resolution::Stale {
            tracing::debug!(session = self.id, seq = ticket.seq, "Discarding stale enhancement");
            return;
        }
        self.publish(inner.workflow.state());

        match inner.workflow.state() {
            WorkflowState::Succeeded(result) => {
                tracing::info!(
                    session = self.id,
                    seq = ticket.seq,
                    tags = result.suggested_tags.len(),
                    "Enhancement ready"
                );
                self.notifier.notify(Notification::info(
                    "Suggestions Ready",
                    "Review the suggested description and tags.",
                ));
            }
            WorkflowState::Failed(info) => {
                self.notifier.notify(Notification::error(
                    "AI Enhancement Failed",
                    format!("Could not generate suggestions ({}). Please try again.", info.kind),
                ));
            }
            _ => {}
        }
    }

    fn publish(&self, state: &WorkflowState) {
        self.state_tx.send_replace(state.clone());
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
