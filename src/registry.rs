use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::generator::DescriptionGenerator;
use crate::listing::DraftListing;
use crate::workflow::{EditingSession, MemorySink};

const NOTIFICATION_CAPACITY: usize = 20;

/// An open session together with the notifications it has not yet delivered.
#[derive(Clone)]
pub struct SessionEntry {
    pub session: Arc<EditingSession>,
    pub notifications: Arc<MemorySink>,
}

/// In-memory set of open editing sessions.
pub struct SessionRegistry {
    sessions: HashMap<u64, SessionEntry>,
    next_session_id: u64,
    next_item_id: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            next_session_id: 1,
            next_item_id: AtomicU64::new(1),
        }
    }

    pub fn open(
        &mut self,
        draft: DraftListing,
        generator: Arc<dyn DescriptionGenerator>,
        timeout: Duration,
    ) -> SessionEntry {
        let id = self.next_session_id;
        self.next_session_id += 1;

        let notifications = Arc::new(MemorySink::new(NOTIFICATION_CAPACITY));
        let session = Arc::new(EditingSession::new(
            id,
            draft,
            generator,
            notifications.clone(),
            timeout,
        ));
        let entry = SessionEntry {
            session,
            notifications,
        };

        tracing::info!(session = id, open = self.sessions.len() + 1, "Opened editing session");
        self.sessions.insert(id, entry.clone());
        entry
    }

    pub fn get(&self, id: u64) -> Option<SessionEntry> {
        self.sessions.get(&id).cloned()
    }

    /// Forget a session that has already ended on its own.
    pub fn remove(&mut self, id: u64) -> Option<SessionEntry> {
        self.sessions.remove(&id)
    }

    /// Remove a session and end it.
    pub fn close(&mut self, id: u64) -> Option<SessionEntry> {
        let entry = self.remove(id)?;
        entry.session.end();
        Some(entry)
    }

    /// Remove and end every session.
    pub fn close_all(&mut self) -> usize {
        let count = self.sessions.len();
        for (_, entry) in self.sessions.drain() {
            entry.session.end();
        }
        count
    }

    /// Hand out the next listed item id. Callable under a shared lock.
    pub fn allocate_item_id(&self) -> String {
        let id = self.next_item_id.fetch_add(1, Ordering::SeqCst);
        format!("item-{id}")
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
