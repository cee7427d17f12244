//! In-memory conversation store
//!
//! Process-lifetime storage keyed by user id. Retention is explicit:
//! `Unbounded` keeps every user forever, `Ttl` treats records idle for longer
//! than the window as absent and drops them on `purge_expired`.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tokio::time::Instant;

use hr_assistant_config::RetentionPolicy;
use hr_assistant_core::{ConversationState, ConversationStore, StoreError};

#[derive(Debug, Clone, Copy)]
struct Entry {
    state: ConversationState,
    touched: Instant,
}

pub struct InMemoryConversationStore {
    entries: RwLock<HashMap<String, Entry>>,
    retention: RetentionPolicy,
}

impl InMemoryConversationStore {
    pub fn new(retention: RetentionPolicy) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            retention,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(RetentionPolicy::Unbounded)
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        match self.retention {
            RetentionPolicy::Unbounded => false,
            RetentionPolicy::Ttl(window) => now.saturating_duration_since(entry.touched) > window,
        }
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get(&self, user_id: &str) -> Result<ConversationState, StoreError> {
        let now = Instant::now();
        let entries = self.entries.read();
        Ok(entries
            .get(user_id)
            .filter(|entry| !self.is_expired(entry, now))
            .map(|entry| entry.state)
            .unwrap_or_default())
    }

    async fn put(&self, user_id: &str, state: ConversationState) -> Result<(), StoreError> {
        self.entries.write().insert(
            user_id.to_string(),
            Entry {
                state,
                touched: Instant::now(),
            },
        );
        Ok(())
    }

    async fn remove(&self, user_id: &str) -> Result<(), StoreError> {
        self.entries.write().remove(user_id);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, StoreError> {
        if self.retention == RetentionPolicy::Unbounded {
            return Ok(0);
        }
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry, now));
        Ok(before - entries.len())
    }

    async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.entries.read().len())
    }
}
