//! Per-user format session store
//!
//! Holds the most recent [`FormatSet`] of every user so that the format menu
//! can be re-rendered without uploading again. Nothing is persisted.
//!
//! Entries are never evicted: memory grows with the number of distinct users
//! over the process lifetime.

use crate::formats::{FormatKey, FormatSet};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Single-slot-per-user mapping from user ID to that user's formats
#[derive(Default)]
pub struct SessionStore {
    entries: RwLock<HashMap<i64, FormatSet>>,
}

impl SessionStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever the user had stored before
    pub async fn put(&self, user_id: i64, formats: FormatSet) {
        let mut entries = self.entries.write().await;
        if entries.insert(user_id, formats).is_some() {
            debug!(user_id, "Replaced previous format set");
        }
    }

    /// Stored text for one format, `None` if the user never uploaded
    pub async fn get(&self, user_id: i64, key: FormatKey) -> Option<String> {
        let entries = self.entries.read().await;
        entries.get(&user_id).map(|set| set.get(key).to_string())
    }

    /// Number of users with a stored format set
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True when no user has uploaded yet
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
