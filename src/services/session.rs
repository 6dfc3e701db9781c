use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::models::DialogueStep;

struct SessionEntry {
    step: DialogueStep,
    last_seen: Instant,
}

/// In-memory dialogue sessions keyed by chat identity. Entries expire
/// after `ttl` without activity: an expired entry reads back as a fresh
/// Idle session, and `sweep` reclaims the map slots.
pub struct SessionStore {
    ttl: Duration,
    inner: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Current step for an identity, creating an Idle entry on first
    /// contact. Reading a live entry counts as activity.
    pub fn get(&self, chat_id: &str) -> DialogueStep {
        let mut sessions = self.inner.lock().unwrap();
        let now = Instant::now();

        let entry = sessions
            .entry(chat_id.to_string())
            .or_insert_with(|| SessionEntry {
                step: DialogueStep::Idle,
                last_seen: now,
            });

        if now.duration_since(entry.last_seen) >= self.ttl {
            entry.step = DialogueStep::Idle;
        }
        entry.last_seen = now;
        entry.step.clone()
    }

    pub fn set(&self, chat_id: &str, step: DialogueStep) {
        let mut sessions = self.inner.lock().unwrap();
        sessions.insert(
            chat_id.to_string(),
            SessionEntry {
                step,
                last_seen: Instant::now(),
            },
        );
    }

    /// Returns the identity to Idle without dropping the entry.
    pub fn reset(&self, chat_id: &str) {
        self.set(chat_id, DialogueStep::Idle);
    }

    /// Drops the entry entirely.
    pub fn delete(&self, chat_id: &str) {
        self.inner.lock().unwrap().remove(chat_id);
    }

    /// Removes entries idle past the TTL. Returns how many were dropped.
    pub fn sweep(&self) -> usize {
        let mut sessions = self.inner.lock().unwrap();
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.ttl);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
