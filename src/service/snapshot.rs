use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::DEFAULT_SNAPSHOT_TTL;
use crate::models::Property;

/// Upper bound on pinned sessions; the oldest pin is evicted past it.
pub const MAX_PINNED_SESSIONS: usize = 1024;

/// Frozen view of the catalog that every page of one logical query is ranked against.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub id: u64,
    pub source: &'static str,
    pub taken_at: DateTime<Utc>,
    pub properties: Arc<[Property]>,
}

impl CatalogSnapshot {
    pub fn new(id: u64, source: &'static str, properties: Vec<Property>) -> Self {
        Self {
            id,
            source,
            taken_at: Utc::now(),
            properties: properties.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn has_featured(&self) -> bool {
        self.properties.iter().any(|p| p.featured)
    }
}

struct SessionEntry {
    query_key: String,
    snapshot: Arc<CatalogSnapshot>,
    pinned_at: Instant,
}

/// Pins one catalog snapshot per (session, query).
///
/// Paging through the same query reuses the pinned snapshot, so offsets stay
/// consistent even if the underlying catalog is refreshed. A new query in the
/// same session replaces the pin. Pins expire after `ttl`, and at most
/// `max_sessions` are held at once.
pub struct SnapshotStore {
    next_id: AtomicU64,
    ttl: Duration,
    max_sessions: usize,
    sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_SNAPSHOT_TTL, MAX_PINNED_SESSIONS)
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            next_id: AtomicU64::new(0),
            ttl,
            max_sessions: max_sessions.max(1),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Number of live pins.
    pub fn pinned(&self) -> usize {
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions
            .values()
            .filter(|entry| entry.pinned_at.elapsed() < self.ttl)
            .count()
    }

    /// Wrap freshly loaded properties in a snapshot with a new id.
    pub fn create(&self, source: &'static str, properties: Vec<Property>) -> Arc<CatalogSnapshot> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        Arc::new(CatalogSnapshot::new(id, source, properties))
    }

    /// Snapshot pinned for this session, if it was pinned for the same query.
    pub fn get(&self, session_id: &str, query_key: &str) -> Option<Arc<CatalogSnapshot>> {
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions
            .get(session_id)
            .filter(|entry| entry.query_key == query_key && entry.pinned_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.snapshot))
    }

    /// Pin `snapshot` for the session, dropping expired pins first and the
    /// oldest pin when the store is full.
    pub fn pin(&self, session_id: &str, query_key: &str, snapshot: Arc<CatalogSnapshot>) {
        debug!(session_id, snapshot = snapshot.id, "pinning catalog snapshot");
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);

        let ttl = self.ttl;
        sessions.retain(|_, entry| entry.pinned_at.elapsed() < ttl);

        if !sessions.contains_key(session_id) && sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.pinned_at)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                debug!(session_id = %oldest, "evicting oldest snapshot pin");
                sessions.remove(&oldest);
            }
        }

        sessions.insert(
            session_id.to_string(),
            SessionEntry {
                query_key: query_key.to_string(),
                snapshot,
                pinned_at: Instant::now(),
            },
        );
    }

    pub fn forget(&self, session_id: &str) {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.remove(session_id);
    }
}
