//! In-memory lead snapshot store.
//!
//! Holds exactly one immutable snapshot at a time; a refresh builds a
//! complete replacement and swaps it atomically. Consumers clone the
//! `Arc` and never observe a partially updated set. A single-flight flag
//! rejects a refresh trigger while another refresh is outstanding.

use crate::models::Lead;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Where the current snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotOrigin {
    /// No fetch has populated the store yet.
    Empty,
    /// Live sheet data.
    Sheet,
    /// Built-in fallback data after a failed first fetch.
    Seed,
}

/// One immutable, fully normalized lead set.
#[derive(Debug, Clone)]
pub struct LeadSnapshot {
    pub leads: Arc<Vec<Lead>>,
    /// Monotonically increasing per replacement.
    pub version: u64,
    /// SHA-256 over the normalized content; derived caches key on this, so
    /// identical data keeps its cache entries across refreshes.
    pub fingerprint: String,
    pub fetched_at: DateTime<Utc>,
    pub origin: SnapshotOrigin,
}

pub struct LeadStore {
    current: RwLock<Arc<LeadSnapshot>>,
    next_version: AtomicU64,
    refreshing: AtomicBool,
}

impl LeadStore {
    pub fn new() -> Self {
        let empty = LeadSnapshot {
            leads: Arc::new(Vec::new()),
            version: 0,
            fingerprint: fingerprint(&[]),
            fetched_at: Utc::now(),
            origin: SnapshotOrigin::Empty,
        };
        Self {
            current: RwLock::new(Arc::new(empty)),
            next_version: AtomicU64::new(1),
            refreshing: AtomicBool::new(false),
        }
    }

    /// Current snapshot. Cheap: clones the `Arc`, not the leads.
    pub fn snapshot(&self) -> Arc<LeadSnapshot> {
        self.current.read().expect("lead store lock poisoned").clone()
    }

    /// Whether the store has never held any leads.
    pub fn is_empty(&self) -> bool {
        self.snapshot().leads.is_empty()
    }

    /// Atomically installs a new snapshot and returns it.
    pub fn replace(&self, leads: Vec<Lead>, origin: SnapshotOrigin) -> Arc<LeadSnapshot> {
        let version = self.next_version.fetch_add(1, Ordering::Relaxed);
        let snapshot = Arc::new(LeadSnapshot {
            fingerprint: fingerprint(&leads),
            leads: Arc::new(leads),
            version,
            fetched_at: Utc::now(),
            origin,
        });
        *self.current.write().expect("lead store lock poisoned") = snapshot.clone();
        snapshot
    }

    /// Claims the single-flight refresh slot. Returns `None` while another
    /// refresh holds it; the guard releases the slot on drop.
    pub fn try_begin_refresh(&self) -> Option<RefreshGuard<'_>> {
        if self
            .refreshing
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            Some(RefreshGuard { store: self })
        } else {
            None
        }
    }
}

impl Default for LeadStore {
    fn default() -> Self {
        Self::new()
    }
}

pub struct RefreshGuard<'a> {
    store: &'a LeadStore,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.store.refreshing.store(false, Ordering::Release);
    }
}

/// Content hash of a normalized lead set. Field and record separators keep
/// adjacent values from colliding.
fn fingerprint(leads: &[Lead]) -> String {
    let mut hasher = Sha256::new();
    for lead in leads {
        hasher.update(lead.id.to_le_bytes());
        for field in [
            lead.date.as_str(),
            lead.name.as_str(),
            lead.mobile.as_str(),
            lead.occupation.as_str(),
            lead.unit_type.as_str(),
            lead.budget.as_str(),
            lead.source.label(),
            lead.representative.as_str(),
            lead.discussion.as_str(),
            lead.visit_status.as_str(),
            lead.deal_status.as_str(),
        ] {
            hasher.update(field.as_bytes());
            hasher.update([0x1f]);
        }
        hasher.update([lead.rating, 0x1e]);
    }
    hex::encode(hasher.finalize())
}
