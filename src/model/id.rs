//! Entity ids and id generation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// An opaque, stable entity identifier. Assigned once at creation and never
/// reused.
///
/// Ids are fixed-width strings: thirteen digits of unix milliseconds followed
/// by a three-digit per-process sequence number. Because every id has the
/// same width and is zero-padded, lexicographic comparison preserves creation
/// order, and descending lexicographic order means "newest first". This is
/// the single id representation used by every entity kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        EntityId(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        EntityId(value.to_string())
    }
}

/// Generates creation-ordered entity ids.
#[derive(Debug, Default)]
pub struct IdGen {
    seq: AtomicU64,
}

impl IdGen {
    /// Returns a fresh id. Ids from one generator are strictly increasing as
    /// long as fewer than a thousand are minted in a single millisecond.
    pub fn next(&self) -> EntityId {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) % 1000;
        EntityId(format!("{millis:013}{seq:03}"))
    }
}
