//! Short-lived, in-memory store of fixture listings keyed by calendar day.
//!
//! Staleness is checked on read: an entry is served only while
//! `now - captured_at < ttl`. Entries for different days coexist and each is
//! replaced wholesale on refresh. Nothing survives a restart.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::models::{CacheEntry, MatchRecord};

/// Source of "now" for TTL checks and day keys.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<std::sync::Mutex<DateTime<Utc>>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock {
            now: Arc::new(std::sync::Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|n| *n).unwrap_or_else(|p| *p.into_inner())
    }
}

/// Thread-safe day-keyed result cache.
#[derive(Clone)]
pub struct MatchCache {
    inner: Arc<RwLock<HashMap<NaiveDate, CacheEntry>>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl MatchCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        MatchCache {
            inner: Arc::new(RwLock::new(HashMap::new())),
            clock,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_live(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.captured_at) < self.ttl
    }

    /// A live entry for `day`, or `None` when absent or expired.
    pub async fn get(&self, day: NaiveDate) -> Option<CacheEntry> {
        let now = self.clock.now();
        let inner = self.inner.read().await;
        match inner.get(&day) {
            Some(entry) if self.is_live(entry, now) => Some(entry.clone()),
            Some(_) => {
                debug!("Cache entry for {} expired", day);
                None
            }
            None => None,
        }
    }

    /// Replace the entry for `day`, stamped with the current time.
    pub async fn put(&self, day: NaiveDate, source: &str, records: Vec<MatchRecord>) {
        let entry = CacheEntry {
            captured_at: self.clock.now(),
            source: source.to_string(),
            records,
        };
        self.inner.write().await.insert(day, entry);
    }

    /// Drop every expired entry. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut inner = self.inner.write().await;
        let before = inner.len();
        let ttl = self.ttl;
        inner.retain(|_, e| now.signed_duration_since(e.captured_at) < ttl);
        before - inner.len()
    }

    /// Number of stored entries, live or not.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
