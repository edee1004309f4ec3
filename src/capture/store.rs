//! Bounded in-memory request log.
//!
//! # Responsibilities
//! - Own the ordered sequence of recorded snapshots (newest first)
//! - Enforce the capacity bound on every insert
//! - Serialize concurrent insert/clear/read access
//!
//! # Design Decisions
//! - Coarse mutex at insert/clear/read granularity; no finer locking needed
//! - Entries are Arc-shared so read_all is a handle copy, not a deep clone
//! - Insert cannot fail; past capacity the oldest entries are dropped

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::capture::snapshot::RequestSnapshot;

/// Default number of snapshots retained.
pub const DEFAULT_CAPACITY: usize = 100;

/// Process-wide store of recorded requests, newest first.
///
/// Constructed once at startup and shared via `Arc` with every handler.
/// The store exclusively owns the sequence; readers only ever receive
/// `Arc` handles to immutable snapshots.
pub struct RequestLog {
    entries: Mutex<VecDeque<Arc<RequestSnapshot>>>,
    capacity: usize,
}

impl RequestLog {
    /// Create an empty log bounded to `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Record a snapshot at the front of the log, dropping the oldest
    /// entries once the capacity bound is exceeded.
    pub fn insert(&self, snapshot: RequestSnapshot) {
        tracing::info!(
            method = %snapshot.method,
            path = %snapshot.url,
            source_ip = %snapshot.source_ip,
            timestamp = %snapshot.timestamp,
            "Request recorded"
        );
        let mut entries = self.entries.lock().expect("request log mutex poisoned");
        entries.push_front(Arc::new(snapshot));
        entries.truncate(self.capacity);
    }

    /// Reset the log to empty.
    pub fn clear(&self) {
        self.entries
            .lock()
            .expect("request log mutex poisoned")
            .clear();
        tracing::debug!("Request log cleared");
    }

    /// Current contents, newest first. The returned handles cannot mutate
    /// the log.
    pub fn read_all(&self) -> Vec<Arc<RequestSnapshot>> {
        self.entries
            .lock()
            .expect("request log mutex poisoned")
            .iter()
            .cloned()
            .collect()
    }

    /// Number of recorded snapshots.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("request log mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RequestLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, Method, Uri};

    fn snapshot(path: &str) -> RequestSnapshot {
        let uri: Uri = path.parse().unwrap();
        RequestSnapshot::capture(
            &Method::POST,
            &uri,
            &HeaderMap::new(),
            "127.0.0.1:4000".parse().unwrap(),
            b"",
        )
    }

    #[test]
    fn test_capacity_invariant() {
        let log = RequestLog::new(DEFAULT_CAPACITY);
        for n in 0..250 {
            log.insert(snapshot(&format!("/webhook/{n}")));
            assert!(log.len() <= DEFAULT_CAPACITY);
        }
        assert_eq!(log.len(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_newest_first_ordering() {
        let log = RequestLog::new(10);
        log.insert(snapshot("/webhook/a"));
        log.insert(snapshot("/webhook/b"));

        let entries = log.read_all();
        assert_eq!(entries[0].url, "/webhook/b");
        assert_eq!(entries[1].url, "/webhook/a");
        // later insert is newer even if the millisecond ids collide
        assert!(entries[0].id >= entries[1].id);
    }

    #[test]
    fn test_eviction_drops_exactly_the_oldest() {
        let log = RequestLog::new(3);
        for n in 0..4 {
            log.insert(snapshot(&format!("/webhook/{n}")));
        }
        let entries = log.read_all();
        let urls: Vec<&str> = entries.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["/webhook/3", "/webhook/2", "/webhook/1"]);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let log = RequestLog::new(10);
        log.insert(snapshot("/webhook"));
        log.insert(snapshot("/webhook"));

        log.clear();
        assert!(log.read_all().is_empty());

        log.clear();
        assert!(log.read_all().is_empty());
    }

    #[test]
    fn test_read_all_is_a_detached_view() {
        let log = RequestLog::new(10);
        log.insert(snapshot("/webhook"));

        let mut view = log.read_all();
        view.clear();
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_concurrent_inserts_hold_the_bound() {
        let log = std::sync::Arc::new(RequestLog::new(50));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let log = log.clone();
                std::thread::spawn(move || {
                    for n in 0..100 {
                        log.insert(snapshot(&format!("/webhook/{n}")));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(log.len(), 50);
    }
}
