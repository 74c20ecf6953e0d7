use serde::Deserialize;
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

/// How concurrent crawl tasks are kept from fetching the same address
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupPolicy {
    /// Check the registry before fetching and mark only after a successful fetch.
    ///
    /// Two branches that discover the same address at the same time can both
    /// pass the check, so the address may be fetched (and reported) more than
    /// once. At most one duplicate per concurrent referrer.
    MarkOnSuccess,

    /// Atomically reserve the address before fetching.
    ///
    /// At most one task fetches a given address at a time and none fetches it
    /// after it was marked visited. A failed fetch drops the reservation
    /// without marking, so a later branch may still retry the address.
    #[default]
    ReserveOnDispatch,
}

#[derive(Debug, Default)]
struct Entries {
    visited: HashSet<String>,
    in_flight: HashSet<String>,
}

/// Set of addresses already fetched during one crawl
///
/// Grows monotonically: addresses are never removed once marked. Reads take
/// the shared lock, marks and reservations take the exclusive lock.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    entries: RwLock<Entries>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the address has been marked visited
    pub fn contains(&self, address: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.visited.contains(address)
    }

    /// Marks the address visited. Marking twice is a no-op.
    pub fn mark_visited(&self, address: &str) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if !entries.visited.contains(address) {
            entries.visited.insert(address.to_string());
        }
    }

    /// Reserves the address for a single in-flight fetch
    ///
    /// Returns `None` if the address is already visited or reserved by another
    /// task. The check and the reservation happen under one exclusive lock.
    pub fn try_reserve(&self, address: &str) -> Option<Reservation<'_>> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.visited.contains(address) || entries.in_flight.contains(address) {
            return None;
        }
        entries.in_flight.insert(address.to_string());

        Some(Reservation {
            registry: self,
            address: address.to_string(),
            visited: false,
        })
    }

    /// Returns true if a task currently holds a reservation for the address
    pub fn is_reserved(&self, address: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.in_flight.contains(address)
    }

    /// Number of visited addresses
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, address: &str, visited: bool) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.in_flight.remove(address);
        if visited {
            entries.visited.insert(address.to_string());
        }
    }
}

/// An in-flight claim on an address
///
/// Dropping the reservation releases the claim without marking the address;
/// `complete` marks it visited and releases the claim in one step.
#[derive(Debug)]
pub struct Reservation<'a> {
    registry: &'a VisitedRegistry,
    address: String,
    visited: bool,
}

impl Reservation<'_> {
    /// Marks the reserved address visited
    pub fn complete(mut self) {
        self.visited = true;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        self.registry.release(&self.address, self.visited);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_mark_and_contains() {
        let registry = VisitedRegistry::new();
        assert!(!registry.contains("localhost"));
        assert!(registry.is_empty());

        registry.mark_visited("localhost");
        assert!(registry.contains("localhost"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_mark_is_idempotent() {
        let registry = VisitedRegistry::new();
        registry.mark_visited("a");
        registry.mark_visited("a");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_exact_string_match() {
        let registry = VisitedRegistry::new();
        registry.mark_visited("https://example.com");
        assert!(!registry.contains("https://example.com/"));
        assert!(!registry.contains("HTTPS://example.com"));
    }

    #[test]
    fn test_reservation_is_exclusive() {
        let registry = VisitedRegistry::new();
        let first = registry.try_reserve("a");
        assert!(first.is_some());
        assert!(registry.is_reserved("a"));
        assert!(registry.try_reserve("a").is_none());
        assert!(!registry.contains("a"));
    }

    #[test]
    fn test_dropped_reservation_can_be_retried() {
        let registry = VisitedRegistry::new();
        drop(registry.try_reserve("a"));

        assert!(!registry.is_reserved("a"));
        assert!(!registry.contains("a"));
        assert!(registry.try_reserve("a").is_some());
    }

    #[test]
    fn test_completed_reservation_marks_visited() {
        let registry = VisitedRegistry::new();
        let reservation = registry.try_reserve("a").unwrap();
        reservation.complete();

        assert!(registry.contains("a"));
        assert!(!registry.is_reserved("a"));
        assert!(registry.try_reserve("a").is_none());
    }

    #[test]
    fn test_cannot_reserve_visited_address() {
        let registry = VisitedRegistry::new();
        registry.mark_visited("a");
        assert!(registry.try_reserve("a").is_none());
    }

    #[test]
    fn test_concurrent_reservations_admit_exactly_one() {
        let registry = Arc::new(VisitedRegistry::new());
        let barrier = Arc::new(std::sync::Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    match registry.try_reserve("shared") {
                        Some(reservation) => {
                            reservation.complete();
                            1
                        }
                        None => 0,
                    }
                })
            })
            .collect();

        let admitted: i32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 1);
        assert!(registry.contains("shared"));
    }
}
