//! Visitation registry: the set of URLs already claimed by a crawl

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Set of URLs claimed for fetching during one crawl
///
/// Claiming is the only way in, and nothing is ever removed, so each URL
/// string is handed out to exactly one task no matter how many pages link
/// to it or how many tasks discover it at the same moment.
#[derive(Debug, Default)]
pub struct VisitationRegistry {
    claimed: Mutex<HashSet<String>>,
}

impl VisitationRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a URL if nobody has claimed it yet
    ///
    /// The membership check and the insertion happen under one lock.
    ///
    /// # Returns
    ///
    /// * `true` - The URL was unclaimed and now belongs to the caller
    /// * `false` - The URL was already claimed; nothing changed
    pub fn claim(&self, url: &str) -> bool {
        self.claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_string())
    }

    /// Number of claimed URLs
    pub fn len(&self) -> usize {
        self.claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been claimed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_first_claim_wins() {
        let registry = VisitationRegistry::new();
        assert!(registry.is_empty());

        assert!(registry.claim("http://a.test/"));
        assert!(!registry.claim("http://a.test/"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_urls_are_independent() {
        let registry = VisitationRegistry::new();
        assert!(registry.claim("http://a.test/one"));
        assert!(registry.claim("http://a.test/two"));
        assert_eq!(registry.len(), 2);
        assert!(registry.claim("http://a.test/three"));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_concurrent_claims_have_single_winner() {
        let registry = Arc::new(VisitationRegistry::new());
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let winners = Arc::clone(&winners);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        if registry.claim(&format!("http://a.test/{}", i)) {
                            winners.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 100);
        assert_eq!(registry.len(), 100);
    }
}
