//! Shared storage for fetched response bodies.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// A concurrency-safe bag of response bodies.
///
/// Entries carry no information about which target produced them, and the
/// order they are stored in is whatever order the fetches happened to finish
/// in. Cloning a cache is cheap and produces another handle to the same
/// storage, which is how the cache is handed to every fetch in a batch.
///
/// # Examples
///
/// ```
/// use batchget::ResultCache;
///
/// let cache = ResultCache::new();
/// let handle = cache.clone();
///
/// handle.insert("hello".to_owned());
///
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct ResultCache(Arc<Mutex<Vec<String>>>);

impl ResultCache {
    /// Create a new, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response body to the cache.
    pub fn insert(&self, body: String) {
        self.entries().push(body);
    }

    /// Get the number of bodies currently stored.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns true if nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy out every body currently stored.
    pub fn snapshot(&self) -> Vec<String> {
        self.entries().clone()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<String>> {
        // A panic while holding the lock cannot leave a `Vec` half-pushed, so
        // the data is still good.
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCache")
            .field("len", &self.len())
            .finish()
    }
}
