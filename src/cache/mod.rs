//! Image existence cache
//!
//! Pages only render an image when the file behind it exists. Checking that
//! means touching the filesystem or the network, so results are memoized per
//! path. The cache is an ordinary value owned by whoever composes the site
//! (usually behind an `Arc`), with the actual lookup delegated to an
//! [`ExistenceProbe`] chosen at construction.
//!
//! Concurrent first lookups of the same path share one probe. Entries may
//! carry an expiry; an expired entry is dropped on the next read and the path
//! is probed again.

mod probe;
mod watch;

pub use probe::{ExistenceProbe, FsProbe, HttpProbe, ProbeError};
pub use watch::{CheckState, ImageExistsWatcher};

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::time::Instant;

/// Lifetime used by [`ImageCache::insert_with_expiry`] when none is given
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(5 * 60);

/// A resolved lookup
#[derive(Debug, Clone, Copy)]
struct Entry {
    exists: bool,
    expires_at: Option<Instant>,
}

impl Entry {
    /// A TTL too large to represent as an instant never expires
    fn new(exists: bool, ttl: Option<Duration>) -> Self {
        Self {
            exists,
            expires_at: ttl.and_then(|ttl| Instant::now().checked_add(ttl)),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| Instant::now() >= expires_at)
    }
}

/// One cache slot; unset while its probe is in flight
type Slot = Arc<OnceCell<Entry>>;

/// Memoized image existence checks
pub struct ImageCache<P> {
    probe: P,
    ttl: Option<Duration>,
    slots: Mutex<HashMap<String, Slot>>,
}

impl<P: ExistenceProbe> ImageCache<P> {
    /// Create a cache whose entries live as long as the cache
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            ttl: None,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Create a cache whose probed entries expire after `ttl`
    pub fn with_expiry(probe: P, ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::new(probe)
        }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Check whether the image at `path` exists
    ///
    /// An empty path is reported missing without touching the cache. Probe
    /// failures are logged and count as missing; they are cached like any
    /// other answer.
    pub async fn check(&self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }

        let slot = self.slot(path);
        let entry = slot
            .get_or_init(|| async {
                let exists = match self.probe.probe(path).await {
                    Ok(exists) => exists,
                    Err(e) => {
                        tracing::warn!("Failed to check image {:?}: {}", path, e);
                        false
                    }
                };
                tracing::debug!("Image {:?} exists: {}", path, exists);
                Entry::new(exists, self.ttl)
            })
            .await;

        entry.exists
    }

    /// Get the live slot for `path`, replacing an expired one
    fn slot(&self, path: &str) -> Slot {
        let mut slots = self.slots.lock();
        if let Some(slot) = slots.get(path) {
            if !slot.get().is_some_and(Entry::is_expired) {
                return Arc::clone(slot);
            }
        }

        let slot = Slot::default();
        slots.insert(path.to_string(), Arc::clone(&slot));
        slot
    }

    /// Get a cached answer without probing
    ///
    /// Expired entries are evicted and reported absent.
    pub fn get(&self, path: &str) -> Option<bool> {
        let mut slots = self.slots.lock();
        let entry = *slots.get(path)?.get()?;
        if entry.is_expired() {
            slots.remove(path);
            return None;
        }
        Some(entry.exists)
    }

    /// Record an answer that never expires
    pub fn insert(&self, path: &str, exists: bool) {
        self.store(path, Entry::new(exists, None));
    }

    /// Record an answer that expires after `ttl` ([`DEFAULT_EXPIRY`] if `None`)
    pub fn insert_with_expiry(&self, path: &str, exists: bool, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(DEFAULT_EXPIRY);
        self.store(path, Entry::new(exists, Some(ttl)));
    }

    fn store(&self, path: &str, entry: Entry) {
        let slot = Slot::new(OnceCell::new_with(Some(entry)));
        self.slots.lock().insert(path.to_string(), slot);
    }

    /// Forget every cached answer
    pub fn clear(&self) {
        self.slots.lock().clear();
    }

    /// Number of resolved, unexpired entries
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.get().is_some_and(|entry| !entry.is_expired()))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Probe over a fixed set of paths that counts its calls
    #[derive(Default)]
    struct CountingProbe {
        existing: HashSet<String>,
        calls: AtomicUsize,
        delay: Option<Duration>,
        fail: bool,
    }

    impl CountingProbe {
        fn with(paths: &[&str]) -> Self {
            Self {
                existing: paths.iter().map(|p| p.to_string()).collect(),
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ExistenceProbe for CountingProbe {
        async fn probe(&self, path: &str) -> Result<bool, ProbeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ProbeError::InvalidPath(path.to_string()));
            }
            Ok(self.existing.contains(path))
        }
    }

    #[tokio::test]
    async fn test_check_memoizes() {
        let cache = ImageCache::new(CountingProbe::with(&["/a.png"]));
        cache.clear();
        assert_eq!(cache.len(), 0);

        assert!(cache.check("/a.png").await);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.probe().calls(), 1);

        assert!(cache.check("/a.png").await);
        assert_eq!(cache.probe().calls(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_images_are_cached() {
        let cache = ImageCache::new(CountingProbe::with(&[]));
        assert!(!cache.check("/missing.png").await);
        assert!(!cache.check("/missing.png").await);
        assert_eq!(cache.probe().calls(), 1);
        assert_eq!(cache.get("/missing.png"), Some(false));
    }

    #[tokio::test]
    async fn test_empty_path() {
        let cache = ImageCache::new(CountingProbe::with(&[""]));
        assert!(!cache.check("").await);
        assert_eq!(cache.probe().calls(), 0);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_probe_failure_counts_as_missing() {
        let probe = CountingProbe {
            fail: true,
            ..CountingProbe::with(&["/a.png"])
        };
        let cache = ImageCache::new(probe);
        assert!(!cache.check("/a.png").await);
        assert_eq!(cache.get("/a.png"), Some(false));
    }

    #[tokio::test]
    async fn test_clear_forces_new_probe() {
        let cache = ImageCache::new(CountingProbe::with(&["/a.png", "/b.png"]));
        cache.check("/a.png").await;
        cache.check("/b.png").await;
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("/a.png"), None);

        assert!(cache.check("/a.png").await);
        assert_eq!(cache.probe().calls(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_checks_share_one_probe() {
        let probe = CountingProbe {
            delay: Some(Duration::from_millis(20)),
            ..CountingProbe::with(&["/hero.jpg"])
        };
        let cache = Arc::new(ImageCache::new(probe));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.check("/hero.jpg").await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap());
        }
        assert_eq!(cache.probe().calls(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("/hero.jpg"), Some(true));
    }

    #[tokio::test]
    async fn test_concurrent_checks_of_different_paths() {
        let probe = CountingProbe {
            delay: Some(Duration::from_millis(5)),
            ..CountingProbe::with(&["/a.png", "/c.png"])
        };
        let cache = ImageCache::new(probe);

        let (a, b, c) = tokio::join!(
            cache.check("/a.png"),
            cache.check("/b.png"),
            cache.check("/c.png")
        );
        assert_eq!((a, b, c), (true, false, true));
        assert_eq!(cache.probe().calls(), 3);
        assert_eq!(cache.len(), 3);
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = ImageCache::new(CountingProbe::with(&[]));
        cache.insert("/manual.png", true);
        assert_eq!(cache.get("/manual.png"), Some(true));
        assert!(cache.check("/manual.png").await);
        assert_eq!(cache.probe().calls(), 0);
        assert_eq!(cache.get("/unknown.png"), None);
    }

    #[tokio::test]
    async fn test_expired_entries_are_evicted() {
        let cache = ImageCache::new(CountingProbe::with(&["/a.png"]));
        cache.insert_with_expiry("/a.png", false, Some(Duration::ZERO));
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get("/a.png"), None);

        cache.insert_with_expiry("/b.png", true, None);
        assert_eq!(cache.get("/b.png"), Some(true));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_huge_expiry_never_expires() {
        let huge = Duration::from_secs(u64::MAX);
        let cache = ImageCache::with_expiry(CountingProbe::with(&["/a.png"]), huge);
        assert!(cache.check("/a.png").await);
        assert!(cache.check("/a.png").await);
        assert_eq!(cache.probe().calls(), 1);

        cache.insert_with_expiry("/b.png", true, Some(huge));
        assert_eq!(cache.get("/b.png"), Some(true));
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_expired_check_reprobes() {
        let cache = ImageCache::with_expiry(CountingProbe::with(&["/a.png"]), Duration::ZERO);
        assert!(cache.check("/a.png").await);
        assert!(cache.check("/a.png").await);
        assert_eq!(cache.probe().calls(), 2);
    }

    #[tokio::test]
    async fn test_fs_backed_cache() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logo.svg"), b"<svg/>").unwrap();

        let cache = ImageCache::new(FsProbe::new(dir.path()));
        assert!(cache.check("/logo.svg").await);
        assert!(!cache.check("/nope.svg").await);
        assert!(!cache.check("/../escape.svg").await);
        assert_eq!(cache.len(), 3);
    }
}
