//! Observable image check for a changing path

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{ExistenceProbe, ImageCache};

/// Where a watched image check stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckState {
    /// No path to check
    #[default]
    Idle,
    /// A check for the current path is running
    Loading,
    /// The current path was checked
    Resolved(bool),
}

impl CheckState {
    pub fn exists(&self) -> bool {
        matches!(self, CheckState::Resolved(true))
    }

    pub fn loading(&self) -> bool {
        matches!(self, CheckState::Loading)
    }
}

/// Re-checks an image whenever its path changes and publishes the result
///
/// Results that arrive after the path has changed again are dropped, so
/// subscribers only ever see the state of the latest path.
pub struct ImageExistsWatcher<P> {
    cache: Arc<ImageCache<P>>,
    state: Arc<watch::Sender<CheckState>>,
    generation: Arc<AtomicU64>,
}

impl<P: ExistenceProbe + 'static> ImageExistsWatcher<P> {
    pub fn new(cache: Arc<ImageCache<P>>) -> Self {
        let (state, _) = watch::channel(CheckState::Idle);
        Self {
            cache,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Receive every state transition
    pub fn subscribe(&self) -> watch::Receiver<CheckState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> CheckState {
        *self.state.borrow()
    }

    /// Point the watcher at a new path
    ///
    /// An empty or absent path goes straight to [`CheckState::Idle`].
    /// Otherwise the state becomes [`CheckState::Loading`] and the returned
    /// task resolves it.
    pub fn set_path(&self, path: Option<&str>) -> Option<JoinHandle<()>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(path) = path.filter(|p| !p.is_empty()).map(str::to_string) else {
            self.state.send_replace(CheckState::Idle);
            return None;
        };
        self.state.send_replace(CheckState::Loading);

        let cache = Arc::clone(&self.cache);
        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);

        Some(tokio::spawn(async move {
            let exists = cache.check(&path).await;
            state.send_if_modified(|s| {
                if current.load(Ordering::SeqCst) != generation {
                    tracing::debug!("Dropping stale image check for {:?}", path);
                    return false;
                }
                *s = CheckState::Resolved(exists);
                true
            });
        }))
    }
}
