use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::error::{AppError, AppResult};

/// Failure observable both from the state cell and from a `refetch` caller
pub type SharedError = Arc<AppError>;

type BoxedFuture<T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send>>;
type BoxedProducer<T> = Box<dyn Fn() -> BoxedFuture<T> + Send + Sync>;

/// Point-in-time view of a fetch controller's state
///
/// `data` holds the last successful value; it survives a later failure, so a
/// non-`None` `error` is authoritative over whatever `data` still contains.
#[derive(Debug, Clone)]
pub struct FetchSnapshot<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<SharedError>,
}

struct Cell<T> {
    data: Option<T>,
    loading: bool,
    error: Option<SharedError>,
}

struct Inner<T> {
    producer: BoxedProducer<T>,
    cell: Mutex<Cell<T>>,
    /// Generation of the most recently started invocation. A completion is
    /// only applied while its starting generation is still the current one:
    /// last invocation started wins, not last to complete.
    generation: AtomicU64,
    /// Cleared on teardown; completions arriving afterwards are discarded
    alive: AtomicBool,
}

impl<T: Send + 'static> Inner<T> {
    /// Starts a new invocation: bumps the generation, flags loading, clears
    /// the previous error, and hands back the producer future to await.
    fn begin(&self) -> (u64, BoxedFuture<T>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut cell = self.cell.lock();
            cell.loading = true;
            cell.error = None;
        }

        (generation, (self.producer)())
    }

    /// Applies a completed invocation's result, unless it has gone stale
    ///
    /// The staleness checks run while holding the cell lock. `begin` and
    /// `reset` both bump the generation before touching the cell, so checking
    /// under the same lock leaves no window for a stale completion to pass
    /// the comparison and then write over a newer invocation's state.
    fn apply(&self, generation: u64, result: Result<T, SharedError>) {
        let mut cell = self.cell.lock();

        if !self.alive.load(Ordering::SeqCst) {
            tracing::debug!(generation, "fetch result arrived after teardown, discarding");
            return;
        }

        if generation != self.generation.load(Ordering::SeqCst) {
            tracing::debug!(generation, "fetch result superseded by a newer invocation, discarding");
            return;
        }

        match result {
            Ok(value) => {
                cell.data = Some(value);
                cell.loading = false;
            }
            Err(error) => {
                // Keep stale data in place; callers treat error as authoritative
                cell.error = Some(error);
                cell.loading = false;
            }
        }
    }

    /// Runs one invocation without keeping the controller alive
    ///
    /// Only a weak reference is held across the await, so dropping the
    /// controller while the producer is in flight tears the whole thing down
    /// and the late result is silently dropped.
    async fn run_detached(weak: Weak<Inner<T>>) {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let (generation, fut) = inner.begin();
        drop(inner);

        let result = fut.await.map_err(Arc::new);

        if let Some(inner) = weak.upgrade() {
            inner.apply(generation, result);
        }
    }
}

/// Generic asynchronous data-loading controller
///
/// Wraps a zero-argument async producer and tracks `{data, loading, error}`
/// across invocations. Every screen-level remote read in the app (latest
/// list, search results, detail view, trending tiles) runs through one of
/// these. The producer gets no cancellation token and no timeout; a hung
/// producer leaves `loading` set until a newer invocation supersedes it.
pub struct FetchState<T> {
    inner: Arc<Inner<T>>,
}

impl<T: Clone + Send + 'static> FetchState<T> {
    /// Creates a controller around `producer`
    ///
    /// With `auto_start` the first invocation is spawned onto the runtime
    /// rather than run inline, so `loading` is observably true before any
    /// result can land.
    pub fn new<F, Fut>(producer: F, auto_start: bool) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        let inner = Arc::new(Inner {
            producer: Box::new(move || Box::pin(producer()) as BoxedFuture<T>),
            cell: Mutex::new(Cell {
                data: None,
                loading: false,
                error: None,
            }),
            generation: AtomicU64::new(0),
            alive: AtomicBool::new(true),
        });

        if auto_start {
            let weak = Arc::downgrade(&inner);
            tokio::spawn(Inner::run_detached(weak));
        }

        Self { inner }
    }

    /// Starts a new invocation and returns its outcome to the caller
    ///
    /// Shared state is updated as well, but only while this invocation is
    /// still the current generation; a `refetch` that was superseded mid
    /// flight still hands its own result (or failure) back to its caller.
    pub async fn refetch(&self) -> Result<T, SharedError> {
        let (generation, fut) = self.inner.begin();

        match fut.await {
            Ok(value) => {
                self.inner.apply(generation, Ok(value.clone()));
                Ok(value)
            }
            Err(error) => {
                let error = Arc::new(error);
                self.inner.apply(generation, Err(error.clone()));
                Err(error)
            }
        }
    }

    /// Synchronously clears to `{data: None, error: None, loading: false}`
    ///
    /// Never starts an invocation. The generation is advanced so a result in
    /// flight at reset time cannot resurrect the cleared state.
    pub fn reset(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);

        let mut cell = self.inner.cell.lock();
        cell.data = None;
        cell.error = None;
        cell.loading = false;
    }

    /// Freezes the controller: no further state writes occur and any
    /// in-flight completion is discarded. Also runs on drop.
    pub fn teardown(&self) {
        // Taken so the flag flips strictly before or after any in-progress
        // apply, never in the middle of one
        let _cell = self.inner.cell.lock();
        self.inner.alive.store(false, Ordering::SeqCst);
    }

    /// Returns a cloned view of the current state
    pub fn snapshot(&self) -> FetchSnapshot<T> {
        let cell = self.inner.cell.lock();
        FetchSnapshot {
            data: cell.data.clone(),
            loading: cell.loading,
            error: cell.error.clone(),
        }
    }
}

impl<T> Drop for FetchState<T> {
    fn drop(&mut self) {
        let _cell = self.inner.cell.lock();
        self.inner.alive.store(false, Ordering::SeqCst);
    }
}
