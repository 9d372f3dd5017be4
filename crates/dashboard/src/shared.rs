//! Shared derived streams with a keep-alive window.
//!
//! A `Shared<T>` owns one recomputation pipeline and fans its output out to
//! any number of observers. The first subscriber starts the pipeline; the
//! last one leaving arms a grace timer instead of tearing it down, so a
//! screen flicking away and back reuses the still-warm state. Only after the
//! window elapses with zero subscribers is the pipeline aborted and the
//! published value reset to its initial value, making the next subscription
//! start fresh.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use duka_store::live::{self, LivePublisher, Subscription};

/// Grace period between the last unsubscribe and pipeline teardown.
pub const KEEP_ALIVE: Duration = Duration::from_secs(5);

type StartFn<T> = dyn Fn(Arc<LivePublisher<T>>) -> JoinHandle<()> + Send + Sync;

#[derive(Debug)]
struct ShareState {
    subscribers: usize,
    pipeline: Option<JoinHandle<()>>,
    reaper: Option<JoinHandle<()>>,
}

struct SharedInner<T>
where
    T: Clone + Send + Sync + 'static,
{
    name: &'static str,
    initial: T,
    grace: Duration,
    publisher: Arc<LivePublisher<T>>,
    start: Box<StartFn<T>>,
    runtime: Handle,
    state: Mutex<ShareState>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A derived value shared by all of its observers.
pub struct Shared<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Arc<SharedInner<T>>,
}

impl<T> Shared<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Build a shared stream around a pipeline factory.
    ///
    /// `start` is invoked on each (re)start with the publisher to feed; the
    /// task it spawns is the single recomputation pipeline, aborted on
    /// teardown. Publishing is the pipeline's job from its first real
    /// computation on; until then observers see `initial`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        name: &'static str,
        initial: T,
        grace: Duration,
        start: impl Fn(Arc<LivePublisher<T>>) -> JoinHandle<()> + Send + Sync + 'static,
    ) -> Self {
        let (publisher, _) = live::channel(initial.clone());
        Self {
            inner: Arc::new(SharedInner {
                name,
                initial,
                grace,
                publisher: Arc::new(publisher),
                start: Box::new(start),
                runtime: Handle::current(),
                state: Mutex::new(ShareState {
                    subscribers: 0,
                    pipeline: None,
                    reaper: None,
                }),
            }),
        }
    }

    /// Attach an observer, starting the pipeline if none is running.
    ///
    /// Resubscribing inside the grace window cancels the pending teardown
    /// and replays the still-cached value without recomputation.
    pub fn subscribe(&self) -> SharedSubscription<T> {
        let inner = &self.inner;
        let mut state = lock(&inner.state);
        state.subscribers += 1;

        if let Some(reaper) = state.reaper.take() {
            reaper.abort();
        }
        if state.pipeline.is_none() {
            debug!(stream = inner.name, "starting shared pipeline");
            state.pipeline = Some((inner.start)(Arc::clone(&inner.publisher)));
        }

        SharedSubscription {
            sub: inner.publisher.query().subscribe(),
            shared: Arc::clone(inner),
        }
    }

    /// Whether the pipeline is currently running (live or in its grace
    /// window).
    pub fn is_live(&self) -> bool {
        lock(&self.inner.state).pipeline.is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.state).subscribers
    }
}

/// One observer's handle onto a shared derived stream.
///
/// Dropping the handle unsubscribes; dropping the last one arms the
/// keep-alive timer.
pub struct SharedSubscription<T>
where
    T: Clone + Send + Sync + 'static,
{
    sub: Subscription<T>,
    shared: Arc<SharedInner<T>>,
}

impl<T> SharedSubscription<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Receive the next value: the cached current value first, then every
    /// subsequent distinct recomputation.
    pub async fn recv(&mut self) -> Option<T> {
        self.sub.recv().await
    }
}

impl<T> Drop for SharedSubscription<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        let inner = Arc::clone(&self.shared);
        let mut state = lock(&inner.state);
        state.subscribers -= 1;
        if state.subscribers > 0 {
            return;
        }

        let reaper_inner = Arc::clone(&inner);
        let reaper = inner.runtime.spawn(async move {
            tokio::time::sleep(reaper_inner.grace).await;

            let mut state = lock(&reaper_inner.state);
            state.reaper = None;
            // A subscriber may have raced past the abort; never tear down
            // under them.
            if state.subscribers > 0 {
                return;
            }
            if let Some(pipeline) = state.pipeline.take() {
                pipeline.abort();
            }
            reaper_inner.publisher.publish(reaper_inner.initial.clone());
            debug!(stream = reaper_inner.name, "shared pipeline torn down");
        });
        state.reaper = Some(reaper);
    }
}
