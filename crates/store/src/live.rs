//! Live query streams: replay-latest, multi-subscriber snapshot channels.
//!
//! A live query behaves as a continuously-updated cache with push
//! notification: subscribing always delivers the latest known value first,
//! then every subsequent published value. It is neither a one-shot future
//! nor an ephemeral event stream.
//!
//! Built on `tokio::sync::watch`, which gives the required semantics
//! directly: one value slot shared by all receivers, publish-order delivery,
//! and cheap fan-out. A subscriber that falls behind observes the latest
//! snapshot rather than every intermediate one; with whole-snapshot payloads
//! that is a fast-forward, never a reorder.

use tokio::sync::watch;

/// Create a connected publisher/query pair seeded with `initial`.
pub fn channel<T: Clone>(initial: T) -> (LivePublisher<T>, LiveQuery<T>) {
    let (tx, rx) = watch::channel(initial);
    (LivePublisher { tx }, LiveQuery { rx })
}

/// Producing side of a live query. One per table or derived pipeline.
#[derive(Debug)]
pub struct LivePublisher<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> LivePublisher<T> {
    /// Publish a new value to all current and future subscribers.
    ///
    /// Publishing with zero subscribers is valid; the value is retained and
    /// replayed to the next subscriber.
    pub fn publish(&self, value: T) {
        let _ = self.tx.send_replace(value);
    }

    /// Publish only when the value differs from the current one.
    ///
    /// Derived pipelines use this to conflate no-op recomputations, so
    /// observers see distinct state changes rather than every trigger.
    /// Returns whether a publish happened.
    pub fn publish_if_changed(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }

    /// A read handle onto this stream.
    pub fn query(&self) -> LiveQuery<T> {
        LiveQuery {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live read handles (queries and subscriptions).
    pub fn handle_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Read handle onto a live query stream. Cheap to clone.
#[derive(Debug, Clone)]
pub struct LiveQuery<T> {
    rx: watch::Receiver<T>,
}

impl<T: Clone> LiveQuery<T> {
    /// The latest committed value, without subscribing.
    pub fn latest(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Start a subscription. The first `recv` resolves immediately with the
    /// current value; later calls wait for subsequent publishes.
    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            rx: self.rx.clone(),
            deliver_current: true,
        }
    }
}

/// One subscriber's view of a live query.
///
/// Dropping the subscription is the only cancellation primitive.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: watch::Receiver<T>,
    deliver_current: bool,
}

impl<T: Clone> Subscription<T> {
    /// Receive the next value.
    ///
    /// Returns `None` once the publisher is gone and no newer value will
    /// ever arrive.
    pub async fn recv(&mut self) -> Option<T> {
        if self.deliver_current {
            self.deliver_current = false;
            return Some(self.rx.borrow_and_update().clone());
        }

        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
