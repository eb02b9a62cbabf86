//! Cart change notifications.
//!
//! A [`CartEvents`] channel is owned by whoever owns the cart (the app state
//! in the server, the command runner in the CLI) and passed by reference to
//! every [`CartStore`](crate::cart::CartStore). Listeners receive no payload:
//! on notification they re-read whatever state they display.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Wire name of the signal, sent to HTTP clients as an `HX-Trigger` value.
pub const CART_UPDATED: &str = "cart-updated";

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by [`CartEvents::subscribe`], consumed by `unsubscribe`.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "dropping a subscription without unsubscribing leaks the listener"]
pub struct Subscription(u64);

/// Publish/subscribe channel for "the cart changed".
#[derive(Default)]
pub struct CartEvents {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, Listener)>>,
    sent: AtomicU64,
}

impl std::fmt::Debug for CartEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartEvents")
            .field("listeners", &self.listener_count())
            .field("sent", &self.sent())
            .finish()
    }
}

impl CartEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`; it runs on every subsequent [`notify`](Self::notify).
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        Subscription(id)
    }

    /// Remove a listener. Returns `false` if it was already gone.
    #[allow(clippy::needless_pass_by_value)]
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != subscription.0);
        listeners.len() != before
    }

    /// Signal every current listener.
    pub fn notify(&self) {
        self.sent.fetch_add(1, Ordering::Relaxed);

        // Snapshot first so a listener may subscribe or unsubscribe.
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        tracing::debug!(listeners = listeners.len(), "Cart updated");
        for listener in listeners {
            listener();
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of notifications sent so far.
    #[must_use]
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn test_notify_reaches_all_listeners() {
        let events = CartEvents::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let a = Arc::clone(&hits);
        let _first = events.subscribe(move || {
            a.fetch_add(1, Ordering::SeqCst);
        });
        let b = Arc::clone(&hits);
        let _second = events.subscribe(move || {
            b.fetch_add(10, Ordering::SeqCst);
        });

        events.notify();
        assert_eq!(hits.load(Ordering::SeqCst), 11);
        assert_eq!(events.sent(), 1);
    }

    #[test]
    fn test_unsubscribed_listener_is_silent() {
        let events = CartEvents::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let sub = events.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let stale = Subscription(sub.0);

        assert!(events.unsubscribe(sub));
        assert!(!events.unsubscribe(stale));
        events.notify();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(events.listener_count(), 0);
    }

    #[test]
    fn test_listener_may_subscribe_during_notify() {
        let events = Arc::new(CartEvents::new());
        let inner = Arc::clone(&events);
        let _sub = events.subscribe(move || {
            let _ = inner.subscribe(|| {});
        });
        events.notify();
        assert_eq!(events.listener_count(), 2);
    }
}
