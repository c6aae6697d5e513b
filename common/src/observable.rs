//! Observable state cell with replay-one subscriptions.
//!
//! An [`Observable`] holds a current value and a list of subscriber channels.
//! Subscribing yields the current value first, then every value published by
//! later mutations, in mutation order.

use parking_lot::Mutex;
use tokio::sync::mpsc;

struct Inner<T> {
    value: T,
    subscribers: Vec<mpsc::UnboundedSender<T>>,
}

impl<T: Clone> Inner<T> {
    fn publish(&mut self) {
        let value = &self.value;
        self.subscribers.retain(|tx| tx.send(value.clone()).is_ok());
    }
}

/// Current value plus push notification on every change.
pub struct Observable<T> {
    inner: Mutex<Inner<T>>,
}

impl<T: Clone + Send> Observable<T> {
    /// Create a new observable holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(Inner {
                value,
                subscribers: Vec::new(),
            }),
        }
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> T {
        self.inner.lock().value.clone()
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, value: T) {
        let mut inner = self.inner.lock();
        inner.value = value;
        inner.publish();
    }

    /// Mutate the value in place and notify subscribers.
    ///
    /// Returns the new value.
    pub fn update<F>(&self, f: F) -> T
    where
        F: FnOnce(&mut T),
    {
        let mut inner = self.inner.lock();
        f(&mut inner.value);
        inner.publish();
        inner.value.clone()
    }

    /// Subscribe to changes. The subscription starts with the current value.
    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();
        // The receiver is alive, so this cannot fail.
        let _ = tx.send(inner.value.clone());
        inner.subscribers.push(tx);
        Subscription { rx }
    }

    /// Number of live subscribers as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}

impl<T: Clone + Send + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Receiving end of an [`Observable`] subscription.
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    /// Wait for the next published value.
    ///
    /// Returns `None` once the observable has been dropped and every
    /// pending value has been received.
    pub async fn next(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Take the next pending value without waiting.
    pub fn try_next(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Drain pending values and return the most recent one.
    pub fn latest(&mut self) -> Option<T> {
        let mut last = None;
        while let Ok(value) = self.rx.try_recv() {
            last = Some(value);
        }
        last
    }
}
