//! Counter components used by the testing demos.
//!
//! [`Counter`] keeps local state and pushes changes to registered
//! callbacks. [`CounterService`] is the shared flavor: one current
//! value broadcast to any number of subscribers over a watch channel.

use tokio::sync::watch;

type Subscriber = Box<dyn Fn(i64) + Send>;

/// A counter with local state and an output event per change.
#[derive(Default)]
pub struct Counter {
    count: i64,
    subscribers: Vec<Subscriber>,
}

impl Counter {
    #[must_use]
    pub fn new(start_count: i64) -> Self {
        Self {
            count: start_count,
            subscribers: Vec::new(),
        }
    }

    #[must_use]
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Register a callback invoked synchronously on every change.
    pub fn subscribe(&mut self, subscriber: impl Fn(i64) + Send + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn increment(&mut self) {
        self.count += 1;
        self.notify();
    }

    pub fn decrement(&mut self) {
        self.count -= 1;
        self.notify();
    }

    pub fn reset(&mut self, count: i64) {
        self.count = count;
        self.notify();
    }

    fn notify(&self) {
        for subscriber in &self.subscribers {
            subscriber(self.count);
        }
    }
}

/// Shared observable counter: a single writer, one current value, N
/// subscribers notified on change.
#[derive(Debug)]
pub struct CounterService {
    count: i64,
    tx: watch::Sender<i64>,
}

impl CounterService {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { count: 0, tx }
    }

    #[must_use]
    pub fn count(&self) -> i64 {
        self.count
    }

    /// A receiver holding the current value; changes are observed with
    /// `changed()` or `borrow_and_update()`.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<i64> {
        self.tx.subscribe()
    }

    pub fn increment(&mut self) {
        self.count += 1;
        self.notify();
    }

    pub fn decrement(&mut self) {
        self.count -= 1;
        self.notify();
    }

    pub fn reset(&mut self, count: i64) {
        self.count = count;
        self.notify();
    }

    fn notify(&self) {
        // send_replace keeps the current value even with no subscribers.
        self.tx.send_replace(self.count);
    }
}

impl Default for CounterService {
    fn default() -> Self {
        Self::new()
    }
}
