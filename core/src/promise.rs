//! Single-assignment outcome container.
//!
//! Every API operation returns an [`Promise`] immediately and settles it
//! from the network completion task. Consumers pick their mode: block with
//! [`Promise::get`], register a handler at creation time, or suspend an
//! async task with [`Promise::value`].

use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use tokio::sync::Notify;

/// Completion handler invoked synchronously when a promise settles.
pub type OnResult<T> = Box<dyn FnOnce(T) + Send>;

/// A thread-safe container whose value is assigned exactly once.
///
/// [`set`](Promise::set) may be called from any thread; the first call wins
/// and later calls are silent no-ops, so duplicate completion signals (for
/// example from pagination error paths) are absorbed. All waiters observe
/// the same final value.
pub struct Promise<T> {
    state: Mutex<State<T>>,
    cond: Condvar,
    notify: Notify,
}

struct State<T> {
    value: Option<T>,
    handler: Option<OnResult<T>>,
}

impl<T: Clone + Send + 'static> Promise<T> {
    /// An unset promise with no completion handler.
    pub fn new() -> Arc<Self> {
        Self::with_handler(None)
    }

    /// An unset promise. The handler, when given, fires synchronously on the
    /// settling thread with a copy of the value, before waiters are woken.
    pub fn with_handler(handler: Option<OnResult<T>>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                value: None,
                handler,
            }),
            cond: Condvar::new(),
            notify: Notify::new(),
        })
    }

    /// Settle the promise. The first call wins; later calls are no-ops.
    pub fn set(&self, value: T) {
        let fired = {
            let mut state = self.lock();
            if state.value.is_some() {
                return;
            }
            let handler = state.handler.take();
            let snapshot = handler.as_ref().map(|_| value.clone());
            state.value = Some(value);
            handler.zip(snapshot)
        };
        if let Some((handler, value)) = fired {
            handler(value);
        }
        self.cond.notify_all();
        self.notify.notify_waiters();
    }

    /// The value if already settled, without blocking.
    pub fn try_get(&self) -> Option<T> {
        self.lock().value.clone()
    }

    /// Block the calling thread until the promise settles.
    ///
    /// Returns immediately if already settled. Not intended for async
    /// contexts; use [`value`](Promise::value) there instead.
    pub fn wait(&self) {
        let mut state = self.lock();
        while state.value.is_none() {
            state = match self.cond.wait(state) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }

    /// Block until settled, then return a copy of the value.
    pub fn get(&self) -> T {
        let mut state = self.lock();
        loop {
            if let Some(value) = &state.value {
                return value.clone();
            }
            state = match self.cond.wait(state) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }

    /// Suspend the calling task until settled, then return a copy of the value.
    pub async fn value(&self) -> T {
        loop {
            let notified = self.notify.notified();
            if let Some(value) = self.try_get() {
                return value;
            }
            notified.await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
