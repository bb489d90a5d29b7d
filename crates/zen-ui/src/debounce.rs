//! Quiescence debouncer
//!
//! Each [`Debouncer::call`] replaces the stored arguments and restarts the
//! quiet period. The callback runs once, with the latest arguments, after
//! `delay` elapses with no further calls. Requires a tokio runtime.

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

type Callback<A> = Arc<dyn Fn(A) + Send + Sync>;

struct Inner<A> {
    delay: Duration,
    callback: Callback<A>,
    seq: AtomicU64,
    latest: Mutex<Option<A>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A> Inner<A> {
    fn abort_pending(&self) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }
}

/// Rate-limits a callback to the trailing edge of a burst
pub struct Debouncer<A> {
    inner: Arc<Inner<A>>,
}

impl<A> Clone for Debouncer<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> fmt::Debug for Debouncer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.inner.delay)
            .field("seq", &self.inner.seq.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<A: Send + 'static> Debouncer<A> {
    /// Wrap `callback` with a quiet period of `delay`
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                delay,
                callback: Arc::new(callback),
                seq: AtomicU64::new(0),
                latest: Mutex::new(None),
                pending: Mutex::new(None),
            }),
        }
    }

    /// Quiet period
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    /// Record `args` and (re)start the quiet period
    pub fn call(&self, args: A) {
        let seq = self.inner.seq.fetch_add(1, Ordering::SeqCst) + 1;
        *self.inner.latest.lock() = Some(args);
        self.inner.abort_pending();

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(inner.delay).await;
            if inner.seq.load(Ordering::SeqCst) != seq {
                return;
            }
            let args = inner.latest.lock().take();
            inner.pending.lock().take();
            if let Some(args) = args {
                (inner.callback)(args);
            }
        });
        *self.inner.pending.lock() = Some(handle);
    }

    /// Run the pending invocation now. Returns whether anything ran.
    pub fn flush(&self) -> bool {
        self.inner.seq.fetch_add(1, Ordering::SeqCst);
        self.inner.abort_pending();
        let args = self.inner.latest.lock().take();
        match args {
            Some(args) => {
                (self.inner.callback)(args);
                true
            }
            None => false,
        }
    }

    /// Drop the pending invocation without running it
    pub fn cancel(&self) {
        self.inner.seq.fetch_add(1, Ordering::SeqCst);
        self.inner.abort_pending();
        self.inner.latest.lock().take();
    }

    /// Whether an invocation is scheduled
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.latest.lock().is_some()
    }
}
