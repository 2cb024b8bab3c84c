//! One-shot completion futures.
//!
//! A [`Completion`] is the awaitable half of a host-resolvable pair: the
//! engine awaits it while the host performs asynchronous work (typically
//! fetching another page of options), and the host resolves or fails it
//! through the matching [`CompletionHandle`].
//!
//! The pair is runtime-agnostic: it is a plain `std::future::Future` and can
//! be polled by any executor, or by hand in tests.
//!
//! # Example
//!
//! ```
//! use horizon_select_core::completion_pair;
//!
//! let (handle, completion) = completion_pair();
//! handle.resolve();
//! assert!(pollster::block_on(completion).is_ok());
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;

use crate::error::CompletionError;

/// Errors carried by a failed completion.
///
/// The engine attaches no domain meaning to the payload; it is propagated
/// verbatim to whoever awaited the operation.
pub type LoadError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Shared state between handle and future.
struct CompletionState {
    result: Option<std::result::Result<(), LoadError>>,
    waker: Option<Waker>,
}

/// The resolving side of a completion pair.
///
/// Dropping the handle without calling [`resolve`](Self::resolve) or
/// [`fail`](Self::fail) fails the completion with
/// [`CompletionError::Abandoned`], so an awaiting operation never hangs on a
/// forgotten handle.
pub struct CompletionHandle {
    inner: Arc<Mutex<CompletionState>>,
    settled: bool,
}

impl CompletionHandle {
    /// Resolve the completion successfully.
    pub fn resolve(self) {
        self.finish(Ok(()));
    }

    /// Fail the completion with the given error.
    pub fn fail(self, error: impl Into<LoadError>) {
        self.finish(Err(error.into()));
    }

    fn finish(mut self, result: std::result::Result<(), LoadError>) {
        self.settled = true;
        Self::settle(&self.inner, result);
    }

    fn settle(inner: &Mutex<CompletionState>, result: std::result::Result<(), LoadError>) {
        let waker = {
            let mut state = inner.lock();
            state.result = Some(result);
            state.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl Drop for CompletionHandle {
    fn drop(&mut self) {
        if !self.settled {
            Self::settle(&self.inner, Err(Box::new(CompletionError::Abandoned)));
        }
    }
}

/// The awaitable side of a completion pair.
///
/// Resolves to `Ok(())` or to the error the handle failed with. Polling
/// after the future has completed is a contract violation, as for any future.
pub struct Completion {
    inner: Arc<Mutex<CompletionState>>,
}

impl Future for Completion {
    type Output = std::result::Result<(), LoadError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.inner.lock();
        if let Some(result) = state.result.take() {
            Poll::Ready(result)
        } else {
            state.waker = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}

/// Create a handle/future pair.
///
/// The handle goes to whoever performs the work; the future goes to whoever
/// awaits it.
pub fn completion_pair() -> (CompletionHandle, Completion) {
    let state = Arc::new(Mutex::new(CompletionState {
        result: None,
        waker: None,
    }));

    (
        CompletionHandle {
            inner: state.clone(),
            settled: false,
        },
        Completion { inner: state },
    )
}

static_assertions::assert_impl_all!(Completion: Send);
static_assertions::assert_impl_all!(CompletionHandle: Send);
