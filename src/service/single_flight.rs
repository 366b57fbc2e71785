//! Request coalescing for concurrent cache misses
//!
//! While one refresh is in flight, every other caller awaits the same shared
//! future instead of starting a second upstream request.

use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Mutex, PoisonError};

/// Coalesces concurrent calls into a single in-flight operation
pub struct SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    inflight: Mutex<Option<Shared<BoxFuture<'static, T>>>>,
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(None),
        }
    }

    /// Runs `start` unless an operation is already in flight, then awaits the shared result
    ///
    /// `start` is only invoked by the caller that finds no operation in
    /// flight. The operation keeps running if that caller is dropped, as long
    /// as another caller is still waiting on it; a pending operation left
    /// with no waiters is resumed by the next caller.
    pub async fn run<F>(&self, start: F) -> T
    where
        F: FnOnce() -> BoxFuture<'static, T>,
    {
        let shared = {
            let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
            match inflight.as_ref() {
                Some(existing) => {
                    tracing::debug!("Joining in-flight refresh");
                    existing.clone()
                }
                None => {
                    let shared = start().shared();
                    *inflight = Some(shared.clone());
                    shared
                }
            }
        };

        let output = shared.clone().await;

        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        if inflight
            .as_ref()
            .is_some_and(|current| Shared::ptr_eq(current, &shared))
        {
            *inflight = None;
        }

        output
    }

    /// Whether an operation is currently in flight
    pub fn is_inflight(&self) -> bool {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl<T> Default for SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
