// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A handle to an in-flight request.
//!
//! Every request sent by the client returns a [PendingResult]. The result
//! moves from *pending* to exactly one terminal state: *success*, *failure*,
//! or *cancelled*. Retries are invisible at this level, only the final outcome
//! of the retry loop is observable.
//!
//! Applications can wait for the outcome, either asynchronously
//! ([wait][PendingResult::wait], or simply `.await`) or blocking the calling
//! thread ([wait_blocking][PendingResult::wait_blocking]). They can also
//! register a callback with [set_callback][PendingResult::set_callback].
//!
//! # Example
//! ```
//! # use google_maps_gax::pending_result::channel;
//! # tokio_test::block_on(async {
//! let (completer, pending) = channel::<String>();
//! completer.complete(Ok("done".to_string()));
//! assert_eq!(pending.await?, "done");
//! # Ok::<(), google_maps_gax::error::Error>(())
//! # });
//! ```

use crate::Result;
use crate::error::Error;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::AbortHandle;

type Listener<T> = Box<dyn FnOnce(Result<T>) + Send>;

/// Creates a connected [Completer] and [PendingResult] pair.
///
/// The request executor holds the completer and reports the outcome of the
/// request through it. The application holds the pending result.
pub fn channel<T>() -> (Completer<T>, PendingResult<T>)
where
    T: Clone + Send + 'static,
{
    let (done, _) = watch::channel(false);
    let shared = Arc::new(Shared {
        state: Mutex::new(State::Pending {
            listeners: Vec::new(),
            abort: None,
        }),
        done,
    });
    let completer = Completer {
        shared: Some(shared.clone()),
    };
    (completer, PendingResult { shared })
}

/// Runs `task` on `handle`, returning the [PendingResult] it completes.
///
/// `task` receives the [Completer] for the result. Cancelling the result
/// aborts the task at its next suspension point. If the runtime shuts down
/// before the task completes, the result fails with an error satisfying
/// [Error::is_shutdown].
pub fn spawn<T, F, Fut>(handle: &tokio::runtime::Handle, task: F) -> PendingResult<T>
where
    T: Clone + Send + 'static,
    F: FnOnce(Completer<T>) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let (completer, pending) = channel();
    let join = handle.spawn(task(completer));
    pending.shared.set_abort_handle(join.abort_handle());
    pending
}

/// A handle representing an in-flight or completed request.
///
/// The handle is cheap to clone, all the clones observe the same outcome.
pub struct PendingResult<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for PendingResult<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> std::fmt::Debug for PendingResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*self.shared.lock() {
            State::Pending { .. } => "pending",
            State::Success(_) => "success",
            State::Failure(_) => "failure",
            State::Cancelled => "cancelled",
        };
        f.debug_struct("PendingResult")
            .field("state", &state)
            .finish()
    }
}

impl<T> PendingResult<T>
where
    T: Clone + Send + 'static,
{
    /// Waits for the request to complete.
    ///
    /// Returns the value on success. Returns the error reported by the
    /// service, or the transport error, on failure. Returns an error
    /// satisfying [Error::is_cancelled] if the request was cancelled.
    pub async fn wait(&self) -> Result<T> {
        let mut done = self.shared.done.subscribe();
        // The sender lives in `self.shared`, it cannot be dropped while we
        // hold `self`.
        let _ = done.wait_for(|d| *d).await;
        self.shared.outcome().unwrap_or_else(|| Err(Error::shutdown()))
    }

    /// Waits for the request to complete, blocking the calling thread.
    ///
    /// Do not call this function from asynchronous code, use
    /// [wait][PendingResult::wait] instead.
    pub fn wait_blocking(&self) -> Result<T> {
        futures::executor::block_on(self.wait())
    }

    /// Waits for the request to complete, discarding any error.
    pub async fn wait_ignore_error(&self) -> Option<T> {
        self.wait().await.ok()
    }

    /// Waits for the request to complete, blocking the calling thread and
    /// discarding any error.
    pub fn wait_ignore_error_blocking(&self) -> Option<T> {
        self.wait_blocking().ok()
    }

    /// Registers callbacks to receive the outcome of the request.
    ///
    /// Exactly one of the callbacks is called, exactly once. If the request
    /// has already completed the callback runs immediately, on the calling
    /// thread. Otherwise it runs on the thread completing the request.
    ///
    /// Callbacks registered on a cancelled request are never called.
    pub fn set_callback<R, F>(&self, on_result: R, on_failure: F)
    where
        R: FnOnce(T) + Send + 'static,
        F: FnOnce(Error) + Send + 'static,
    {
        let listener: Listener<T> = Box::new(move |outcome| match outcome {
            Ok(v) => on_result(v),
            Err(e) => on_failure(e),
        });
        let immediate = {
            let mut state = self.shared.lock();
            match &mut *state {
                State::Pending { listeners, .. } => {
                    listeners.push(listener);
                    return;
                }
                State::Success(v) => Ok(v.clone()),
                State::Failure(e) => Err(e.clone()),
                State::Cancelled => return,
            }
        };
        listener(immediate);
    }

    /// Cancels the request.
    ///
    /// Cancellation is best-effort. An attempt already sending its request
    /// may complete its network I/O, but its outcome is discarded. Returns
    /// `true` if the request was pending.
    pub fn cancel(&self) -> bool {
        let abort = {
            let mut state = self.shared.lock();
            let State::Pending { abort, .. } = &mut *state else {
                return false;
            };
            let abort = abort.take();
            // Dropping the listeners guarantees they never run.
            *state = State::Cancelled;
            abort
        };
        if let Some(handle) = abort {
            handle.abort();
        }
        self.shared.done.send_replace(true);
        true
    }

    /// Returns true if the request reached a terminal state.
    pub fn is_done(&self) -> bool {
        !matches!(&*self.shared.lock(), State::Pending { .. })
    }

    /// Returns true if the request was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(&*self.shared.lock(), State::Cancelled)
    }
}

impl<T> IntoFuture for PendingResult<T>
where
    T: Clone + Send + 'static,
{
    type Output = Result<T>;
    type IntoFuture = Pin<Box<dyn Future<Output = Result<T>> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.wait().await })
    }
}

/// The producer side of a [PendingResult].
///
/// Dropping a completer without calling [complete][Completer::complete]
/// fails the request with an error satisfying [Error::is_shutdown]. This
/// happens when the executor running the request shuts down.
pub struct Completer<T> {
    shared: Option<Arc<Shared<T>>>,
}

impl<T> Completer<T>
where
    T: Clone + Send + 'static,
{
    /// Reports the outcome of the request.
    ///
    /// Returns `false` if the request was cancelled before completion.
    pub fn complete(mut self, outcome: Result<T>) -> bool {
        match self.shared.take() {
            Some(shared) => shared.finish(outcome),
            None => false,
        }
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            shared.abandon();
        }
    }
}

struct Shared<T> {
    state: Mutex<State<T>>,
    done: watch::Sender<bool>,
}

enum State<T> {
    Pending {
        listeners: Vec<Listener<T>>,
        abort: Option<AbortHandle>,
    },
    Success(T),
    Failure(Error),
    Cancelled,
}

impl<T> Shared<T> {
    fn lock(&self) -> std::sync::MutexGuard<'_, State<T>> {
        self.state.lock().expect("pending result lock is poisoned")
    }

    fn set_abort_handle(&self, handle: AbortHandle) {
        let mut state = self.lock();
        match &mut *state {
            State::Pending { abort, .. } => *abort = Some(handle),
            State::Cancelled => handle.abort(),
            State::Success(_) | State::Failure(_) => {}
        }
    }

    fn abandon(&self) {
        let listeners = {
            let mut state = self.lock();
            let State::Pending { listeners, .. } = &mut *state else {
                return;
            };
            let listeners = std::mem::take(listeners);
            *state = State::Failure(Error::shutdown());
            listeners
        };
        for listener in listeners {
            listener(Err(Error::shutdown()));
        }
        self.done.send_replace(true);
    }
}

impl<T: Clone> Shared<T> {
    fn outcome(&self) -> Option<Result<T>> {
        match &*self.lock() {
            State::Pending { .. } => None,
            State::Success(v) => Some(Ok(v.clone())),
            State::Failure(e) => Some(Err(e.clone())),
            State::Cancelled => Some(Err(Error::cancelled())),
        }
    }

    fn finish(&self, outcome: Result<T>) -> bool {
        let listeners = {
            let mut state = self.lock();
            let State::Pending { listeners, .. } = &mut *state else {
                return false;
            };
            let listeners = std::mem::take(listeners);
            *state = match &outcome {
                Ok(v) => State::Success(v.clone()),
                Err(e) => State::Failure(e.clone()),
            };
            listeners
        };
        for listener in listeners {
            listener(outcome.clone());
        }
        self.done.send_replace(true);
        true
    }
}
