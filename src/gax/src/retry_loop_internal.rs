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

use super::Result;
use super::backoff_policy::BackoffPolicy;
use super::error::Error;
use super::retry_policy::RetryPolicy;
use super::retry_result::RetryResult;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

enum RetryLoopAttempt {
    // The first attempt
    Initial,
    // (Attempt count, backoff delay, previous error)
    Retry(u32, Duration, Error),
}

impl RetryLoopAttempt {
    fn count(&self) -> u32 {
        match self {
            RetryLoopAttempt::Initial => 0,
            RetryLoopAttempt::Retry(count, _, _) => *count,
        }
    }
}

/// Runs the retry loop for a given function.
///
/// This functions calls an inner function as long as (1) the retry policy has
/// not expired, and (2) the inner function has not returned a successful
/// request.
///
/// In between calls the function waits the amount of time prescribed by the
/// backoff policy, using `sleep` to implement any sleep.
///
/// Attempts are strictly sequential. When the loop stops, the error from the
/// last attempt is returned.
pub async fn retry_loop<F, Fut, S, SFut, Response>(
    inner: F,
    sleep: S,
    retry_policy: Arc<dyn RetryPolicy>,
    backoff_policy: Arc<dyn BackoffPolicy>,
) -> Result<Response>
where
    F: FnMut(Option<Duration>) -> Fut,
    Fut: Future<Output = Result<Response>>,
    S: Fn(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    retry_loop_with_callback(inner, sleep, retry_policy, backoff_policy, |_, _, _| {}).await
}

/// Runs the retry loop for a given function with a callback for retries.
///
/// This functions calls an inner function as long as (1) the retry policy has
/// not expired, and (2) the inner function has not returned a successful
/// request.
///
/// In between calls the function waits the amount of time prescribed by the
/// backoff policy, using `sleep` to implement any sleep.
///
/// The `on_retry` callback is called before sleeping, with the attempt count,
/// the error, and the delay.
pub async fn retry_loop_with_callback<F, Fut, S, SFut, OnRetry, Response>(
    mut inner: F,
    sleep: S,
    retry_policy: Arc<dyn RetryPolicy>,
    backoff_policy: Arc<dyn BackoffPolicy>,
    mut on_retry: OnRetry,
) -> Result<Response>
where
    F: FnMut(Option<Duration>) -> Fut,
    Fut: Future<Output = Result<Response>>,
    S: Fn(Duration) -> SFut,
    SFut: Future<Output = ()>,
    OnRetry: FnMut(u32, &Error, Duration),
{
    let loop_start = Instant::now();
    let mut attempt_state = RetryLoopAttempt::Initial;
    loop {
        let mut attempt_count = attempt_state.count();
        let mut remaining_time = retry_policy.remaining_time(loop_start, attempt_count);

        if let RetryLoopAttempt::Retry(attempt_count, delay, prev_error) = attempt_state {
            if remaining_time.is_some_and(|remaining| remaining < delay) {
                return Err(prev_error);
            }
            on_retry(attempt_count, &prev_error, delay);
            sleep(delay).await;
            remaining_time = retry_policy.remaining_time(loop_start, attempt_count);
        }
        attempt_count += 1;
        match inner(remaining_time).await {
            Ok(r) => return Ok(r),
            Err(e) => match retry_policy.on_error(loop_start, attempt_count, e) {
                RetryResult::Permanent(e) | RetryResult::Exhausted(e) => return Err(e),
                RetryResult::Continue(e) => {
                    let delay = backoff_policy.on_failure(loop_start, attempt_count);
                    attempt_state = RetryLoopAttempt::Retry(attempt_count, delay, e);
                }
            },
        }
    }
}
