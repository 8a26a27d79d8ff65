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

//! Executes one logical request: rate limiting, retries, and metrics.

use crate::Result;
use crate::context::Settings;
use crate::error::Error;
use crate::transport::{HttpRequest, HttpResponse};
use gax::metrics::{OnceRequestMetrics, RequestMetrics};
use gax::retry_loop_internal::retry_loop_with_callback;
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, AtomicU32, Ordering};
use std::time::Duration;

/// A request ready to be sent, and how to decode its response.
pub(crate) struct Call<T> {
    pub name: &'static str,
    pub request: HttpRequest,
    pub decode: fn(HttpResponse) -> Result<T>,
}

/// Tracks the attempts of one logical request.
///
/// Dropping the tracker before the request completes, for example, because
/// the request was cancelled, reports a cancelled request.
struct Tracker {
    name: &'static str,
    metrics: OnceRequestMetrics,
    attempts: AtomicU32,
    last_status: AtomicU16,
}

impl Tracker {
    fn retry_count(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst).saturating_sub(1)
    }

    fn end(&self, error: Option<&Error>) {
        let status = self.last_status.load(Ordering::SeqCst);
        self.metrics.end_request(error, status, self.retry_count());
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.end(Some(&Error::cancelled()));
    }
}

/// Runs the retry loop for `call` and decodes the response.
pub(crate) async fn execute<T>(settings: Arc<Settings>, call: Call<T>) -> Result<T> {
    let tracker = Arc::new(Tracker {
        name: call.name,
        metrics: OnceRequestMetrics::new(settings.metrics_reporter.new_request(call.name)),
        attempts: AtomicU32::new(0),
        last_status: AtomicU16::new(0),
    });
    let decode = call.decode;
    let inner = |remaining_time: Option<Duration>| {
        let settings = settings.clone();
        let tracker = tracker.clone();
        let mut request = call.request.clone();
        request.timeout = remaining_time;
        async move { attempt(&settings, &tracker, request, decode).await }
    };
    let sleep = async |d| tokio::time::sleep(d).await;
    let on_retry = |attempt_count: u32, error: &Error, delay: Duration| {
        tracing::info!(
            request = call.name,
            attempt_count,
            ?delay,
            %error,
            "retrying request"
        );
    };
    let result = retry_loop_with_callback(
        inner,
        sleep,
        settings.retry_policy.clone(),
        settings.backoff_policy.clone(),
        on_retry,
    )
    .await;
    tracker.end(result.as_ref().err());
    result
}

async fn attempt<T>(
    settings: &Settings,
    tracker: &Tracker,
    request: HttpRequest,
    decode: fn(HttpResponse) -> Result<T>,
) -> Result<T> {
    if let Some(limiter) = &settings.rate_limiter {
        limiter.acquire(1).await;
    }
    tracker.attempts.fetch_add(1, Ordering::SeqCst);
    tracker.metrics.start_network();
    let response = settings.transport.send(request).await;
    tracker.metrics.end_network();
    let response = response?;
    tracker.last_status.store(response.status, Ordering::SeqCst);
    decode(response)
}
