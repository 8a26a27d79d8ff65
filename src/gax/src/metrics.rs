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

//! Per-request metrics hooks.
//!
//! The client reports the lifecycle of each logical request to a
//! [RequestMetricsReporter]. A logical request may span several network
//! attempts, `start_network()` and `end_network()` bracket each of them, and
//! `end_request()` is called exactly once when the request reaches a terminal
//! state.

use crate::error::Error;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::time::Instant;

/// Creates a [RequestMetrics] for each logical request.
pub trait RequestMetricsReporter: Send + Sync + std::fmt::Debug {
    /// Called when the request named `request_name` is first sent.
    fn new_request(&self, request_name: &str) -> Box<dyn RequestMetrics>;
}

/// Receives the lifecycle events of a single logical request.
pub trait RequestMetrics: Send + Sync {
    /// A network attempt is starting.
    fn start_network(&self);

    /// A network attempt completed, successfully or not.
    fn end_network(&self);

    /// The request reached a terminal state.
    ///
    /// `error` is `None` on success. `http_status` is the status code of the
    /// last response, `0` if no response was received.
    fn end_request(&self, error: Option<&Error>, http_status: u16, retry_count: u32);
}

/// A reporter that discards all events. This is the default.
#[derive(Clone, Debug, Default)]
pub struct NoOpRequestMetricsReporter;

impl RequestMetricsReporter for NoOpRequestMetricsReporter {
    fn new_request(&self, _request_name: &str) -> Box<dyn RequestMetrics> {
        Box::new(NoOpRequestMetrics)
    }
}

struct NoOpRequestMetrics;

impl RequestMetrics for NoOpRequestMetrics {
    fn start_network(&self) {}
    fn end_network(&self) {}
    fn end_request(&self, _error: Option<&Error>, _http_status: u16, _retry_count: u32) {}
}

/// A reporter emitting a `tracing` event when each request completes.
///
/// Events are emitted at `DEBUG` level, with the request name, the total and
/// network latency, the number of retries, and the HTTP status.
#[derive(Clone, Debug, Default)]
pub struct TracingRequestMetricsReporter;

impl RequestMetricsReporter for TracingRequestMetricsReporter {
    fn new_request(&self, request_name: &str) -> Box<dyn RequestMetrics> {
        Box::new(TracingRequestMetrics {
            request_name: request_name.to_string(),
            start: Instant::now(),
            network: Mutex::new(NetworkTimes::default()),
        })
    }
}

#[derive(Default)]
struct NetworkTimes {
    attempt_start: Option<Instant>,
    total: std::time::Duration,
}

struct TracingRequestMetrics {
    request_name: String,
    start: Instant,
    network: Mutex<NetworkTimes>,
}

impl TracingRequestMetrics {
    fn network(&self) -> std::sync::MutexGuard<'_, NetworkTimes> {
        self.network.lock().expect("request metrics lock is poisoned")
    }
}

impl RequestMetrics for TracingRequestMetrics {
    fn start_network(&self) {
        self.network().attempt_start = Some(Instant::now());
    }

    fn end_network(&self) {
        let mut network = self.network();
        if let Some(start) = network.attempt_start.take() {
            network.total += start.elapsed();
        }
    }

    fn end_request(&self, error: Option<&Error>, http_status: u16, retry_count: u32) {
        let network_latency = self.network().total;
        tracing::debug!(
            request = %self.request_name,
            latency = ?self.start.elapsed(),
            network_latency = ?network_latency,
            retry_count,
            http_status,
            error = error.map(tracing::field::display),
            "request completed"
        );
    }
}

/// Ensures `end_request()` reaches the wrapped metrics at most once.
///
/// Cancellation and completion may race, the first one to report wins.
pub struct OnceRequestMetrics {
    inner: Box<dyn RequestMetrics>,
    ended: AtomicBool,
}

impl OnceRequestMetrics {
    /// Wraps `inner`.
    pub fn new(inner: Box<dyn RequestMetrics>) -> Self {
        Self {
            inner,
            ended: AtomicBool::new(false),
        }
    }
}

impl RequestMetrics for OnceRequestMetrics {
    fn start_network(&self) {
        self.inner.start_network();
    }

    fn end_network(&self) {
        self.inner.end_network();
    }

    fn end_request(&self, error: Option<&Error>, http_status: u16, retry_count: u32) {
        if self.ended.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.end_request(error, http_status, retry_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Default)]
    struct Recorder {
        network: Mutex<Vec<&'static str>>,
        ended: Mutex<Vec<(bool, u16, u32)>>,
    }

    impl RequestMetrics for Arc<Recorder> {
        fn start_network(&self) {
            self.network.lock().unwrap().push("start");
        }
        fn end_network(&self) {
            self.network.lock().unwrap().push("end");
        }
        fn end_request(&self, error: Option<&Error>, http_status: u16, retry_count: u32) {
            self.ended
                .lock()
                .unwrap()
                .push((error.is_some(), http_status, retry_count));
        }
    }

    #[test]
    fn once_metrics_reports_first_end() {
        let recorder = Arc::new(Recorder::default());
        let metrics = OnceRequestMetrics::new(Box::new(recorder.clone()));
        metrics.start_network();
        metrics.end_network();
        metrics.start_network();
        metrics.end_network();
        metrics.end_request(None, 200, 1);
        metrics.end_request(Some(&Error::cancelled()), 0, 1);

        assert_eq!(
            *recorder.network.lock().unwrap(),
            vec!["start", "end", "start", "end"]
        );
        assert_eq!(*recorder.ended.lock().unwrap(), vec![(false, 200, 1)]);
    }

    #[test]
    fn noop() {
        let metrics = NoOpRequestMetricsReporter.new_request("test");
        metrics.start_network();
        metrics.end_network();
        metrics.end_request(None, 200, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn tracing_accumulates_network_time() {
        let metrics = TracingRequestMetrics {
            request_name: "geocode".to_string(),
            start: Instant::now(),
            network: Mutex::new(NetworkTimes::default()),
        };
        for _ in 0..2 {
            metrics.start_network();
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            metrics.end_network();
        }
        // end_network() without start_network() is ignored.
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        metrics.end_network();
        assert_eq!(metrics.network().total, std::time::Duration::from_millis(200));
        metrics.end_request(Some(&Error::io("reset")), 0, 1);
    }

    #[test]
    fn tracing_reporter() {
        let reporter: Arc<dyn RequestMetricsReporter> = Arc::new(TracingRequestMetricsReporter);
        let metrics = reporter.new_request("geocode");
        metrics.start_network();
        metrics.end_network();
        metrics.end_request(None, 200, 0);
    }
}
