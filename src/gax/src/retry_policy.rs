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

//! Defines traits for retry policies and some common implementations.
//!
//! The client automatically retries requests that fail with transient
//! errors. I/O errors are always transient. Errors reported by the service
//! are transient only if their [ApiErrorKind] is in the allow-list of
//! [RetryableErrorKinds]. By default that list contains
//! [ApiErrorKind::OverQueryLimit] and [ApiErrorKind::UnknownError]. Errors
//! caused by the request itself, such as [ApiErrorKind::InvalidRequest], can
//! never succeed on a retry and should not be added to the list.
//!
//! The retry loop is bounded by decorating the allow-list policy with
//! [LimitedElapsedTime] and [LimitedAttemptCount].
//!
//! # Example
//! ```
//! # use google_maps_gax::retry_policy::*;
//! # use google_maps_gax::error::ApiErrorKind;
//! use std::time::Duration;
//! let policy = RetryableErrorKinds::default()
//!     .with(ApiErrorKind::OverQueryLimit, false)
//!     .with_time_limit(Duration::from_secs(10))
//!     .with_attempt_limit(3);
//! ```

use crate::error::{ApiErrorKind, Error};
use crate::retry_result::RetryResult;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// HTTP status codes treated as [ApiErrorKind::UnknownError] when the
/// response does not contain a service error.
const RETRYABLE_HTTP_STATUS_CODES: [u16; 3] = [500, 503, 504];

/// Determines how errors are handled in the retry loop.
///
/// Implementations of this trait determine if errors are retryable, and for
/// how long the retry loop may continue.
pub trait RetryPolicy: Send + Sync + std::fmt::Debug {
    /// Query the retry policy after an error.
    ///
    /// # Parameters
    /// * `loop_start` - when the retry loop started.
    /// * `attempt_count` - the number of attempts. This includes the initial
    ///   attempt. This method called after the first attempt, so the value is
    ///   always non-zero.
    /// * `error` - the last error when attempting the request.
    fn on_error(&self, loop_start: Instant, attempt_count: u32, error: Error) -> RetryResult;

    /// The remaining time in the retry policy.
    ///
    /// For policies based on time, this returns the remaining time in the
    /// policy. The retry loop can use this value to adjust the next attempt
    /// timeout. For policies that are not time based this returns `None`.
    fn remaining_time(&self, _loop_start: Instant, _attempt_count: u32) -> Option<Duration> {
        None
    }
}

/// A helper type to use [RetryPolicy] in client options.
#[derive(Clone, Debug)]
pub struct RetryPolicyArg(pub(crate) Arc<dyn RetryPolicy>);

impl RetryPolicyArg {
    /// Returns the wrapped policy.
    pub fn into_inner(self) -> Arc<dyn RetryPolicy> {
        self.0
    }
}

impl<T: RetryPolicy + 'static> std::convert::From<T> for RetryPolicyArg {
    fn from(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl std::convert::From<Arc<dyn RetryPolicy>> for RetryPolicyArg {
    fn from(value: Arc<dyn RetryPolicy>) -> Self {
        Self(value)
    }
}

/// Extension trait for [RetryPolicy]
pub trait RetryPolicyExt: RetryPolicy + Sized {
    /// Decorate a [RetryPolicy] to limit the total elapsed time in the retry
    /// loop.
    ///
    /// # Parameters
    /// * `maximum_duration` - the maximum total duration of the retry loop.
    fn with_time_limit(self, maximum_duration: Duration) -> LimitedElapsedTime<Self> {
        LimitedElapsedTime::custom(self, maximum_duration)
    }

    /// Decorate a [RetryPolicy] to limit the number of attempts.
    ///
    /// # Parameters
    /// * `maximum_attempts` - the maximum number of attempts, including the
    ///   initial attempt.
    fn with_attempt_limit(self, maximum_attempts: u32) -> LimitedAttemptCount<Self> {
        LimitedAttemptCount::custom(self, maximum_attempts)
    }
}

impl<T: RetryPolicy> RetryPolicyExt for T {}

/// A retry policy based on an allow-list of retryable error kinds.
///
/// I/O errors are always retryable. Errors reported by the service are
/// retryable if their kind is in the allow-list. Responses with HTTP status
/// 500, 503, or 504 that do not contain a service error are classified as
/// [ApiErrorKind::UnknownError]. All other errors are permanent.
///
/// This policy does not limit the number of attempts, nor the duration of
/// the retry loop. It should be decorated with [LimitedElapsedTime] and/or
/// [LimitedAttemptCount].
#[derive(Clone, Debug, PartialEq)]
pub struct RetryableErrorKinds {
    kinds: HashSet<ApiErrorKind>,
}

impl RetryableErrorKinds {
    /// Creates a policy with an empty allow-list.
    ///
    /// Only I/O errors are retried by this policy.
    pub fn none() -> Self {
        Self {
            kinds: HashSet::new(),
        }
    }

    /// Adds or removes `kind` from the allow-list.
    pub fn with(mut self, kind: ApiErrorKind, allowed: bool) -> Self {
        self.set(kind, allowed);
        self
    }

    /// Adds or removes `kind` from the allow-list.
    pub fn set(&mut self, kind: ApiErrorKind, allowed: bool) {
        if allowed {
            self.kinds.insert(kind);
        } else {
            self.kinds.remove(&kind);
        }
    }

    /// Returns true if `kind` is in the allow-list.
    pub fn contains(&self, kind: ApiErrorKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Returns true if `error` is retryable under this policy.
    pub fn is_retryable(&self, error: &Error) -> bool {
        if error.is_io() {
            return true;
        }
        error_kind(error).is_some_and(|k| self.contains(k))
    }
}

impl Default for RetryableErrorKinds {
    fn default() -> Self {
        Self::none()
            .with(ApiErrorKind::OverQueryLimit, true)
            .with(ApiErrorKind::UnknownError, true)
    }
}

impl RetryPolicy for RetryableErrorKinds {
    fn on_error(&self, _loop_start: Instant, _attempt_count: u32, error: Error) -> RetryResult {
        if self.is_retryable(&error) {
            RetryResult::Continue(error)
        } else {
            RetryResult::Permanent(error)
        }
    }
}

fn error_kind(error: &Error) -> Option<ApiErrorKind> {
    if let Some(api) = error.api_error() {
        return Some(api.kind());
    }
    error
        .http_status_code()
        .filter(|code| RETRYABLE_HTTP_STATUS_CODES.contains(code))
        .map(|_| ApiErrorKind::UnknownError)
}

/// A retry policy that never retries.
#[derive(Clone, Debug)]
pub struct NeverRetry;

impl RetryPolicy for NeverRetry {
    fn on_error(&self, _loop_start: Instant, _attempt_count: u32, error: Error) -> RetryResult {
        RetryResult::Exhausted(error)
    }
}

/// A retry policy decorator that limits the total time in the retry loop.
///
/// This policy decorates an inner policy and limits the duration of retry
/// loops. Once the loop exceeds its duration limit, this policy always returns
/// [RetryResult::Exhausted] for retryable errors. Before the deadline is
/// reached, the policy returns the result of the inner policy.
///
/// # Parameters
/// * `P` - the inner retry policy, defaults to [RetryableErrorKinds].
#[derive(Debug)]
pub struct LimitedElapsedTime<P = RetryableErrorKinds>
where
    P: RetryPolicy,
{
    inner: P,
    maximum_duration: Duration,
}

impl LimitedElapsedTime {
    /// Creates a new instance, with the default inner policy.
    pub fn new(maximum_duration: Duration) -> Self {
        Self::custom(RetryableErrorKinds::default(), maximum_duration)
    }
}

impl<P> LimitedElapsedTime<P>
where
    P: RetryPolicy,
{
    /// Creates a new instance with a custom inner policy.
    pub fn custom(inner: P, maximum_duration: Duration) -> Self {
        Self {
            inner,
            maximum_duration,
        }
    }

    fn error_if_exhausted(&self, loop_start: Instant, error: Error) -> RetryResult {
        if loop_start.elapsed() >= self.maximum_duration {
            RetryResult::Exhausted(error)
        } else {
            RetryResult::Continue(error)
        }
    }
}

impl<P> RetryPolicy for LimitedElapsedTime<P>
where
    P: RetryPolicy,
{
    fn on_error(&self, loop_start: Instant, attempt_count: u32, error: Error) -> RetryResult {
        match self.inner.on_error(loop_start, attempt_count, error) {
            RetryResult::Permanent(e) => RetryResult::Permanent(e),
            RetryResult::Exhausted(e) => RetryResult::Exhausted(e),
            RetryResult::Continue(e) => self.error_if_exhausted(loop_start, e),
        }
    }

    fn remaining_time(&self, loop_start: Instant, attempt_count: u32) -> Option<Duration> {
        let deadline = loop_start + self.maximum_duration;
        let remaining = deadline.saturating_duration_since(Instant::now());
        if let Some(inner) = self.inner.remaining_time(loop_start, attempt_count) {
            return Some(std::cmp::min(remaining, inner));
        }
        Some(remaining)
    }
}

/// A retry policy decorator that limits the number of attempts.
///
/// This policy decorates an inner policy and limits the total number of
/// attempts. Once the maximum number of attempts is reached this policy
/// always returns [RetryResult::Exhausted] for retryable errors. Before the
/// maximum is reached, the policy returns the result of the inner policy.
///
/// A policy with `maximum_attempts == N + 1` allows the initial attempt plus
/// `N` retries.
///
/// # Parameters
/// * `P` - the inner retry policy, defaults to [RetryableErrorKinds].
#[derive(Debug)]
pub struct LimitedAttemptCount<P = RetryableErrorKinds>
where
    P: RetryPolicy,
{
    inner: P,
    maximum_attempts: u32,
}

impl LimitedAttemptCount {
    /// Creates a new instance, with the default inner policy.
    pub fn new(maximum_attempts: u32) -> Self {
        Self::custom(RetryableErrorKinds::default(), maximum_attempts)
    }
}

impl<P> LimitedAttemptCount<P>
where
    P: RetryPolicy,
{
    /// Creates a new instance with a custom inner policy.
    pub fn custom(inner: P, maximum_attempts: u32) -> Self {
        Self {
            inner,
            maximum_attempts,
        }
    }
}

impl<P> RetryPolicy for LimitedAttemptCount<P>
where
    P: RetryPolicy,
{
    fn on_error(&self, loop_start: Instant, attempt_count: u32, error: Error) -> RetryResult {
        match self.inner.on_error(loop_start, attempt_count, error) {
            RetryResult::Permanent(e) => RetryResult::Permanent(e),
            RetryResult::Exhausted(e) => RetryResult::Exhausted(e),
            RetryResult::Continue(e) => {
                if attempt_count >= self.maximum_attempts {
                    RetryResult::Exhausted(e)
                } else {
                    RetryResult::Continue(e)
                }
            }
        }
    }

    fn remaining_time(&self, loop_start: Instant, attempt_count: u32) -> Option<Duration> {
        self.inner.remaining_time(loop_start, attempt_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use test_case::test_case;

    fn api(kind: ApiErrorKind, status: &str) -> Error {
        Error::api(ApiError::new(kind, status, "test-only"))
    }

    #[test_case(ApiErrorKind::OverQueryLimit, "OVER_QUERY_LIMIT", true)]
    #[test_case(ApiErrorKind::UnknownError, "UNKNOWN_ERROR", true)]
    #[test_case(ApiErrorKind::InvalidRequest, "INVALID_REQUEST", false)]
    #[test_case(ApiErrorKind::NotFound, "NOT_FOUND", false)]
    #[test_case(ApiErrorKind::ZeroResults, "ZERO_RESULTS", false)]
    #[test_case(ApiErrorKind::RequestDenied, "REQUEST_DENIED", false)]
    #[test_case(ApiErrorKind::OverDailyLimit, "OVER_QUERY_LIMIT", false)]
    fn default_allow_list(kind: ApiErrorKind, status: &str, want: bool) {
        let p = RetryableErrorKinds::default();
        let now = Instant::now();
        assert_eq!(p.on_error(now, 1, api(kind, status)).is_continue(), want);
        assert!(p.remaining_time(now, 1).is_none());
    }

    #[test]
    fn io_always_retryable() {
        let p = RetryableErrorKinds::none();
        let now = Instant::now();
        assert!(p.on_error(now, 1, Error::io("err")).is_continue());
    }

    #[test_case(500, true)]
    #[test_case(503, true)]
    #[test_case(504, true)]
    #[test_case(502, false)]
    #[test_case(404, false)]
    #[test_case(400, false)]
    fn http_status(code: u16, want: bool) {
        let p = RetryableErrorKinds::default();
        let error = Error::http(code, bytes::Bytes::from_static(b"<html></html>"));
        assert_eq!(p.on_error(Instant::now(), 1, error).is_continue(), want);

        let p = RetryableErrorKinds::default().with(ApiErrorKind::UnknownError, false);
        let error = Error::http(code, bytes::Bytes::from_static(b"<html></html>"));
        assert!(p.on_error(Instant::now(), 1, error).is_permanent());
    }

    #[test_case(Error::deser("bad json"))]
    #[test_case(Error::configuration("no key"))]
    #[test_case(Error::invalid_argument("no origin"))]
    #[test_case(Error::cancelled())]
    fn local_errors_are_permanent(error: Error) {
        let p = RetryableErrorKinds::default();
        assert!(p.on_error(Instant::now(), 1, error).is_permanent());
    }

    #[test]
    fn toggle() {
        let p = RetryableErrorKinds::default()
            .with(ApiErrorKind::OverQueryLimit, false)
            .with(ApiErrorKind::InvalidRequest, true);
        assert!(!p.contains(ApiErrorKind::OverQueryLimit));
        assert!(p.contains(ApiErrorKind::InvalidRequest));
        assert!(p.contains(ApiErrorKind::UnknownError));
        let now = Instant::now();
        let r = p.on_error(now, 1, api(ApiErrorKind::OverQueryLimit, "OVER_QUERY_LIMIT"));
        assert!(r.is_permanent(), "{r:?}");
        let r = p.on_error(now, 1, api(ApiErrorKind::InvalidRequest, "INVALID_REQUEST"));
        assert!(r.is_continue(), "{r:?}");
    }

    #[test]
    fn never_retry() {
        let p = NeverRetry;
        let r = p.on_error(Instant::now(), 1, Error::io("err"));
        assert!(r.is_exhausted(), "{r:?}");
    }

    #[test]
    fn retry_policy_arg() {
        let _ = RetryPolicyArg::from(NeverRetry);
        let policy: Arc<dyn RetryPolicy> = Arc::new(LimitedAttemptCount::new(3));
        let arg = RetryPolicyArg::from(policy.clone());
        assert!(Arc::ptr_eq(&arg.into_inner(), &policy));
    }

    #[test]
    fn limited_attempt_count() {
        let p = LimitedAttemptCount::new(3);
        let now = Instant::now();
        let r = p.on_error(now, 1, Error::io("err"));
        assert!(r.is_continue(), "{r:?}");
        let r = p.on_error(now, 2, Error::io("err"));
        assert!(r.is_continue(), "{r:?}");
        let r = p.on_error(now, 3, Error::io("err"));
        assert!(r.is_exhausted(), "{r:?}");
        let r = p.on_error(now, 4, Error::io("err"));
        assert!(r.is_exhausted(), "{r:?}");

        let r = p.on_error(now, 1, api(ApiErrorKind::NotFound, "NOT_FOUND"));
        assert!(r.is_permanent(), "{r:?}");
        assert!(p.remaining_time(now, 1).is_none());
    }

    #[test]
    fn limited_attempt_count_inner_exhausted() {
        let p = NeverRetry.with_attempt_limit(10);
        let r = p.on_error(Instant::now(), 1, Error::io("err"));
        assert!(r.is_exhausted(), "{r:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn limited_elapsed_time() {
        let p = LimitedElapsedTime::new(Duration::from_secs(60));
        let start = Instant::now();
        let r = p.on_error(start, 1, Error::io("err"));
        assert!(r.is_continue(), "{r:?}");
        assert_eq!(p.remaining_time(start, 1), Some(Duration::from_secs(60)));

        tokio::time::advance(Duration::from_secs(45)).await;
        let r = p.on_error(start, 2, Error::io("err"));
        assert!(r.is_continue(), "{r:?}");
        assert_eq!(p.remaining_time(start, 2), Some(Duration::from_secs(15)));

        tokio::time::advance(Duration::from_secs(15)).await;
        let r = p.on_error(start, 3, Error::io("err"));
        assert!(r.is_exhausted(), "{r:?}");
        assert_eq!(p.remaining_time(start, 3), Some(Duration::ZERO));

        let r = p.on_error(start, 4, api(ApiErrorKind::InvalidRequest, "INVALID_REQUEST"));
        assert!(r.is_permanent(), "{r:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn composed() {
        let p = RetryableErrorKinds::default()
            .with_time_limit(Duration::from_secs(10))
            .with_attempt_limit(2);
        let start = Instant::now();
        assert!(p.on_error(start, 1, Error::io("err")).is_continue());
        assert!(p.on_error(start, 2, Error::io("err")).is_exhausted());
        assert_eq!(p.remaining_time(start, 1), Some(Duration::from_secs(10)));

        let p = RetryableErrorKinds::default()
            .with_attempt_limit(100)
            .with_time_limit(Duration::from_secs(10));
        tokio::time::advance(Duration::from_secs(11)).await;
        assert!(p.on_error(start, 1, Error::io("err")).is_exhausted());
    }
}
