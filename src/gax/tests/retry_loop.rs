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

//! Verify the retry loop honours the standard policies end-to-end.

#[cfg(test)]
mod tests {
    use google_maps_gax::backoff_policy::BackoffPolicy;
    use google_maps_gax::error::{ApiError, ApiErrorKind, Error};
    use google_maps_gax::exponential_backoff::ExponentialBackoffBuilder;
    use google_maps_gax::retry_loop_internal::retry_loop;
    use google_maps_gax::retry_policy::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use test_case::test_case;

    type TestResult = anyhow::Result<()>;

    fn backoff() -> Arc<dyn BackoffPolicy> {
        Arc::new(
            ExponentialBackoffBuilder::new()
                .with_initial_delay(Duration::from_millis(10))
                .with_maximum_delay(Duration::from_millis(50))
                .clamp(),
        )
    }

    fn over_query_limit(attempt: u32) -> Error {
        Error::api(ApiError::new(
            ApiErrorKind::OverQueryLimit,
            "OVER_QUERY_LIMIT",
            format!("attempt {attempt}"),
        ))
    }

    #[test_case(0)]
    #[test_case(1)]
    #[test_case(3)]
    #[tokio::test(start_paused = true)]
    async fn retries_exactly_max_retries(max_retries: u32) -> TestResult {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();
        let inner = move |_| {
            let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Err::<(), Error>(over_query_limit(attempt)) }
        };
        let policy = RetryableErrorKinds::default()
            .with_time_limit(Duration::from_secs(60))
            .with_attempt_limit(max_retries + 1);
        let err = retry_loop(inner, tokio::time::sleep, Arc::new(policy), backoff())
            .await
            .unwrap_err();

        assert_eq!(attempts.load(Ordering::SeqCst), max_retries + 1);
        let api = err.api_error().expect("error should be an API error");
        assert_eq!(api.message(), format!("attempt {}", max_retries + 1));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_error_single_attempt() -> TestResult {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();
        let inner = move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move {
                Err::<(), Error>(Error::api(ApiError::new(
                    ApiErrorKind::InvalidRequest,
                    "INVALID_REQUEST",
                    "",
                )))
            }
        };
        let policy = RetryableErrorKinds::default().with_attempt_limit(10);
        let err = retry_loop(inner, tokio::time::sleep, Arc::new(policy), backoff())
            .await
            .unwrap_err();
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(
            err.api_error().map(|e| e.kind()),
            Some(ApiErrorKind::InvalidRequest)
        );
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn time_limit_stops_loop() -> TestResult {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();
        let inner = move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Err::<(), Error>(Error::io("connection reset")) }
        };
        let start = tokio::time::Instant::now();
        let policy = RetryableErrorKinds::default().with_time_limit(Duration::from_secs(1));
        let err = retry_loop(inner, tokio::time::sleep, Arc::new(policy), backoff())
            .await
            .unwrap_err();
        assert!(err.is_io(), "{err:?}");
        assert!(start.elapsed() <= Duration::from_secs(1), "{:?}", start.elapsed());
        assert!(attempts.load(Ordering::SeqCst) > 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn transient_then_success() -> TestResult {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();
        let inner = move |_| {
            let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if attempt < 3 {
                    Err(Error::http(503, bytes::Bytes::from_static(b"unavailable")))
                } else {
                    Ok("done")
                }
            }
        };
        let policy = RetryableErrorKinds::default().with_attempt_limit(5);
        let got = retry_loop(inner, tokio::time::sleep, Arc::new(policy), backoff()).await?;
        assert_eq!(got, "done");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        Ok(())
    }
}
