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

//! These tests run requests against a local HTTP server. They verify the
//! context assembles the requests correctly, and applies the retry policy,
//! the experience ID, and the shutdown state as expected.

#[cfg(test)]
mod tests {
    use google_maps_services::GeoApiContext;
    use google_maps_services::context::Builder;
    use google_maps_services::error::ApiErrorKind;
    use google_maps_services::exponential_backoff::ExponentialBackoffBuilder;
    use google_maps_services::model::{LatLng, TravelMode, WifiAccessPoint};
    use httptest::{Expectation, Server, matchers::*, responders::*};
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    type Result<T> = anyhow::Result<T>;

    const GEOCODE_PATH: &str = "/maps/api/geocode/json";
    const GEOCODE_OK: &str = r#"{"status": "OK", "results": [{"formatted_address": "Sydney NSW, Australia"}]}"#;

    fn builder(server: &Server) -> Builder {
        GeoApiContext::builder()
            .with_api_key("AIza-test-key")
            .with_base_url(format!("http://{}", server.addr()))
            .with_backoff_policy(
                ExponentialBackoffBuilder::new()
                    .with_initial_delay(Duration::from_millis(1))
                    .with_maximum_delay(Duration::from_millis(1))
                    .clamp(),
            )
    }

    fn json_response(status: u16, body: &str) -> ResponseBuilder<String> {
        status_code(status)
            .insert_header("Content-Type", "application/json")
            .body(body.to_string())
    }

    fn boxed(responder: ResponseBuilder<String>) -> Box<dyn Responder> {
        Box::new(responder)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn default_user_agent() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", GEOCODE_PATH),
                request::headers(contains(("user-agent", matches("^GoogleGeoApiClientRust/")))),
            ])
            .respond_with(json_response(200, GEOCODE_OK)),
        );
        let context = builder(&server).build()?;
        let results = context.geocode_address("Sydney").await?;
        assert_eq!(results[0].formatted_address, "Sydney NSW, Australia");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn custom_user_agent_prefix() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", GEOCODE_PATH),
                request::headers(contains((
                    "user-agent",
                    matches("^my-app/1.0 GoogleGeoApiClientRust/")
                ))),
            ])
            .respond_with(json_response(200, GEOCODE_OK)),
        );
        let context = builder(&server).with_user_agent("my-app/1.0").build()?;
        context.geocode_address("Sydney").await?;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn query_parameter_order() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/maps/api/directions/json"),
                request::query(url_decoded(eq(vec![
                    KV::<str, str>::new("key", "AIza-test-key"),
                    KV::<str, str>::new("origin", "Toronto"),
                    KV::<str, str>::new("destination", "Montreal"),
                    KV::<str, str>::new("mode", "bicycling"),
                    KV::<str, str>::new("channel", "test-channel"),
                ]))),
            ])
            .respond_with(json_response(
                200,
                r#"{
                    "status": "OK",
                    "routes": [{
                        "summary": "ON-401 E",
                        "legs": [{
                            "start_address": "Toronto, ON, Canada",
                            "end_address": "Montreal, QC, Canada",
                            "distance": {"value": 541000, "text": "541 km"},
                            "duration": {"value": 19800, "text": "5 hours 30 mins"}
                        }]
                    }]
                }"#,
            )),
        );
        let context = builder(&server).with_channel("test-channel").build()?;
        let result = context
            .directions()
            .origin("Toronto")
            .destination("Montreal")
            .mode(TravelMode::Bicycling)
            .await?;
        assert_eq!(result.routes.len(), 1);
        let leg = &result.routes[0].legs[0];
        assert_eq!(leg.start_address, "Toronto, ON, Canada");
        assert_eq!(leg.end_address, "Montreal, QC, Canada");
        assert_eq!(leg.distance.value, 541000);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn retries_server_errors() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", GEOCODE_PATH))
                .times(3)
                .respond_with(cycle(vec![
                    boxed(json_response(500, "internal error")),
                    boxed(json_response(503, "unavailable")),
                    boxed(json_response(200, GEOCODE_OK)),
                ])),
        );
        let context = builder(&server).build()?;
        let results = context.geocode_address("Sydney").await?;
        assert_eq!(results.len(), 1);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn retries_over_query_limit() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", GEOCODE_PATH))
                .times(2)
                .respond_with(cycle(vec![
                    boxed(json_response(
                        200,
                        r#"{"status": "OVER_QUERY_LIMIT", "error_message": "slow down"}"#,
                    )),
                    boxed(json_response(200, GEOCODE_OK)),
                ])),
        );
        let context = builder(&server).build()?;
        context.geocode_address("Sydney").await?;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn max_retries() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", GEOCODE_PATH))
                .times(3)
                .respond_with(json_response(
                    200,
                    r#"{"status": "OVER_QUERY_LIMIT", "error_message": "slow down"}"#,
                )),
        );
        let context = builder(&server).with_max_retries(2).build()?;
        let err = context.geocode_address("Sydney").await.unwrap_err();
        let api = err.api_error().expect("a service error");
        assert_eq!(api.kind(), ApiErrorKind::OverQueryLimit);
        assert_eq!(api.message(), "slow down");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn retries_disabled() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", GEOCODE_PATH))
                .times(1)
                .respond_with(json_response(500, "internal error")),
        );
        let context = builder(&server).disable_retries().build()?;
        let err = context.geocode_address("Sydney").await.unwrap_err();
        assert_eq!(err.http_status_code(), Some(500), "{err:?}");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn permanent_errors_are_not_retried() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", GEOCODE_PATH))
                .times(1)
                .respond_with(json_response(
                    400,
                    r#"{"status": "INVALID_REQUEST", "error_message": "Invalid request. Missing the 'address' parameter."}"#,
                )),
        );
        let context = builder(&server).with_max_retries(5).build()?;
        let err = context.geocode_address("Sydney").await.unwrap_err();
        assert_eq!(
            err.api_error().map(|e| e.kind()),
            Some(ApiErrorKind::InvalidRequest)
        );
        assert_eq!(err.http_status_code(), Some(400));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn toggle_retryable_kind() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", GEOCODE_PATH))
                .times(2)
                .respond_with(json_response(
                    200,
                    r#"{"status": "REQUEST_DENIED", "error_message": "try again"}"#,
                )),
        );
        let context = builder(&server)
            .toggle_if_exception_is_allowed_to_retry(ApiErrorKind::RequestDenied, true)
            .with_max_retries(1)
            .build()?;
        let err = context.geocode_address("Sydney").await.unwrap_err();
        assert_eq!(
            err.api_error().map(|e| e.kind()),
            Some(ApiErrorKind::RequestDenied)
        );
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn untoggle_retryable_kind() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", GEOCODE_PATH))
                .times(1)
                .respond_with(json_response(200, r#"{"status": "OVER_QUERY_LIMIT"}"#)),
        );
        let context = builder(&server)
            .toggle_if_exception_is_allowed_to_retry(ApiErrorKind::OverQueryLimit, false)
            .build()?;
        let err = context.geocode_address("Sydney").await.unwrap_err();
        assert_eq!(
            err.api_error().map(|e| e.kind()),
            Some(ApiErrorKind::OverQueryLimit)
        );
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn experience_id_header() -> Result<()> {
        let mut server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", GEOCODE_PATH),
                request::headers(contains(("x-goog-maps-experience-id", "exp1,exp2"))),
            ])
            .times(1)
            .respond_with(json_response(200, GEOCODE_OK)),
        );
        let context = builder(&server)
            .with_experience_id(["exp1", "exp2"])
            .build()?;
        context.geocode_address("Sydney").await?;
        server.verify_and_clear();

        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", GEOCODE_PATH),
                request::headers(not(contains(key("x-goog-maps-experience-id")))),
            ])
            .times(1)
            .respond_with(json_response(200, GEOCODE_OK)),
        );
        context.set_experience_id(Vec::<String>::new());
        assert_eq!(context.experience_id(), None);
        context.geocode_address("Sydney").await?;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn geolocation_post() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/geolocation/v1/geolocate"),
                request::query(url_decoded(contains(("key", "AIza-test-key")))),
                request::headers(contains(("content-type", "application/json"))),
                request::body(json_decoded(eq(json!({
                    "considerIp": false,
                    "wifiAccessPoints": [{"macAddress": "00:25:9c:cf:1c:ac"}]
                })))),
            ])
            .respond_with(json_response(
                200,
                r#"{"location": {"lat": 37.42, "lng": -122.08}, "accuracy": 30.0}"#,
            )),
        );
        let context = builder(&server).build()?;
        let result = context
            .geolocate()
            .consider_ip(false)
            .add_wifi_access_point(WifiAccessPoint {
                mac_address: "00:25:9c:cf:1c:ac".into(),
                ..Default::default()
            })
            .await?;
        assert_eq!(result.location, LatLng::new(37.42, -122.08));
        assert_eq!(result.accuracy, 30.0);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn shutdown() -> Result<()> {
        let server = Server::run();
        let context = builder(&server).build()?;
        let clone = context.clone();
        context.shutdown();
        assert!(clone.is_shutdown());
        let err = clone.geocode_address("Sydney").send().unwrap_err();
        assert!(err.is_shutdown(), "{err:?}");
        let err = clone.geocode_address("Sydney").await.unwrap_err();
        assert!(err.is_shutdown(), "{err:?}");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn cancel_before_response() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", GEOCODE_PATH))
                .times(..)
                .respond_with(delay_and_then(
                    Duration::from_secs(2),
                    json_response(200, GEOCODE_OK),
                )),
        );
        let context = builder(&server).build()?;
        let pending = context.geocode_address("Sydney").send()?;
        let calls = Arc::new(AtomicUsize::new(0));
        let (on_result, on_failure) = (calls.clone(), calls.clone());
        pending.set_callback(
            move |_| {
                on_result.fetch_add(1, Ordering::SeqCst);
            },
            move |_| {
                on_failure.fetch_add(1, Ordering::SeqCst);
            },
        );
        assert!(pending.cancel());
        assert!(pending.is_cancelled());
        let err = pending.wait().await.unwrap_err();
        assert!(err.is_cancelled(), "{err:?}");
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn missing_credentials() -> Result<()> {
        let context = GeoApiContext::builder().build()?;
        let err = context.geocode_address("Sydney").await.unwrap_err();
        assert!(err.is_configuration(), "{err:?}");
        Ok(())
    }
}
