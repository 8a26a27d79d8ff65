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

//! The HTTP transport abstraction.
//!
//! The client sends each physical attempt through an [HttpTransport]. Retries,
//! rate limiting, metrics, and response decoding are implemented once, above
//! this trait. Applications can provide their own transport, for example, to
//! route requests through a proxy with custom TLS settings, or to record
//! requests in tests.

use crate::Result;
use crate::error::Error;
use bytes::Bytes;
use http::HeaderMap;
use std::time::Duration;

/// A fully assembled request.
#[derive(Clone)]
pub struct HttpRequest {
    /// The HTTP verb.
    pub method: http::Method,
    /// The full URL, including the query string and credentials.
    pub url: String,
    /// The request headers.
    pub headers: HeaderMap,
    /// The JSON body of `POST` requests.
    pub body: Option<Bytes>,
    /// The maximum time for this attempt, if bounded.
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The query string contains credentials.
        let url = self.url.split_once('?').map_or(self.url.as_str(), |(p, _)| p);
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &format_args!("{url}?[censored]"))
            .field("headers", &self.headers)
            .field("body", &self.body.as_ref().map(|b| b.len()))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// The response to a [HttpRequest].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: HeaderMap,
    /// The response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Returns true if the status code is in the `2xx` range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The value of the `Content-Type` header, or an empty string.
    pub fn content_type(&self) -> &str {
        self.headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

/// Sends a single request attempt.
///
/// Implementations report problems reaching the service (connection
/// failures, timeouts, broken connections) with [Error::io]. Any response,
/// including responses with error status codes, must be returned as an
/// [HttpResponse].
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync + std::fmt::Debug {
    /// Sends `request` and returns the response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// The default transport, based on `reqwest`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
    write_timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Creates a transport with the default `reqwest` settings.
    pub fn new() -> Result<Self> {
        Self::with_timeouts(None, None, None)
    }

    /// Creates a transport with the given timeouts.
    ///
    /// `reqwest` has no separate write timeout, a write timeout bounds the
    /// total duration of each attempt instead.
    pub fn with_timeouts(
        connect: Option<Duration>,
        read: Option<Duration>,
        write: Option<Duration>,
    ) -> Result<Self> {
        let builder = reqwest::Client::builder();
        let builder = connect.into_iter().fold(builder, |b, t| b.connect_timeout(t));
        let builder = read.into_iter().fold(builder, |b, t| b.read_timeout(t));
        let inner = builder.build().map_err(Error::configuration)?;
        Ok(Self {
            inner,
            write_timeout: write,
        })
    }

    fn effective_timeout(&self, request: Option<Duration>) -> Option<Duration> {
        match (request, self.write_timeout) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let timeout = self.effective_timeout(request.timeout);
        let builder = self
            .inner
            .request(request.method, &request.url)
            .headers(request.headers);
        let builder = request.body.into_iter().fold(builder, |b, body| b.body(body));
        let builder = timeout.into_iter().fold(builder, |b, t| b.timeout(t));
        let response = builder.send().await.map_err(Error::io)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(Error::io)?;
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{Expectation, Server, matchers::*, responders::*};

    type TestResult = anyhow::Result<()>;

    fn get(url: String) -> HttpRequest {
        HttpRequest {
            method: http::Method::GET,
            url,
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    #[tokio::test]
    async fn send_get() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/maps/api/geocode/json"),
                request::query(url_decoded(contains(("address", "Sydney")))),
            ])
            .respond_with(
                status_code(200)
                    .insert_header("content-type", "application/json")
                    .body(r#"{"status": "OK"}"#),
            ),
        );
        let transport = ReqwestTransport::new()?;
        let url = format!(
            "http://{}/maps/api/geocode/json?address=Sydney&key=AIza-test",
            server.addr()
        );
        let response = transport.send(get(url)).await?;
        assert!(response.is_success());
        assert_eq!(response.content_type(), "application/json");
        assert_eq!(response.body, Bytes::from_static(br#"{"status": "OK"}"#));
        Ok(())
    }

    #[tokio::test]
    async fn send_post_with_body() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/geolocation/v1/geolocate"),
                request::body(json_decoded(eq(serde_json::json!({"considerIp": true})))),
            ])
            .respond_with(status_code(200).body("{}")),
        );
        let transport = ReqwestTransport::with_timeouts(
            Some(Duration::from_secs(5)),
            Some(Duration::from_secs(5)),
            Some(Duration::from_secs(5)),
        )?;
        let mut request = get(format!("http://{}/geolocation/v1/geolocate", server.addr()));
        request.method = http::Method::POST;
        request.body = Some(Bytes::from_static(br#"{"considerIp":true}"#));
        let response = transport.send(request).await?;
        assert_eq!(response.status, 200);
        Ok(())
    }

    #[tokio::test]
    async fn error_status_is_a_response() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/"))
                .respond_with(status_code(503).body("try again")),
        );
        let transport = ReqwestTransport::new()?;
        let response = transport.send(get(format!("http://{}/", server.addr()))).await?;
        assert_eq!(response.status, 503);
        assert!(!response.is_success());
        Ok(())
    }

    #[tokio::test]
    async fn connection_error_is_io() -> TestResult {
        let transport = ReqwestTransport::new()?;
        // Port 0 is never reachable.
        let err = transport
            .send(get("http://127.0.0.1:0/".to_string()))
            .await
            .unwrap_err();
        assert!(err.is_io(), "{err:?}");
        Ok(())
    }

    #[test]
    fn effective_timeout() -> TestResult {
        let transport = ReqwestTransport::with_timeouts(None, None, Some(Duration::from_secs(5)))?;
        assert_eq!(
            transport.effective_timeout(Some(Duration::from_secs(1))),
            Some(Duration::from_secs(1))
        );
        assert_eq!(
            transport.effective_timeout(None),
            Some(Duration::from_secs(5))
        );
        let transport = ReqwestTransport::new()?;
        assert_eq!(transport.effective_timeout(None), None);
        Ok(())
    }

    #[test]
    fn debug_censors_query() {
        let request = get("https://maps.googleapis.com/maps/api/geocode/json?key=AIza-secret".into());
        let got = format!("{request:?}");
        assert!(!got.contains("AIza-secret"), "{got}");
        assert!(got.contains("/maps/api/geocode/json"), "{got}");
    }
}
