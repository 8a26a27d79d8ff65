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

//! The shared configuration and resources used by all requests.
//!
//! Applications create one [GeoApiContext] and use it for all their
//! requests. The context holds the credentials, the retry and rate limiting
//! configuration, the HTTP transport, and the executor running the requests.
//!
//! ## Example: create a context with an API key
//!
//! ```
//! # use google_maps_services::context::GeoApiContext;
//! let context = GeoApiContext::builder()
//!     .with_api_key("AIza-your-api-key")
//!     .build()?;
//! # Ok::<(), google_maps_services::error::Error>(())
//! ```
//!
//! ## Example: limit retries
//!
//! ```
//! # use google_maps_services::context::GeoApiContext;
//! use std::time::Duration;
//! let context = GeoApiContext::builder()
//!     .with_api_key("AIza-your-api-key")
//!     .with_max_retries(3)
//!     .with_retry_timeout(Duration::from_secs(10))
//!     .build()?;
//! # Ok::<(), google_maps_services::error::Error>(())
//! ```

use crate::Result;
use crate::api_config::{ApiConfig, HttpMethod};
use crate::dispatch::{Call, execute};
use crate::error::{ApiErrorKind, Error};
use crate::query::{QueryParams, encode};
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};
use crate::url_signer::{HmacUrlSigner, UrlSigner};
use gax::backoff_policy::{BackoffPolicy, BackoffPolicyArg};
use gax::exponential_backoff::ExponentialBackoff;
use gax::metrics::{NoOpRequestMetricsReporter, RequestMetricsReporter};
use gax::pending_result::PendingResult;
use gax::rate_limiter::RateLimiter;
use gax::retry_policy::{RetryPolicy, RetryPolicyArg, RetryPolicyExt, RetryableErrorKinds};
use http::{HeaderMap, HeaderValue};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

/// The prefix of every valid API key.
const API_KEY_PREFIX: &str = "AIza";

/// The header carrying the experience ID.
pub const EXPERIENCE_ID_HEADER: &str = "X-Goog-Maps-Experience-ID";

const USER_AGENT: &str = concat!("GoogleGeoApiClientRust/", env!("CARGO_PKG_VERSION"));
const DEFAULT_RETRY_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_QUERY_RATE_LIMIT: f64 = 50.0;

/// The configuration and resources shared by all requests.
///
/// The context is cheap to clone, all the clones share the same
/// configuration and resources. Dropping the last clone, or calling
/// [shutdown()][GeoApiContext::shutdown], stops the executor.
#[derive(Clone)]
pub struct GeoApiContext {
    inner: Arc<Inner>,
}

struct Inner {
    settings: Arc<Settings>,
    experience_id: RwLock<Option<String>>,
    runtime: Mutex<Option<tokio::runtime::Runtime>>,
    shutdown: AtomicBool,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let runtime = self
            .runtime
            .get_mut()
            .map(Option::take)
            .unwrap_or_default();
        if let Some(runtime) = runtime {
            runtime.shutdown_background();
        }
    }
}

/// The immutable configuration used by the request tasks.
pub(crate) struct Settings {
    api_key: Option<String>,
    client_id: Option<String>,
    signer: Option<Arc<dyn UrlSigner>>,
    base_url: Option<String>,
    channel: Option<String>,
    user_agent: HeaderValue,
    pub(crate) retry_policy: Arc<dyn RetryPolicy>,
    pub(crate) backoff_policy: Arc<dyn BackoffPolicy>,
    pub(crate) rate_limiter: Option<Arc<RateLimiter>>,
    pub(crate) transport: Arc<dyn HttpTransport>,
    pub(crate) metrics_reporter: Arc<dyn RequestMetricsReporter>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[censored]"))
            .field("client_id", &self.client_id)
            .field("signer", &self.signer)
            .field("base_url", &self.base_url)
            .field("channel", &self.channel)
            .field("user_agent", &self.user_agent)
            .field("retry_policy", &self.retry_policy)
            .field("backoff_policy", &self.backoff_policy)
            .field("rate_limiter", &self.rate_limiter)
            .field("transport", &self.transport)
            .field("metrics_reporter", &self.metrics_reporter)
            .finish()
    }
}

impl std::fmt::Debug for GeoApiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoApiContext")
            .field("settings", &self.inner.settings)
            .field("experience_id", &self.experience_id())
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}

impl GeoApiContext {
    /// Returns a builder to configure a new context.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Sets the experience ID sent with subsequent requests.
    ///
    /// Multiple values are joined with a comma. An empty list clears the
    /// experience ID. Requests already dispatched are not affected.
    ///
    /// # Example
    /// ```
    /// # use google_maps_services::context::GeoApiContext;
    /// # let context = GeoApiContext::builder().with_api_key("AIza-key").build()?;
    /// context.set_experience_id(["exp-1", "exp-2"]);
    /// assert_eq!(context.experience_id().as_deref(), Some("exp-1,exp-2"));
    /// context.set_experience_id(Vec::<String>::new());
    /// assert_eq!(context.experience_id(), None);
    /// # Ok::<(), google_maps_services::error::Error>(())
    /// ```
    pub fn set_experience_id<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        *self.experience_id_mut() = join_experience_ids(ids);
    }

    /// The current experience ID, if any.
    pub fn experience_id(&self) -> Option<String> {
        self.inner
            .experience_id
            .read()
            .expect("experience id lock is poisoned")
            .clone()
    }

    /// Clears the experience ID, subsequent requests omit the header.
    pub fn clear_experience_id(&self) {
        *self.experience_id_mut() = None;
    }

    /// Stops the executor.
    ///
    /// Requests in progress fail with an error satisfying
    /// [Error::is_shutdown]. New requests fail immediately with the same
    /// error.
    pub fn shutdown(&self) {
        self.inner.shutdown.store(true, Ordering::SeqCst);
        let runtime = self
            .inner
            .runtime
            .lock()
            .expect("runtime lock is poisoned")
            .take();
        if let Some(runtime) = runtime {
            tracing::debug!("shutting down the request executor");
            runtime.shutdown_background();
        }
    }

    /// Returns true if [shutdown()][GeoApiContext::shutdown] was called.
    pub fn is_shutdown(&self) -> bool {
        self.inner.shutdown.load(Ordering::SeqCst)
    }

    /// The rate limiter shared by all requests, if enabled.
    ///
    /// Applications may change the rate of a running context with
    /// [RateLimiter::set_rate].
    pub fn rate_limiter(&self) -> Option<Arc<RateLimiter>> {
        self.inner.settings.rate_limiter.clone()
    }

    pub(crate) fn settings(&self) -> Arc<Settings> {
        self.inner.settings.clone()
    }

    fn experience_id_mut(&self) -> std::sync::RwLockWriteGuard<'_, Option<String>> {
        self.inner
            .experience_id
            .write()
            .expect("experience id lock is poisoned")
    }

    /// Verifies the credentials can be used with an endpoint.
    pub(crate) fn check_context(&self, can_use_client_id: bool) -> Result<()> {
        let settings = &self.inner.settings;
        match (&settings.api_key, &settings.signer) {
            (None, None) => Err(Error::configuration(
                "Must provide either API key or Maps for Work credentials.",
            )),
            (None, Some(_)) if !can_use_client_id => Err(Error::configuration(
                "API does not support client ID & secret - you must provide a key",
            )),
            (Some(key), None) if !key.starts_with(API_KEY_PREFIX) => {
                Err(Error::configuration("Invalid API key."))
            }
            _ => Ok(()),
        }
    }

    /// The request path and query string, including credentials.
    pub(crate) fn path_and_query(&self, config: &ApiConfig, params: &QueryParams) -> String {
        let settings = &self.inner.settings;
        let client = settings
            .client_id
            .as_ref()
            .zip(settings.signer.as_ref())
            .filter(|_| config.supports_client_id);
        let mut url = String::from(config.path);
        match client {
            Some((client_id, _)) => {
                url.push_str("?client=");
                url.push_str(&encode(client_id));
            }
            None => {
                url.push_str("?key=");
                url.push_str(&encode(settings.api_key.as_deref().unwrap_or_default()));
            }
        }
        if !params.is_empty() {
            url.push('&');
            url.push_str(&params.to_query_string());
        }
        if let Some(channel) = settings.channel.as_ref().filter(|_| !params.contains("channel")) {
            url.push_str("&channel=");
            url.push_str(&encode(channel));
        }
        if let Some((_, signer)) = client {
            let signature = signer.signature(&url);
            url.push_str("&signature=");
            url.push_str(&signature);
        }
        url
    }

    /// The full URL of a request, including credentials.
    pub(crate) fn url(&self, config: &ApiConfig, params: &QueryParams) -> String {
        let host = self
            .inner
            .settings
            .base_url
            .as_deref()
            .unwrap_or(config.host_name);
        format!(
            "{}{}",
            host.trim_end_matches('/'),
            self.path_and_query(config, params)
        )
    }

    /// Assembles the request for an endpoint.
    pub(crate) fn http_request(
        &self,
        config: &ApiConfig,
        params: &QueryParams,
        body: Option<String>,
    ) -> Result<HttpRequest> {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::USER_AGENT, self.inner.settings.user_agent.clone());
        if let Some(id) = self.experience_id() {
            let value = HeaderValue::from_str(&id).map_err(Error::invalid_argument)?;
            headers.insert(EXPERIENCE_ID_HEADER, value);
        }
        if config.method == HttpMethod::Post {
            headers.insert(
                http::header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }
        Ok(HttpRequest {
            method: config.method.into(),
            url: self.url(config, params),
            headers,
            body: body.map(bytes::Bytes::from),
            timeout: None,
        })
    }

    /// Runs `call` on the executor.
    pub(crate) fn dispatch<T>(&self, call: Call<T>) -> Result<PendingResult<T>>
    where
        T: Clone + Send + 'static,
    {
        let guard = self.inner.runtime.lock().expect("runtime lock is poisoned");
        let Some(runtime) = guard.as_ref() else {
            tracing::warn!(request = call.name, "request sent to a context after shutdown");
            return Err(Error::shutdown());
        };
        tracing::debug!(
            request = call.name,
            method = %call.request.method,
            path = call.request.url.split('?').next().unwrap_or_default(),
            "dispatching request"
        );
        let settings = self.settings();
        Ok(gax::pending_result::spawn(
            runtime.handle(),
            move |completer| async move {
                completer.complete(execute(settings, call).await);
            },
        ))
    }
}

fn join_experience_ids<I, S>(ids: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = ids
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(",");
    Some(joined).filter(|s| !s.is_empty())
}

fn default_retry_policy(
    kinds: RetryableErrorKinds,
    timeout: Duration,
    max_retries: Option<u32>,
) -> Arc<dyn RetryPolicy> {
    let policy = kinds.with_time_limit(timeout);
    match max_retries {
        Some(n) => Arc::new(policy.with_attempt_limit(n.saturating_add(1))),
        None => Arc::new(policy),
    }
}

#[derive(Clone, Debug)]
enum RateLimit {
    Limited { qps: f64, burst_seconds: f64 },
    Unlimited,
}

/// Configures and creates a [GeoApiContext].
///
/// Obtain a builder with [GeoApiContext::builder()].
#[derive(Clone)]
pub struct Builder {
    api_key: Option<String>,
    client_id: Option<String>,
    signer: Option<Arc<dyn UrlSigner>>,
    credentials_error: Option<Arc<crate::url_signer::Error>>,
    base_url: Option<String>,
    channel: Option<String>,
    experience_id: Option<String>,
    max_retries: Option<u32>,
    retry_timeout: Duration,
    retryable_kinds: RetryableErrorKinds,
    retry_policy: Option<Arc<dyn RetryPolicy>>,
    backoff_policy: Option<Arc<dyn BackoffPolicy>>,
    rate_limit: RateLimit,
    transport: Option<Arc<dyn HttpTransport>>,
    metrics_reporter: Arc<dyn RequestMetricsReporter>,
    worker_threads: Option<usize>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            api_key: None,
            client_id: None,
            signer: None,
            credentials_error: None,
            base_url: None,
            channel: None,
            experience_id: None,
            max_retries: None,
            retry_timeout: DEFAULT_RETRY_TIMEOUT,
            retryable_kinds: RetryableErrorKinds::default(),
            retry_policy: None,
            backoff_policy: None,
            rate_limit: RateLimit::Limited {
                qps: DEFAULT_QUERY_RATE_LIMIT,
                burst_seconds: 1.0,
            },
            transport: None,
            metrics_reporter: Arc::new(NoOpRequestMetricsReporter),
            worker_threads: None,
            connect_timeout: None,
            read_timeout: None,
            write_timeout: None,
            user_agent: None,
        }
    }
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("api_key", &self.api_key.as_ref().map(|_| "[censored]"))
            .field("client_id", &self.client_id)
            .field("signer", &self.signer)
            .field("base_url", &self.base_url)
            .field("channel", &self.channel)
            .field("experience_id", &self.experience_id)
            .field("max_retries", &self.max_retries)
            .field("retry_timeout", &self.retry_timeout)
            .field("retryable_kinds", &self.retryable_kinds)
            .field("retry_policy", &self.retry_policy)
            .field("backoff_policy", &self.backoff_policy)
            .field("rate_limit", &self.rate_limit)
            .field("transport", &self.transport)
            .field("worker_threads", &self.worker_threads)
            .finish()
    }
}

impl Builder {
    /// Authenticates requests with an API key.
    pub fn with_api_key<V: Into<String>>(mut self, v: V) -> Self {
        self.api_key = Some(v.into());
        self
    }

    /// Authenticates requests with a client ID and a base64 encoded secret.
    ///
    /// Endpoints that do not support client ID authentication use the API
    /// key, if one is configured. An invalid secret is reported by
    /// [build()][Builder::build].
    pub fn with_enterprise_credentials<C, S>(mut self, client_id: C, secret: S) -> Self
    where
        C: Into<String>,
        S: AsRef<str>,
    {
        self.client_id = Some(client_id.into());
        match HmacUrlSigner::new(secret) {
            Ok(signer) => {
                self.signer = Some(Arc::new(signer));
                self.credentials_error = None;
            }
            Err(e) => {
                self.signer = None;
                self.credentials_error = Some(Arc::new(e));
            }
        }
        self
    }

    /// Authenticates requests with a client ID and a custom signer.
    pub fn with_url_signer<C, S>(mut self, client_id: C, signer: S) -> Self
    where
        C: Into<String>,
        S: UrlSigner + 'static,
    {
        self.client_id = Some(client_id.into());
        self.signer = Some(Arc::new(signer));
        self.credentials_error = None;
        self
    }

    /// Sends all requests to this scheme and host, for example,
    /// `http://localhost:8080`.
    ///
    /// Mostly useful in tests.
    pub fn with_base_url<V: Into<String>>(mut self, v: V) -> Self {
        self.base_url = Some(v.into());
        self
    }

    /// Sets the default `channel` parameter.
    ///
    /// Requests that set their own channel take precedence.
    pub fn with_channel<V: Into<String>>(mut self, v: V) -> Self {
        self.channel = Some(v.into());
        self
    }

    /// Sets the initial experience ID.
    pub fn with_experience_id<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.experience_id = join_experience_ids(ids);
        self
    }

    /// Limits the number of retries, in addition to the retry timeout.
    ///
    /// A request is sent at most `v + 1` times.
    pub fn with_max_retries(mut self, v: u32) -> Self {
        self.max_retries = Some(v);
        self
    }

    /// Limits the total time spent retrying a request. The default is 60
    /// seconds.
    pub fn with_retry_timeout(mut self, v: Duration) -> Self {
        self.retry_timeout = v;
        self
    }

    /// Sends each request at most once.
    pub fn disable_retries(self) -> Self {
        self.with_max_retries(0)
    }

    /// Adds or removes a kind of service error from the retry allow-list.
    ///
    /// By default [ApiErrorKind::OverQueryLimit] and
    /// [ApiErrorKind::UnknownError] are retried. I/O errors are always
    /// retried.
    pub fn toggle_if_exception_is_allowed_to_retry(
        mut self,
        kind: ApiErrorKind,
        allowed: bool,
    ) -> Self {
        self.retryable_kinds.set(kind, allowed);
        self
    }

    /// Replaces the retry policy.
    ///
    /// The policy replaces the retry allow-list, the retry timeout, and the
    /// maximum number of retries.
    ///
    /// # Example
    /// ```
    /// # use google_maps_services::context::GeoApiContext;
    /// use google_maps_services::retry_policy::{RetryPolicyExt, RetryableErrorKinds};
    /// let context = GeoApiContext::builder()
    ///     .with_api_key("AIza-key")
    ///     .with_retry_policy(RetryableErrorKinds::none().with_attempt_limit(2))
    ///     .build()?;
    /// # Ok::<(), google_maps_services::error::Error>(())
    /// ```
    pub fn with_retry_policy<V: Into<RetryPolicyArg>>(mut self, v: V) -> Self {
        self.retry_policy = Some(v.into().into_inner());
        self
    }

    /// Replaces the backoff policy.
    pub fn with_backoff_policy<V: Into<BackoffPolicyArg>>(mut self, v: V) -> Self {
        self.backoff_policy = Some(v.into().into_inner());
        self
    }

    /// Limits the rate of requests. The default is 50 queries per second.
    pub fn with_query_rate_limit(self, qps: f64) -> Self {
        self.with_query_rate_limit_burst(qps, 1.0)
    }

    /// Limits the rate of requests, allowing bursts of up to `burst_seconds`
    /// worth of unused capacity.
    pub fn with_query_rate_limit_burst(mut self, qps: f64, burst_seconds: f64) -> Self {
        self.rate_limit = RateLimit::Limited { qps, burst_seconds };
        self
    }

    /// Disables rate limiting.
    pub fn without_rate_limit(mut self) -> Self {
        self.rate_limit = RateLimit::Unlimited;
        self
    }

    /// Replaces the HTTP transport.
    ///
    /// The connect, read, and write timeouts are ignored when a custom
    /// transport is provided.
    pub fn with_transport<T: HttpTransport + 'static>(mut self, v: T) -> Self {
        self.transport = Some(Arc::new(v));
        self
    }

    /// Reports the lifecycle of each request to `v`.
    pub fn with_metrics_reporter<R: RequestMetricsReporter + 'static>(mut self, v: R) -> Self {
        self.metrics_reporter = Arc::new(v);
        self
    }

    /// Sets the number of threads of the executor.
    pub fn with_worker_threads(mut self, v: usize) -> Self {
        self.worker_threads = Some(v);
        self
    }

    /// Sets the connect timeout of the default transport.
    pub fn with_connect_timeout(mut self, v: Duration) -> Self {
        self.connect_timeout = Some(v);
        self
    }

    /// Sets the read timeout of the default transport.
    pub fn with_read_timeout(mut self, v: Duration) -> Self {
        self.read_timeout = Some(v);
        self
    }

    /// Sets the write timeout of the default transport.
    pub fn with_write_timeout(mut self, v: Duration) -> Self {
        self.write_timeout = Some(v);
        self
    }

    /// Prefixes the default `User-Agent` header with `v`.
    pub fn with_user_agent<V: Into<String>>(mut self, v: V) -> Self {
        self.user_agent = Some(v.into());
        self
    }

    /// Creates the context.
    ///
    /// Fails if the client secret is invalid, if the rate limit or number of
    /// worker threads is invalid, or if the executor or default transport
    /// cannot be created. Missing credentials are reported when a request is
    /// sent.
    pub fn build(self) -> Result<GeoApiContext> {
        if let Some(e) = self.credentials_error {
            return Err(Error::configuration(e));
        }
        let rate_limiter = match self.rate_limit {
            RateLimit::Limited { qps, burst_seconds } => Some(Arc::new(
                RateLimiter::with_burst(qps, burst_seconds).map_err(Error::configuration)?,
            )),
            RateLimit::Unlimited => None,
        };
        let user_agent = match &self.user_agent {
            Some(prefix) => format!("{prefix} {USER_AGENT}"),
            None => USER_AGENT.to_string(),
        };
        let user_agent = HeaderValue::from_str(&user_agent).map_err(Error::configuration)?;
        let retry_policy = match self.retry_policy {
            Some(p) => p,
            None => default_retry_policy(self.retryable_kinds, self.retry_timeout, self.max_retries),
        };
        let backoff_policy: Arc<dyn BackoffPolicy> = match self.backoff_policy {
            Some(p) => p,
            None => Arc::new(ExponentialBackoff::default()),
        };
        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::with_timeouts(
                self.connect_timeout,
                self.read_timeout,
                self.write_timeout,
            )?),
        };

        let mut runtime = tokio::runtime::Builder::new_multi_thread();
        runtime.enable_all().thread_name("google-maps-services");
        if let Some(n) = self.worker_threads {
            if n == 0 {
                return Err(Error::configuration("the number of worker threads must be positive"));
            }
            runtime.worker_threads(n);
        }
        let runtime = runtime.build().map_err(Error::io)?;

        let settings = Settings {
            api_key: self.api_key,
            client_id: self.client_id,
            signer: self.signer,
            base_url: self.base_url,
            channel: self.channel,
            user_agent,
            retry_policy,
            backoff_policy,
            rate_limiter,
            transport,
            metrics_reporter: self.metrics_reporter,
        };
        Ok(GeoApiContext {
            inner: Arc::new(Inner {
                settings: Arc::new(settings),
                experience_id: RwLock::new(self.experience_id),
                runtime: Mutex::new(Some(runtime)),
                shutdown: AtomicBool::new(false),
            }),
        })
    }
}
