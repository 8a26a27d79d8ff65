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

//! The request builder shared by all the endpoints.

use crate::Result;
use crate::api_config::ApiConfig;
use crate::context::GeoApiContext;
use crate::dispatch::Call;
use crate::query::{QueryParams, UrlValue};
use crate::transport::HttpResponse;
use gax::pending_result::PendingResult;
use std::future::{Future, IntoFuture};
use std::pin::Pin;

/// Describes one endpoint of the Maps web services.
///
/// Each endpoint is a small type implementing this trait. The type may hold
/// endpoint specific state, such as the JSON payload of `POST` requests.
pub trait Endpoint: Send + Sync + 'static {
    /// The result of a successful request.
    type Output: Clone + Send + 'static;

    /// How to reach the endpoint and decode its responses.
    const CONFIG: ApiConfig;

    /// The name used in logs and metrics.
    const NAME: &'static str;

    /// Verifies the request parameters before the request is sent.
    fn validate(&self, _params: &QueryParams) -> Result<()> {
        Ok(())
    }

    /// The JSON body of `POST` requests.
    fn body(&self) -> Result<Option<String>> {
        Ok(None)
    }

    /// Decodes a response.
    fn decode(response: HttpResponse) -> Result<Self::Output>;
}

/// A request to one endpoint, before it is sent.
///
/// Each endpoint adds its own setters. The methods in this type are available
/// for all endpoints. Sending the request, or awaiting it, consumes the
/// builder.
///
/// # Example
/// ```no_run
/// # use google_maps_services::context::GeoApiContext;
/// # async fn sample(context: &GeoApiContext) -> google_maps_services::Result<()> {
/// let routes = context
///     .directions()
///     .origin("Toronto")
///     .destination("Montreal")
///     .language("fr")
///     .await?;
/// println!("{routes:?}");
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct PendingRequest<E> {
    context: GeoApiContext,
    params: QueryParams,
    endpoint: E,
}

impl<E: Endpoint> PendingRequest<E> {
    pub(crate) fn new(context: &GeoApiContext, endpoint: E) -> Self {
        Self {
            context: context.clone(),
            params: QueryParams::default(),
            endpoint,
        }
    }

    /// Sets a parameter, replacing any previous value.
    pub fn param<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: UrlValue,
    {
        self.params.set(name, value.to_url_value());
        self
    }

    /// Appends a value to a repeated parameter.
    pub fn param_add_to_list<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: UrlValue,
    {
        self.params.add(name, value.to_url_value());
        self
    }

    /// Sets the language of the results.
    pub fn language<V: Into<String>>(self, v: V) -> Self {
        self.param("language", v.into())
    }

    /// Sets the `channel` parameter, overriding the context default.
    pub fn channel<V: Into<String>>(self, v: V) -> Self {
        self.param("channel", v.into())
    }

    /// Sets a parameter not otherwise supported by this client.
    pub fn custom<N, V>(self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.param(name, value.into())
    }

    /// The parameters set so far, in order.
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Validates the request and returns its full URL, including the
    /// credentials and signature, without sending it.
    pub fn url(&self) -> Result<String> {
        self.check()?;
        Ok(self.context.url(&E::CONFIG, &self.params))
    }

    /// Validates and sends the request.
    ///
    /// Invalid parameters and missing credentials are reported immediately.
    /// Errors from the service, or reaching the service, are reported through
    /// the returned [PendingResult].
    pub fn send(self) -> Result<PendingResult<E::Output>> {
        self.check()?;
        let body = self.endpoint.body()?;
        let request = self
            .context
            .http_request(&E::CONFIG, &self.params, body)?;
        self.context.dispatch(Call {
            name: E::NAME,
            request,
            decode: E::decode,
        })
    }

    pub(crate) fn endpoint_mut(&mut self) -> &mut E {
        &mut self.endpoint
    }

    pub(crate) fn params_mut(&mut self) -> &mut QueryParams {
        &mut self.params
    }

    fn check(&self) -> Result<()> {
        self.endpoint.validate(&self.params)?;
        self.context.check_context(E::CONFIG.supports_client_id)
    }
}

impl<E: Endpoint> IntoFuture for PendingRequest<E> {
    type Output = Result<E::Output>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.send()?.await })
    }
}

/// Helpers for endpoint validation.
pub(crate) mod validate {
    use crate::Result;
    use crate::error::Error;
    use crate::query::QueryParams;

    /// The largest radius accepted by the Places endpoints, in meters.
    pub const MAX_RADIUS: u32 = 50_000;

    pub fn require(params: &QueryParams, name: &str) -> Result<()> {
        if params.contains(name) {
            return Ok(());
        }
        Err(Error::invalid_argument(format!(
            "request must contain '{name}'"
        )))
    }

    pub fn exclusive(params: &QueryParams, a: &str, b: &str) -> Result<()> {
        if params.contains(a) && params.contains(b) {
            return Err(Error::invalid_argument(format!(
                "request may contain '{a}' or '{b}', but not both"
            )));
        }
        Ok(())
    }

    pub fn max_radius(params: &QueryParams) -> Result<()> {
        let radius = params.get("radius").and_then(|r| r.parse::<u64>().ok());
        if radius.is_some_and(|r| r > MAX_RADIUS as u64) {
            return Err(Error::invalid_argument(
                "the maximum allowed radius is 50,000 meters",
            ));
        }
        Ok(())
    }
}
