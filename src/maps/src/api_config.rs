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

//! Static per-endpoint configuration.

/// The default host for the Maps web services.
pub const DEFAULT_HOST: &str = "https://maps.googleapis.com";

/// How JSON keys in a response map to the fields of the Rust model.
///
/// Rust model fields are always `snake_case`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldNamingPolicy {
    /// The service returns `snake_case` keys, they are used as-is.
    #[default]
    LowerCaseWithUnderscores,
    /// The service returns `camelCase` keys, they are converted to
    /// `snake_case` before decoding.
    Identity,
}

/// The HTTP verb used by an endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HttpMethod {
    /// Parameters are sent in the query string.
    #[default]
    Get,
    /// Parameters are sent in a JSON body.
    Post,
}

impl From<HttpMethod> for http::Method {
    fn from(value: HttpMethod) -> Self {
        match value {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Post => http::Method::POST,
        }
    }
}

/// Describes how to reach one endpoint and decode its responses.
///
/// # Example
/// ```
/// # use google_maps_services::api_config::*;
/// const CONFIG: ApiConfig = ApiConfig::new("/maps/api/timezone/json")
///     .with_field_naming(FieldNamingPolicy::Identity);
/// assert_eq!(CONFIG.host_name, DEFAULT_HOST);
/// assert!(CONFIG.supports_client_id);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// The request path, appended to the host.
    pub path: &'static str,
    /// The scheme and host, unless overridden in the context.
    pub host_name: &'static str,
    /// The naming convention of the response.
    pub field_naming: FieldNamingPolicy,
    /// If false, the endpoint requires an API key.
    pub supports_client_id: bool,
    /// The HTTP verb.
    pub method: HttpMethod,
}

impl ApiConfig {
    /// A `GET` endpoint on [DEFAULT_HOST], with `snake_case` responses and
    /// support for client ID authentication.
    pub const fn new(path: &'static str) -> Self {
        Self {
            path,
            host_name: DEFAULT_HOST,
            field_naming: FieldNamingPolicy::LowerCaseWithUnderscores,
            supports_client_id: true,
            method: HttpMethod::Get,
        }
    }

    /// Changes the host.
    pub const fn with_host_name(mut self, v: &'static str) -> Self {
        self.host_name = v;
        self
    }

    /// Changes the field naming policy.
    pub const fn with_field_naming(mut self, v: FieldNamingPolicy) -> Self {
        self.field_naming = v;
        self
    }

    /// Disables client ID authentication for the endpoint.
    pub const fn without_client_id(mut self) -> Self {
        self.supports_client_id = false;
        self
    }

    /// Changes the HTTP verb.
    pub const fn with_method(mut self, v: HttpMethod) -> Self {
        self.method = v;
        self
    }
}
