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

//! Decodes responses into results or errors.
//!
//! Every endpoint defines a response type implementing [ApiResponse]. The
//! functions in this module turn a [HttpResponse] into the endpoint result,
//! applying the same HTTP status handling and error classification to every
//! endpoint.

use crate::Result;
use crate::api_config::FieldNamingPolicy;
use crate::error::{ApiError, ApiErrorKind, Error, classify};
use crate::model::ImageResult;
use crate::transport::HttpResponse;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// HTTP status codes retried without looking at the response body.
const SERVER_ERROR_STATUS_CODES: [u16; 3] = [500, 503, 504];

/// The raw, decoded response of one endpoint.
pub trait ApiResponse: DeserializeOwned {
    /// The result returned to the application.
    type Output;

    /// The status reported by the service, or its closest equivalent.
    fn status(&self) -> &str;

    /// The error message reported by the service, if any.
    fn error_message(&self) -> Option<&str>;

    /// Returns true if the response contains a result.
    fn successful(&self) -> bool {
        self.status() == "OK"
    }

    /// Consumes a successful response and returns its result.
    fn into_result(self) -> Self::Output;

    /// The error for an unsuccessful response.
    fn error(&self) -> ApiError {
        let message = self.error_message();
        classify(self.status(), message).unwrap_or_else(|| {
            ApiError::new(
                ApiErrorKind::UnknownError,
                self.status(),
                message.unwrap_or_default(),
            )
        })
    }
}

/// Decodes a JSON response.
pub fn decode_json<R: ApiResponse>(
    naming: FieldNamingPolicy,
    response: HttpResponse,
) -> Result<R::Output> {
    if SERVER_ERROR_STATUS_CODES.contains(&response.status) {
        return Err(Error::http(response.status, response.body));
    }
    let decoded = match parse::<R>(naming, &response.body) {
        Ok(r) => r,
        Err(e) if response.is_success() => return Err(Error::deser(e)),
        Err(_) => return Err(Error::http(response.status, response.body)),
    };
    if !decoded.successful() {
        return Err(Error::api_with_http_status(
            decoded.error(),
            response.status,
        ));
    }
    Ok(decoded.into_result())
}

/// Decodes a response containing an image.
///
/// The services report errors for image requests with a JSON body, or with
/// a plain text body and an error status code.
pub fn decode_image(response: HttpResponse) -> Result<ImageResult> {
    if SERVER_ERROR_STATUS_CODES.contains(&response.status) {
        return Err(Error::http(response.status, response.body));
    }
    let content_type = response.content_type().to_string();
    if response.is_success() && content_type.starts_with("image/") {
        return Ok(ImageResult {
            content_type,
            image_data: response.body,
        });
    }
    match parse::<StatusOnly>(FieldNamingPolicy::LowerCaseWithUnderscores, &response.body) {
        Ok(r) if !r.successful() => Err(Error::api_with_http_status(r.error(), response.status)),
        _ if response.is_success() => Err(Error::deser(format!(
            "expected an image, got a response with content type {content_type:?}"
        ))),
        _ => Err(Error::http(response.status, response.body)),
    }
}

fn parse<R: DeserializeOwned>(
    naming: FieldNamingPolicy,
    body: &[u8],
) -> serde_json::Result<R> {
    match naming {
        FieldNamingPolicy::LowerCaseWithUnderscores => serde_json::from_slice(body),
        FieldNamingPolicy::Identity => {
            let value = serde_json::from_slice::<Value>(body)?;
            serde_json::from_value(snake_case_keys(value))
        }
    }
}

/// Rewrites the keys of every JSON object from `camelCase` to `snake_case`.
fn snake_case_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (to_snake_case(&k), snake_case_keys(v)))
                .collect::<Map<_, _>>(),
        ),
        Value::Array(values) => Value::Array(values.into_iter().map(snake_case_keys).collect()),
        v => v,
    }
}

fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// A response with only a status and an error message.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub(crate) struct StatusOnly {
    status: String,
    error_message: Option<String>,
}

impl ApiResponse for StatusOnly {
    type Output = ();

    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn into_result(self) -> Self::Output {}
}
