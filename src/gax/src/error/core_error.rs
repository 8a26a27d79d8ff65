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

use super::api_error::ApiError;
use std::error::Error as StdError;
use std::sync::Arc;

type BoxError = Box<dyn StdError + Send + Sync>;
type SharedError = Arc<dyn StdError + Send + Sync>;

/// The core error returned by the Maps web services client.
///
/// The client reports errors from multiple sources. The service may reject
/// the request, the transport may be unable to reach the service, the
/// response may be impossible to parse, or the request may be rejected
/// locally because the client is misconfigured or the request parameters are
/// invalid.
///
/// Most applications will just return the error or log it. Applications that
/// need to interrogate the error can use the predicates and accessors in this
/// type, or query the error [source][std::error::Error::source].
///
/// The error is cheap to clone. A single failed request may be observed by
/// several waiters, and all of them receive the same error.
///
/// # Example
/// ```
/// use google_maps_gax::error::Error;
/// match example_function() {
///     Err(e) if e.api_error().is_some() => {
///         println!("service error {e}, status {}", e.api_error().unwrap().status());
///     },
///     Err(e) if e.is_io() => { println!("cannot reach the service {e}"); },
///     Err(e) => { println!("some other error {e}"); },
///     Ok(_) => { println!("success, how boring"); },
/// }
///
/// fn example_function() -> Result<String, Error> {
///     // ... details omitted ...
///     # use google_maps_gax::error::{ApiError, ApiErrorKind};
///     # Err(Error::api(ApiError::new(ApiErrorKind::NotFound, "NOT_FOUND", "")))
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<SharedError>,
}

impl Error {
    /// Creates an error with the information returned by the service.
    ///
    /// # Example
    /// ```
    /// use google_maps_gax::error::{ApiError, ApiErrorKind, Error};
    /// let api = ApiError::new(ApiErrorKind::InvalidRequest, "INVALID_REQUEST", "bad origin");
    /// let error = Error::api(api.clone());
    /// assert_eq!(error.api_error(), Some(&api));
    /// ```
    pub fn api(error: ApiError) -> Self {
        Self {
            kind: ErrorKind::Api(Box::new(ApiDetails {
                error,
                status_code: None,
            })),
            source: None,
        }
    }

    /// Creates an error with the information returned by the service and the
    /// HTTP status code of the response that carried it.
    pub fn api_with_http_status(error: ApiError, status_code: u16) -> Self {
        Self {
            kind: ErrorKind::Api(Box::new(ApiDetails {
                error,
                status_code: Some(status_code),
            })),
            source: None,
        }
    }

    /// The error details reported by the service, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match &self.kind {
            ErrorKind::Api(d) => Some(&d.error),
            _ => None,
        }
    }

    /// A response with an unexpected HTTP status and a payload that could not
    /// be interpreted as a service error.
    pub fn http(status_code: u16, payload: bytes::Bytes) -> Self {
        Self {
            kind: ErrorKind::Http(Box::new(HttpDetails {
                status_code,
                payload,
            })),
            source: None,
        }
    }

    /// The HTTP status code, if any, associated with this error.
    ///
    /// Errors reported by the service include the status code of the response
    /// carrying them when the error was created by the transport layer.
    pub fn http_status_code(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Http(d) => Some(d.status_code),
            ErrorKind::Api(d) => d.status_code,
            _ => None,
        }
    }

    /// The HTTP payload, if any, associated with this error.
    pub fn http_payload(&self) -> Option<&bytes::Bytes> {
        match &self.kind {
            ErrorKind::Http(d) => Some(&d.payload),
            _ => None,
        }
    }

    /// A problem in the transport layer without a full HTTP response.
    ///
    /// Examples include: DNS resolution errors, connection failures, broken
    /// connections after the request is sent, and timeouts reading the
    /// response.
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        Self::with_source(ErrorKind::Io, source)
    }

    /// The request could not be completed because of a transport problem.
    ///
    /// # Troubleshooting
    ///
    /// This indicates a problem reaching the service, or receiving the full
    /// response. These errors are always retried, they are only reported once
    /// the retry policy is exhausted. Consider increasing the retry timeout if
    /// the network is unreliable.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ErrorKind::Io)
    }

    /// Creates an error representing a deserialization problem.
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self::with_source(ErrorKind::Deserialization, source)
    }

    /// The response could not be deserialized.
    ///
    /// # Troubleshooting
    ///
    /// Most likely the service returned a payload that does not match the
    /// expected shape, for example, a proxy returned an HTML page instead of a
    /// JSON object. Please check the network configuration. If the problem
    /// persists, please report the issue.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }

    /// Creates an error representing a serialization problem.
    pub fn ser<T: Into<BoxError>>(source: T) -> Self {
        Self::with_source(ErrorKind::Serialization, source)
    }

    /// The request payload could not be serialized.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Serialization)
    }

    /// Creates an error representing a client configuration problem.
    pub fn configuration<T: Into<BoxError>>(source: T) -> Self {
        Self::with_source(ErrorKind::Configuration, source)
    }

    /// The client configuration cannot be used for this request.
    ///
    /// # Troubleshooting
    ///
    /// The client is missing credentials, or has credentials that are not
    /// supported by the endpoint. These errors are detected before any network
    /// traffic and are never retried.
    pub fn is_configuration(&self) -> bool {
        matches!(self.kind, ErrorKind::Configuration)
    }

    /// Creates an error representing invalid request parameters.
    pub fn invalid_argument<T: Into<BoxError>>(source: T) -> Self {
        Self::with_source(ErrorKind::InvalidArgument, source)
    }

    /// The request parameters failed local validation.
    ///
    /// These errors are detected before any network traffic and are never
    /// retried.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidArgument)
    }

    /// Creates an error representing a cancelled request.
    pub fn cancelled() -> Self {
        Self {
            kind: ErrorKind::Cancelled,
            source: None,
        }
    }

    /// The request was cancelled by the application.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, ErrorKind::Cancelled)
    }

    /// Creates an error representing a request abandoned because the client
    /// was shut down.
    pub fn shutdown() -> Self {
        Self {
            kind: ErrorKind::Shutdown,
            source: None,
        }
    }

    /// The client was shut down before the request completed.
    pub fn is_shutdown(&self) -> bool {
        matches!(self.kind, ErrorKind::Shutdown)
    }

    fn with_source<T: Into<BoxError>>(kind: ErrorKind, source: T) -> Self {
        Self {
            kind,
            source: Some(Arc::from(source.into())),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.source) {
            (ErrorKind::Api(d), _) => write!(f, "{}", d.error),
            (ErrorKind::Http(d), _) => d.fmt(f),
            (ErrorKind::Io, Some(e)) => write!(f, "the transport reports an error: {e}"),
            (ErrorKind::Deserialization, Some(e)) => {
                write!(f, "cannot deserialize the response {e}")
            }
            (ErrorKind::Serialization, Some(e)) => write!(f, "cannot serialize the request {e}"),
            (ErrorKind::Configuration, Some(e)) => {
                write!(f, "the client configuration is invalid: {e}")
            }
            (ErrorKind::InvalidArgument, Some(e)) => write!(f, "the request is invalid: {e}"),
            (ErrorKind::Cancelled, _) => write!(f, "the request was cancelled"),
            (ErrorKind::Shutdown, _) => {
                write!(f, "the client was shut down before the request completed")
            }
            (_, None) => unreachable!("no constructor allows this"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error))
    }
}

/// The type of error held by an [Error] instance.
#[derive(Clone, Debug)]
enum ErrorKind {
    Api(Box<ApiDetails>),
    Http(Box<HttpDetails>),
    Io,
    Deserialization,
    Serialization,
    Configuration,
    InvalidArgument,
    Cancelled,
    Shutdown,
}

#[derive(Clone, Debug)]
struct ApiDetails {
    error: ApiError,
    status_code: Option<u16>,
}

#[derive(Clone, Debug)]
struct HttpDetails {
    status_code: u16,
    payload: bytes::Bytes,
}

impl HttpDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = self.status_code;
        match std::str::from_utf8(self.payload.as_ref()) {
            Ok(message) => write!(f, "the HTTP transport reports a [{code}] error: {message}"),
            Err(_) => write!(
                f,
                "the HTTP transport reports a [{code}] error: {:?}",
                self.payload
            ),
        }
    }
}
