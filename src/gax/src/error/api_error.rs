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

/// The message returned with `OVER_QUERY_LIMIT` when the daily quota, and not
/// the per-second rate, is exhausted.
const DAILY_LIMIT_MESSAGE: &str = "You have exceeded your daily request quota for this API.";

/// The classification of an error reported by a Maps web service.
///
/// The services use three overlapping vocabularies for their status values:
/// the classic `status` field (e.g. `OVER_QUERY_LIMIT`), the newer
/// `google.rpc.Code` names (e.g. `RESOURCE_EXHAUSTED`), and the `reason`
/// field of the Geolocation API (e.g. `userRateLimitExceeded`). All of them
/// map to one of these kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ApiErrorKind {
    /// The request succeeded, but returned no results.
    ZeroResults,
    /// The request was malformed, for example, a required parameter is
    /// missing.
    InvalidRequest,
    /// The product of origins and destinations exceeds the per-query limit.
    MaxElementsExceeded,
    /// The requested route is too long to be processed.
    MaxRouteLengthExceeded,
    /// Too many waypoints were provided.
    MaxWaypointsExceeded,
    /// At least one of the locations in the request could not be found.
    NotFound,
    /// The application is sending requests too fast.
    OverQueryLimit,
    /// The application exhausted its daily quota.
    OverDailyLimit,
    /// The service denied the request, typically because of invalid
    /// credentials or a disabled API.
    RequestDenied,
    /// The API key is invalid or the API is not enabled for the key.
    AccessNotConfigured,
    /// The service reported an internal error, or a status this client does
    /// not recognize.
    UnknownError,
}

/// An error reported by one of the Maps web services.
///
/// The raw status (or reason) and message returned by the service are
/// preserved, so applications can log them or inspect values that this
/// client does not recognize.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiError {
    kind: ApiErrorKind,
    status: String,
    message: String,
}

impl ApiError {
    /// Creates a new error.
    pub fn new<S, M>(kind: ApiErrorKind, status: S, message: M) -> Self
    where
        S: Into<String>,
        M: Into<String>,
    {
        Self {
            kind,
            status: status.into(),
            message: message.into(),
        }
    }

    /// The classification for this error.
    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    /// The status (or reason) string returned by the service.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// The human readable message returned by the service, possibly empty.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true if the service returned a status this client does not
    /// recognize.
    pub fn is_unrecognized(&self) -> bool {
        self.kind == ApiErrorKind::UnknownError && self.status != "UNKNOWN_ERROR"
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_unrecognized() {
            return write!(
                f,
                "an unexpected error occurred. Status: {}, Message: {}",
                self.status, self.message
            );
        }
        if self.message.is_empty() {
            return write!(f, "the service reports {}", self.status);
        }
        write!(f, "the service reports {}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Maps a service status (or reason) and message to an [ApiError].
///
/// Returns `None` for `OK`. Every response type uses this function, which
/// guarantees identical error semantics across all the endpoints.
///
/// `ZERO_RESULTS` produces an [ApiErrorKind::ZeroResults] error. Endpoints
/// that treat an empty result as a success check for it before calling this
/// function.
///
/// # Example
/// ```
/// use google_maps_gax::error::{ApiErrorKind, classify};
/// let e = classify("OVER_QUERY_LIMIT", Some("You have exceeded your daily request quota for this API."));
/// assert_eq!(e.map(|e| e.kind()), Some(ApiErrorKind::OverDailyLimit));
/// assert!(classify("OK", None).is_none());
/// ```
pub fn classify(status: &str, message: Option<&str>) -> Option<ApiError> {
    use ApiErrorKind::*;
    let kind = match status {
        "OK" => return None,
        "ZERO_RESULTS" => ZeroResults,
        "INVALID_REQUEST" | "INVALID_ARGUMENT" | "parseError" | "invalid" => InvalidRequest,
        "MAX_ELEMENTS_EXCEEDED" => MaxElementsExceeded,
        "MAX_ROUTE_LENGTH_EXCEEDED" => MaxRouteLengthExceeded,
        "MAX_WAYPOINTS_EXCEEDED" => MaxWaypointsExceeded,
        "NOT_FOUND" | "notFound" => NotFound,
        "OVER_QUERY_LIMIT" | "RESOURCE_EXHAUSTED" | "userRateLimitExceeded" => {
            if message.is_some_and(|m| m.eq_ignore_ascii_case(DAILY_LIMIT_MESSAGE)) {
                OverDailyLimit
            } else {
                OverQueryLimit
            }
        }
        "dailyLimitExceeded" => OverDailyLimit,
        "REQUEST_DENIED" | "PERMISSION_DENIED" => RequestDenied,
        "ACCESS_NOT_CONFIGURED" | "keyInvalid" => AccessNotConfigured,
        _ => UnknownError,
    };
    Some(ApiError::new(kind, status, message.unwrap_or_default()))
}
