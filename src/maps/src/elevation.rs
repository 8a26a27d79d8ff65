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

//! The Elevation API.
//!
//! Returns the elevation of points on the surface of the earth, or of
//! samples along a path.

use crate::Result;
use crate::api_config::ApiConfig;
use crate::api_response::{ApiResponse, decode_json};
use crate::context::GeoApiContext;
use crate::error::{ApiError, ApiErrorKind};
use crate::model::{ElevationResult, EncodedPolyline, LatLng};
use crate::polyline;
use crate::query::{QueryParams, join};
use crate::request::{Endpoint, PendingRequest, validate};
use crate::transport::HttpResponse;

const CONFIG: ApiConfig = ApiConfig::new("/maps/api/elevation/json");

/// The elevation of a single point.
#[derive(Clone, Debug, Default)]
pub struct ElevationAtPoint;

impl Endpoint for ElevationAtPoint {
    type Output = ElevationResult;
    const CONFIG: ApiConfig = CONFIG;
    const NAME: &'static str = "elevation";

    fn validate(&self, params: &QueryParams) -> Result<()> {
        validate::require(params, "locations")
    }

    fn decode(response: HttpResponse) -> Result<ElevationResult> {
        decode_json::<SingleResponse>(Self::CONFIG.field_naming, response)
    }
}

/// The elevation of several points, or of samples along a path.
#[derive(Clone, Debug, Default)]
pub struct ElevationAtPoints;

impl Endpoint for ElevationAtPoints {
    type Output = Vec<ElevationResult>;
    const CONFIG: ApiConfig = CONFIG;
    const NAME: &'static str = "elevation";

    fn validate(&self, params: &QueryParams) -> Result<()> {
        if params.contains("path") {
            return validate::require(params, "samples");
        }
        validate::require(params, "locations")
    }

    fn decode(response: HttpResponse) -> Result<Vec<ElevationResult>> {
        decode_json::<Response>(Self::CONFIG.field_naming, response)
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct Response {
    status: String,
    error_message: Option<String>,
    results: Vec<ElevationResult>,
}

impl ApiResponse for Response {
    type Output = Vec<ElevationResult>;

    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn successful(&self) -> bool {
        matches!(self.status.as_str(), "OK" | "ZERO_RESULTS")
    }

    fn into_result(self) -> Vec<ElevationResult> {
        self.results
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(transparent)]
struct SingleResponse(Response);

impl ApiResponse for SingleResponse {
    type Output = ElevationResult;

    fn status(&self) -> &str {
        &self.0.status
    }

    fn error_message(&self) -> Option<&str> {
        self.0.error_message.as_deref()
    }

    fn successful(&self) -> bool {
        self.0.status == "OK" && !self.0.results.is_empty()
    }

    fn into_result(self) -> ElevationResult {
        // successful() guarantees at least one result.
        self.0.results.into_iter().next().unwrap_or_default()
    }

    fn error(&self) -> ApiError {
        if self.0.status == "OK" {
            return ApiError::new(
                ApiErrorKind::ZeroResults,
                "ZERO_RESULTS",
                "the service returned no elevation for the location",
            );
        }
        self.0.error()
    }
}

/// Encodes `points` as a pipe-separated list or as an encoded polyline,
/// whichever is shorter.
pub fn shortest_param(points: &[LatLng]) -> String {
    let joined = join('|', points);
    let encoded = format!("enc:{}", polyline::encode(points));
    if joined.len() < encoded.len() {
        joined
    } else {
        encoded
    }
}

impl GeoApiContext {
    /// Requests the elevation of a single point.
    ///
    /// # Example
    /// ```no_run
    /// # use google_maps_services::context::GeoApiContext;
    /// use google_maps_services::model::LatLng;
    /// # async fn sample(context: &GeoApiContext) -> google_maps_services::Result<()> {
    /// let result = context.elevation_at_point(LatLng::new(39.7391536, -104.9847034)).await?;
    /// println!("{} meters", result.elevation);
    /// # Ok(()) }
    /// ```
    pub fn elevation_at_point(&self, location: LatLng) -> PendingRequest<ElevationAtPoint> {
        PendingRequest::new(self, ElevationAtPoint).param("locations", location)
    }

    /// Requests the elevation of several points.
    pub fn elevation_at_points(&self, locations: &[LatLng]) -> PendingRequest<ElevationAtPoints> {
        PendingRequest::new(self, ElevationAtPoints).param("locations", shortest_param(locations))
    }

    /// Requests `samples` equidistant elevation samples along `path`.
    pub fn elevation_along_path(
        &self,
        samples: u32,
        path: &[LatLng],
    ) -> PendingRequest<ElevationAtPoints> {
        PendingRequest::new(self, ElevationAtPoints)
            .param("samples", samples)
            .param("path", shortest_param(path))
    }

    /// Requests `samples` equidistant elevation samples along an encoded
    /// path.
    pub fn elevation_along_encoded_path(
        &self,
        samples: u32,
        path: &EncodedPolyline,
    ) -> PendingRequest<ElevationAtPoints> {
        PendingRequest::new(self, ElevationAtPoints)
            .param("samples", samples)
            .param("path", format!("enc:{}", path.encoded_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    type TestResult = anyhow::Result<()>;

    fn response(body: &'static str) -> HttpResponse {
        HttpResponse {
            status: 200,
            body: Bytes::from_static(body.as_bytes()),
            ..Default::default()
        }
    }

    #[test]
    fn shortest_param_two_points() {
        let points = [LatLng::new(1.0, 2.0), LatLng::new(3.0, 4.0)];
        // The literal form needs 43 characters.
        assert_eq!(shortest_param(&points), "enc:_ibE_seK_seK_seK");
    }

    #[test]
    fn shortest_param_empty() {
        assert_eq!(shortest_param(&[]), "");
    }

    #[test]
    fn shortest_param_prefers_polyline_for_long_paths() {
        let points = [
            LatLng::new(38.5, -120.2),
            LatLng::new(40.7, -120.95),
            LatLng::new(43.252, -126.453),
        ];
        assert_eq!(shortest_param(&points), "enc:_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    }

    #[test]
    fn path_request() -> TestResult {
        let context = GeoApiContext::builder().with_api_key("AIza-key").build()?;
        let request = context.elevation_along_path(
            10,
            &[LatLng::new(38.5, -120.2), LatLng::new(40.7, -120.95)],
        );
        assert_eq!(request.params().get("samples"), Some("10"));
        assert!(request.params().contains("path"));
        request.url()?;
        Ok(())
    }

    #[test]
    fn single_point() -> TestResult {
        let got = ElevationAtPoint::decode(response(
            r#"{"status": "OK", "results": [{"elevation": 1608.6, "location": {"lat": 39.7, "lng": -104.9}, "resolution": 4.7}]}"#,
        ))?;
        assert_eq!(got.elevation, 1608.6);
        assert_eq!(got.location, LatLng::new(39.7, -104.9));
        Ok(())
    }

    #[test]
    fn single_point_zero_results_is_an_error() {
        let err = ElevationAtPoint::decode(response(r#"{"status": "ZERO_RESULTS", "results": []}"#))
            .unwrap_err();
        assert_eq!(
            err.api_error().map(|e| e.kind()),
            Some(ApiErrorKind::ZeroResults)
        );
    }

    #[test]
    fn single_point_empty_results_is_an_error() {
        let err = ElevationAtPoint::decode(response(r#"{"status": "OK", "results": []}"#))
            .unwrap_err();
        let api = err.api_error().expect("an API error");
        assert_eq!(api.kind(), ApiErrorKind::ZeroResults);
        assert_eq!(api.status(), "ZERO_RESULTS");
    }

    #[test]
    fn multiple_points_zero_results_is_empty() -> TestResult {
        let got = ElevationAtPoints::decode(response(r#"{"status": "ZERO_RESULTS", "results": []}"#))?;
        assert!(got.is_empty());
        Ok(())
    }
}
