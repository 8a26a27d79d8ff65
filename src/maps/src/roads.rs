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

//! The Roads API.
//!
//! Snaps GPS traces to the roads most likely traveled, finds the nearest
//! road segments, and returns their speed limits.

use crate::Result;
use crate::api_config::{ApiConfig, FieldNamingPolicy};
use crate::api_response::{ApiResponse, decode_json};
use crate::context::GeoApiContext;
use crate::error::Error;
use crate::model::{LatLng, SnappedPoint, SpeedLimit, SpeedLimitsResult, SpeedUnits};
use crate::query::{QueryParams, join};
use crate::request::{Endpoint, PendingRequest, validate};
use crate::transport::HttpResponse;

const ROADS_HOST: &str = "https://roads.googleapis.com";

const fn roads_config(path: &'static str) -> ApiConfig {
    ApiConfig::new(path)
        .with_host_name(ROADS_HOST)
        .with_field_naming(FieldNamingPolicy::Identity)
        .without_client_id()
}

/// The Snap to Roads endpoint.
#[derive(Clone, Debug, Default)]
pub struct SnapToRoads;

impl Endpoint for SnapToRoads {
    type Output = Vec<SnappedPoint>;
    const CONFIG: ApiConfig = roads_config("/v1/snapToRoads");
    const NAME: &'static str = "snap_to_roads";

    fn validate(&self, params: &QueryParams) -> Result<()> {
        validate::require(params, "path")
    }

    fn decode(response: HttpResponse) -> Result<Vec<SnappedPoint>> {
        decode_json::<SnappedPointsResponse>(Self::CONFIG.field_naming, response)
    }
}

/// The Nearest Roads endpoint.
#[derive(Clone, Debug, Default)]
pub struct NearestRoads;

impl Endpoint for NearestRoads {
    type Output = Vec<SnappedPoint>;
    const CONFIG: ApiConfig = roads_config("/v1/nearestRoads");
    const NAME: &'static str = "nearest_roads";

    fn validate(&self, params: &QueryParams) -> Result<()> {
        validate::require(params, "points")
    }

    fn decode(response: HttpResponse) -> Result<Vec<SnappedPoint>> {
        decode_json::<SnappedPointsResponse>(Self::CONFIG.field_naming, response)
    }
}

/// The Speed Limits endpoint.
#[derive(Clone, Debug, Default)]
pub struct SpeedLimits;

impl Endpoint for SpeedLimits {
    type Output = SpeedLimitsResult;
    const CONFIG: ApiConfig = roads_config("/v1/speedLimits");
    const NAME: &'static str = "speed_limits";

    fn validate(&self, params: &QueryParams) -> Result<()> {
        if !params.contains("path") && !params.contains("placeId") {
            return Err(Error::invalid_argument(
                "request must contain 'path' or 'placeId'",
            ));
        }
        validate::exclusive(params, "path", "placeId")
    }

    fn decode(response: HttpResponse) -> Result<SpeedLimitsResult> {
        decode_json::<SpeedLimitsResponse>(Self::CONFIG.field_naming, response)
    }
}

/// The error object of the Roads API responses.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct RoadsError {
    message: String,
    status: String,
}

fn roads_status(error: &Option<RoadsError>) -> &str {
    match error {
        None => "OK",
        Some(e) if e.status.is_empty() => "UNKNOWN_ERROR",
        Some(e) => e.status.as_str(),
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SnappedPointsResponse {
    snapped_points: Vec<SnappedPoint>,
    warning_message: Option<String>,
    error: Option<RoadsError>,
}

impl ApiResponse for SnappedPointsResponse {
    type Output = Vec<SnappedPoint>;

    fn status(&self) -> &str {
        roads_status(&self.error)
    }

    fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    fn into_result(self) -> Vec<SnappedPoint> {
        if let Some(warning) = &self.warning_message {
            tracing::warn!("the Roads API reports: {warning}");
        }
        self.snapped_points
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SpeedLimitsResponse {
    speed_limits: Vec<SpeedLimit>,
    snapped_points: Vec<SnappedPoint>,
    error: Option<RoadsError>,
}

impl ApiResponse for SpeedLimitsResponse {
    type Output = SpeedLimitsResult;

    fn status(&self) -> &str {
        roads_status(&self.error)
    }

    fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    fn into_result(self) -> SpeedLimitsResult {
        SpeedLimitsResult {
            speed_limits: self.speed_limits,
            snapped_points: self.snapped_points,
        }
    }
}

impl GeoApiContext {
    /// Snaps a GPS trace to the roads most likely traveled.
    ///
    /// # Example
    /// ```no_run
    /// # use google_maps_services::context::GeoApiContext;
    /// use google_maps_services::model::LatLng;
    /// # async fn sample(context: &GeoApiContext) -> google_maps_services::Result<()> {
    /// let path = [
    ///     LatLng::new(-33.865382, 151.192861),
    ///     LatLng::new(-33.865837, 151.193376),
    /// ];
    /// let points = context.snap_to_roads(&path).interpolate(true).await?;
    /// for p in points {
    ///     println!("{} {:?}", p.location, p.original_index);
    /// }
    /// # Ok(()) }
    /// ```
    pub fn snap_to_roads(&self, path: &[LatLng]) -> PendingRequest<SnapToRoads> {
        PendingRequest::new(self, SnapToRoads).param("path", join('|', path))
    }

    /// Finds the road segment nearest to each point.
    pub fn nearest_roads(&self, points: &[LatLng]) -> PendingRequest<NearestRoads> {
        PendingRequest::new(self, NearestRoads).param("points", join('|', points))
    }

    /// Returns the speed limits along a path. The response also contains the
    /// snapped points.
    pub fn speed_limits(&self, path: &[LatLng]) -> PendingRequest<SpeedLimits> {
        PendingRequest::new(self, SpeedLimits).param("path", join('|', path))
    }

    /// Returns the speed limits of road segments, identified by their place
    /// IDs.
    pub fn speed_limits_for_places<I, S>(&self, place_ids: I) -> PendingRequest<SpeedLimits>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        place_ids
            .into_iter()
            .fold(PendingRequest::new(self, SpeedLimits), |r, id| {
                r.param_add_to_list("placeId", id.into())
            })
    }
}

impl PendingRequest<SnapToRoads> {
    /// Adds interpolated points, so the result follows the road geometry.
    pub fn interpolate(self, v: bool) -> Self {
        self.param("interpolate", v)
    }
}

impl PendingRequest<SpeedLimits> {
    /// The units of the speed limits.
    pub fn units(self, v: SpeedUnits) -> Self {
        self.param("units", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;

    type TestResult = anyhow::Result<()>;

    fn context() -> anyhow::Result<GeoApiContext> {
        Ok(GeoApiContext::builder().with_api_key("AIza-key").build()?)
    }

    fn response(status: u16, body: &'static str) -> HttpResponse {
        HttpResponse {
            status,
            body: Bytes::from_static(body.as_bytes()),
            ..Default::default()
        }
    }

    const PATH: [LatLng; 2] = [
        LatLng {
            lat: -33.865382,
            lng: 151.192861,
        },
        LatLng {
            lat: -33.865837,
            lng: 151.193376,
        },
    ];

    #[test]
    fn snap_url() -> TestResult {
        let context = context()?;
        let url = context.snap_to_roads(&PATH).interpolate(true).url()?;
        assert_eq!(
            url,
            "https://roads.googleapis.com/v1/snapToRoads?key=AIza-key\
             &path=-33.86538200%2C151.19286100%7C-33.86583700%2C151.19337600&interpolate=true"
        );
        Ok(())
    }

    #[test]
    fn requires_api_key() -> TestResult {
        let context = GeoApiContext::builder()
            .with_enterprise_credentials("clientID", "vNIXE0xscrmjlyV-12Nj_BvUPaw=")
            .build()?;
        let err = context.nearest_roads(&PATH).url().unwrap_err();
        assert!(err.is_configuration(), "{err:?}");
        Ok(())
    }

    #[test]
    fn speed_limit_params() -> TestResult {
        let context = context()?;
        let request = context
            .speed_limits_for_places(["ChIJ1Wi6I2pNFmsRQL9GbW7qABM", "ChIJ58xCoGlNFmsRUEZUbW7qABM"])
            .units(SpeedUnits::Mph);
        assert_eq!(
            request.params().get_all("placeId"),
            ["ChIJ1Wi6I2pNFmsRQL9GbW7qABM", "ChIJ58xCoGlNFmsRUEZUbW7qABM"]
        );
        assert_eq!(request.params().get("units"), Some("MPH"));
        request.url()?;

        let err = context
            .speed_limits_for_places(Vec::<String>::new())
            .url()
            .unwrap_err();
        assert!(err.is_invalid_argument(), "{err:?}");
        Ok(())
    }

    #[test]
    fn decode_snapped_points() -> TestResult {
        let got = SnapToRoads::decode(response(
            200,
            r#"{"snappedPoints": [
                {"location": {"latitude": -33.8653, "longitude": 151.1929}, "originalIndex": 0, "placeId": "ChIJjXkMCDauEmsRp5xab4Ac4-o"},
                {"location": {"latitude": -33.8654, "longitude": 151.1930}, "placeId": "ChIJjXkMCDauEmsRp5xab4Ac4-o"}
            ]}"#,
        ))?;
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].location, LatLng::new(-33.8653, 151.1929));
        assert_eq!(got[0].original_index, Some(0));
        assert_eq!(got[1].original_index, None);
        assert_eq!(got[1].place_id, "ChIJjXkMCDauEmsRp5xab4Ac4-o");
        Ok(())
    }

    #[test]
    fn decode_speed_limits() -> TestResult {
        let got = SpeedLimits::decode(response(
            200,
            r#"{"speedLimits": [{"placeId": "ChIJ1Wi6I2pNFmsRQL9GbW7qABM", "speedLimit": 60, "units": "KPH"}]}"#,
        ))?;
        assert_eq!(got.speed_limits.len(), 1);
        assert_eq!(got.speed_limits[0].speed_limit, 60.0);
        assert_eq!(got.speed_limits[0].units, "KPH");
        assert!(got.snapped_points.is_empty());
        Ok(())
    }

    #[test]
    fn decode_error() {
        let err = NearestRoads::decode(response(
            400,
            r#"{"error": {"code": 400, "message": "Invalid request.", "status": "INVALID_ARGUMENT"}}"#,
        ))
        .unwrap_err();
        let api = err.api_error().expect("a service error");
        assert_eq!(api.kind(), ApiErrorKind::InvalidRequest);
        assert_eq!(api.message(), "Invalid request.");
        assert_eq!(err.http_status_code(), Some(400));
    }
}
