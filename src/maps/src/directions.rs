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

//! The Directions API.
//!
//! Computes routes between locations, optionally through waypoints.

use crate::Result;
use crate::api_config::ApiConfig;
use crate::api_response::{ApiResponse, decode_json};
use crate::context::GeoApiContext;
use crate::model::{
    DirectionsResult, DirectionsRoute, GeocodedWaypoint, RouteRestriction, TrafficModel,
    TransitMode, TransitRoutingPreference, TravelMode, Unit,
};
use crate::query::{QueryParams, UrlValue, join};
use crate::request::{Endpoint, PendingRequest, validate};
use crate::transport::HttpResponse;
use std::time::SystemTime;

/// The Directions endpoint.
#[derive(Clone, Debug, Default)]
pub struct Directions {
    waypoints: Vec<String>,
    optimize_waypoints: bool,
}

impl Endpoint for Directions {
    type Output = DirectionsResult;
    const CONFIG: ApiConfig = ApiConfig::new("/maps/api/directions/json");
    const NAME: &'static str = "directions";

    fn validate(&self, params: &QueryParams) -> Result<()> {
        validate::require(params, "origin")?;
        validate::require(params, "destination")?;
        validate::exclusive(params, "arrival_time", "departure_time")?;
        if params.contains("traffic_model") {
            validate::require(params, "departure_time")?;
        }
        Ok(())
    }

    fn decode(response: HttpResponse) -> Result<DirectionsResult> {
        decode_json::<Response>(Self::CONFIG.field_naming, response)
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct Response {
    status: String,
    error_message: Option<String>,
    geocoded_waypoints: Vec<GeocodedWaypoint>,
    routes: Vec<DirectionsRoute>,
}

impl ApiResponse for Response {
    type Output = DirectionsResult;

    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn successful(&self) -> bool {
        matches!(self.status.as_str(), "OK" | "ZERO_RESULTS")
    }

    fn into_result(self) -> DirectionsResult {
        DirectionsResult {
            geocoded_waypoints: self.geocoded_waypoints,
            routes: self.routes,
        }
    }
}

impl GeoApiContext {
    /// Starts a Directions request.
    ///
    /// # Example
    /// ```no_run
    /// # use google_maps_services::context::GeoApiContext;
    /// use google_maps_services::model::TravelMode;
    /// # async fn sample(context: &GeoApiContext) -> google_maps_services::Result<()> {
    /// let result = context
    ///     .directions()
    ///     .origin("Sydney Town Hall")
    ///     .destination("Parramatta, NSW")
    ///     .mode(TravelMode::Transit)
    ///     .await?;
    /// for route in result.routes {
    ///     println!("{}", route.summary);
    /// }
    /// # Ok(()) }
    /// ```
    pub fn directions(&self) -> PendingRequest<Directions> {
        PendingRequest::new(self, Directions::default())
    }
}

impl PendingRequest<Directions> {
    /// The starting point, an address, a place ID prefixed by `place_id:`,
    /// or a [LatLng][crate::model::LatLng].
    pub fn origin<V: UrlValue>(self, v: V) -> Self {
        self.param("origin", v)
    }

    /// The end point, in any of the formats accepted by
    /// [origin()][Self::origin].
    pub fn destination<V: UrlValue>(self, v: V) -> Self {
        self.param("destination", v)
    }

    /// The mode of transport. The default is driving.
    pub fn mode(self, v: TravelMode) -> Self {
        self.param("mode", v)
    }

    /// Features the route should avoid.
    pub fn avoid<I>(self, v: I) -> Self
    where
        I: IntoIterator<Item = RouteRestriction>,
    {
        self.param("avoid", join('|', v))
    }

    /// The unit system for the text fields of the result.
    pub fn units(self, v: Unit) -> Self {
        self.param("units", v)
    }

    /// A region code, as a ccTLD two-letter value, to bias geocoding.
    pub fn region<V: Into<String>>(self, v: V) -> Self {
        self.param("region", v.into())
    }

    /// The desired arrival time, for transit directions.
    pub fn arrival_time(self, v: SystemTime) -> Self {
        self.param("arrival_time", v)
    }

    /// The desired departure time.
    pub fn departure_time(self, v: SystemTime) -> Self {
        self.param("departure_time", v)
    }

    /// Departs as soon as possible.
    pub fn departure_time_now(self) -> Self {
        self.param("departure_time", "now")
    }

    /// Routes through these intermediate locations.
    pub fn waypoints<I, V>(mut self, v: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: UrlValue,
    {
        self.endpoint_mut().waypoints = v.into_iter().map(|w| w.to_url_value()).collect();
        self.update_waypoints()
    }

    /// Allows the service to reorder the waypoints.
    pub fn optimize_waypoints(mut self, v: bool) -> Self {
        self.endpoint_mut().optimize_waypoints = v;
        self.update_waypoints()
    }

    /// Requests alternative routes.
    pub fn alternatives(self, v: bool) -> Self {
        self.param("alternatives", v)
    }

    /// Preferred modes of transit.
    pub fn transit_mode<I>(self, v: I) -> Self
    where
        I: IntoIterator<Item = TransitMode>,
    {
        self.param("transit_mode", join('|', v))
    }

    /// Biases transit routes.
    pub fn transit_routing_preference(self, v: TransitRoutingPreference) -> Self {
        self.param("transit_routing_preference", v)
    }

    /// The assumptions used to compute the duration in traffic. Requires a
    /// departure time.
    pub fn traffic_model(self, v: TrafficModel) -> Self {
        self.param("traffic_model", v)
    }

    fn update_waypoints(mut self) -> Self {
        let endpoint = self.endpoint_mut().clone();
        let params = self.params_mut();
        if endpoint.waypoints.is_empty() {
            params.remove("waypoints");
            return self;
        }
        let mut value = endpoint.waypoints.join("|");
        if endpoint.optimize_waypoints {
            value = format!("optimize:true|{value}");
        }
        params.set("waypoints", value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;
    use crate::model::LatLng;
    use bytes::Bytes;
    use std::time::{Duration, UNIX_EPOCH};

    type TestResult = anyhow::Result<()>;

    fn context() -> anyhow::Result<GeoApiContext> {
        Ok(GeoApiContext::builder().with_api_key("AIza-key").build()?)
    }

    #[test]
    fn minimal_request() -> TestResult {
        let context = context()?;
        let request = context.directions().origin("Toronto").destination("Montreal");
        assert_eq!(
            request.params().to_query_string(),
            "origin=Toronto&destination=Montreal"
        );
        let url = request.url()?;
        assert!(url.contains("key=AIza-key"), "{url}");
        Ok(())
    }

    #[test]
    fn all_params() -> TestResult {
        let context = context()?;
        let request = context
            .directions()
            .origin(LatLng::new(1.0, 2.0))
            .destination("place_id:ChIJ3S-JXmauEmsRUcIaWtf4MzE")
            .mode(TravelMode::Transit)
            .avoid([RouteRestriction::Tolls, RouteRestriction::Ferries])
            .units(Unit::Imperial)
            .region("au")
            .arrival_time(UNIX_EPOCH + Duration::from_secs(1_343_641_500))
            .transit_mode([TransitMode::Bus, TransitMode::Rail])
            .transit_routing_preference(TransitRoutingPreference::LessWalking)
            .alternatives(true);
        let params = request.params();
        assert_eq!(params.get("origin"), Some("1.00000000,2.00000000"));
        assert_eq!(params.get("mode"), Some("transit"));
        assert_eq!(params.get("avoid"), Some("tolls|ferries"));
        assert_eq!(params.get("units"), Some("imperial"));
        assert_eq!(params.get("arrival_time"), Some("1343641500"));
        assert_eq!(params.get("transit_mode"), Some("bus|rail"));
        assert_eq!(params.get("transit_routing_preference"), Some("less_walking"));
        assert_eq!(params.get("alternatives"), Some("true"));
        request.url()?;
        Ok(())
    }

    #[test]
    fn waypoints() -> TestResult {
        let context = context()?;
        let request = context
            .directions()
            .waypoints(["Charlestown,MA", "Lexington,MA"])
            .optimize_waypoints(true);
        assert_eq!(
            request.params().get("waypoints"),
            Some("optimize:true|Charlestown,MA|Lexington,MA")
        );
        let request = request.optimize_waypoints(false);
        assert_eq!(
            request.params().get("waypoints"),
            Some("Charlestown,MA|Lexington,MA")
        );
        let request = request.waypoints(Vec::<String>::new());
        assert!(!request.params().contains("waypoints"));
        Ok(())
    }

    #[test]
    fn validation() -> TestResult {
        let context = context()?;
        let err = context.directions().origin("Toronto").url().unwrap_err();
        assert!(err.is_invalid_argument(), "{err:?}");

        let err = context
            .directions()
            .origin("Toronto")
            .destination("Montreal")
            .arrival_time(SystemTime::now())
            .departure_time_now()
            .url()
            .unwrap_err();
        assert!(err.is_invalid_argument(), "{err:?}");

        let err = context
            .directions()
            .origin("Toronto")
            .destination("Montreal")
            .traffic_model(TrafficModel::Pessimistic)
            .url()
            .unwrap_err();
        assert!(err.is_invalid_argument(), "{err:?}");

        context
            .directions()
            .origin("Toronto")
            .destination("Montreal")
            .traffic_model(TrafficModel::Pessimistic)
            .departure_time_now()
            .url()?;
        Ok(())
    }

    fn response(body: &'static str) -> HttpResponse {
        HttpResponse {
            status: 200,
            body: Bytes::from_static(body.as_bytes()),
            ..Default::default()
        }
    }

    #[test]
    fn decode_zero_results() -> TestResult {
        let got = Directions::decode(response(
            r#"{"status": "ZERO_RESULTS", "geocoded_waypoints": [], "routes": []}"#,
        ))?;
        assert!(got.routes.is_empty());
        Ok(())
    }

    #[test]
    fn decode_error() {
        let err = Directions::decode(response(
            r#"{"status": "MAX_WAYPOINTS_EXCEEDED", "error_message": "too many"}"#,
        ))
        .unwrap_err();
        assert_eq!(
            err.api_error().map(|e| e.kind()),
            Some(ApiErrorKind::MaxWaypointsExceeded)
        );
    }

    #[test]
    fn decode_routes() -> TestResult {
        let got = Directions::decode(response(
            r#"{
                "status": "OK",
                "geocoded_waypoints": [{"geocoder_status": "OK", "place_id": "a", "types": ["locality", "political"]}],
                "routes": [{
                    "summary": "ON-401 E",
                    "overview_polyline": {"points": "_p~iF~ps|U"},
                    "legs": [{
                        "distance": {"value": 541000, "text": "541 km"},
                        "duration": {"value": 19800, "text": "5 hours 30 mins"},
                        "start_address": "Toronto, ON, Canada",
                        "end_address": "Montreal, QC, Canada"
                    }]
                }]
            }"#,
        ))?;
        assert_eq!(got.geocoded_waypoints.len(), 1);
        let route = &got.routes[0];
        assert_eq!(route.summary, "ON-401 E");
        assert_eq!(route.legs[0].distance.value, 541000);
        assert_eq!(route.legs[0].end_address, "Montreal, QC, Canada");
        Ok(())
    }
}
