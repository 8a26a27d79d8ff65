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

//! The Distance Matrix API.
//!
//! Computes travel distance and time for a matrix of origins and
//! destinations.

use crate::Result;
use crate::api_config::ApiConfig;
use crate::api_response::{ApiResponse, decode_json};
use crate::context::GeoApiContext;
use crate::model::{
    DistanceMatrix, DistanceMatrixRow, RouteRestriction, TrafficModel, TransitMode,
    TransitRoutingPreference, TravelMode, Unit,
};
use crate::query::{QueryParams, UrlValue, join};
use crate::request::{Endpoint, PendingRequest, validate};
use crate::transport::HttpResponse;
use std::time::SystemTime;

/// The Distance Matrix endpoint.
#[derive(Clone, Debug, Default)]
pub struct DistanceMatrixEndpoint;

impl Endpoint for DistanceMatrixEndpoint {
    type Output = DistanceMatrix;
    const CONFIG: ApiConfig = ApiConfig::new("/maps/api/distancematrix/json");
    const NAME: &'static str = "distance_matrix";

    fn validate(&self, params: &QueryParams) -> Result<()> {
        validate::require(params, "origins")?;
        validate::require(params, "destinations")?;
        validate::exclusive(params, "arrival_time", "departure_time")
    }

    fn decode(response: HttpResponse) -> Result<DistanceMatrix> {
        decode_json::<Response>(Self::CONFIG.field_naming, response)
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct Response {
    status: String,
    error_message: Option<String>,
    origin_addresses: Vec<String>,
    destination_addresses: Vec<String>,
    rows: Vec<DistanceMatrixRow>,
}

impl ApiResponse for Response {
    type Output = DistanceMatrix;

    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn into_result(self) -> DistanceMatrix {
        DistanceMatrix {
            origin_addresses: self.origin_addresses,
            destination_addresses: self.destination_addresses,
            rows: self.rows,
        }
    }
}

impl GeoApiContext {
    /// Starts a Distance Matrix request.
    ///
    /// # Example
    /// ```no_run
    /// # use google_maps_services::context::GeoApiContext;
    /// # async fn sample(context: &GeoApiContext) -> google_maps_services::Result<()> {
    /// let matrix = context
    ///     .distance_matrix()
    ///     .origins(["Vancouver BC", "Seattle"])
    ///     .destinations(["San Francisco", "Victoria BC"])
    ///     .await?;
    /// println!("{:?}", matrix.rows);
    /// # Ok(()) }
    /// ```
    pub fn distance_matrix(&self) -> PendingRequest<DistanceMatrixEndpoint> {
        PendingRequest::new(self, DistanceMatrixEndpoint)
    }
}

impl PendingRequest<DistanceMatrixEndpoint> {
    /// The starting points. Addresses, place IDs prefixed by `place_id:`,
    /// or [LatLng][crate::model::LatLng] values.
    pub fn origins<I, V>(self, v: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: UrlValue,
    {
        self.param("origins", join('|', v))
    }

    /// The end points, in any of the formats accepted by
    /// [origins()][Self::origins].
    pub fn destinations<I, V>(self, v: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: UrlValue,
    {
        self.param("destinations", join('|', v))
    }

    /// The mode of transport. The default is driving.
    pub fn mode(self, v: TravelMode) -> Self {
        self.param("mode", v)
    }

    /// A feature the routes should avoid.
    pub fn avoid(self, v: RouteRestriction) -> Self {
        self.param("avoid", v)
    }

    /// The unit system for the text fields of the result.
    pub fn units(self, v: Unit) -> Self {
        self.param("units", v)
    }

    /// A region code, as a ccTLD two-letter value, to bias geocoding.
    pub fn region<V: Into<String>>(self, v: V) -> Self {
        self.param("region", v.into())
    }

    /// The desired arrival time, for transit requests.
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

    /// The assumptions used to compute the duration in traffic.
    pub fn traffic_model(self, v: TrafficModel) -> Self {
        self.param("traffic_model", v)
    }

    /// Preferred modes of transit.
    pub fn transit_modes<I>(self, v: I) -> Self
    where
        I: IntoIterator<Item = TransitMode>,
    {
        self.param("transit_mode", join('|', v))
    }

    /// Biases transit routes.
    pub fn transit_routing_preference(self, v: TransitRoutingPreference) -> Self {
        self.param("transit_routing_preference", v)
    }
}
