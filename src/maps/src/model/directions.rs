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

//! Types used by the Directions and Distance Matrix services.

use super::{Bounds, Distance, Duration, EncodedPolyline, LatLng};
use serde::{Deserialize, Serialize};

string_enum! {
    /// How to travel between the origin and destination.
    pub enum TravelMode {
        /// By car.
        Driving => "driving",
        /// On foot.
        Walking => "walking",
        /// By bicycle.
        Bicycling => "bicycling",
        /// Using public transit.
        Transit => "transit",
    }
}

impl Default for TravelMode {
    fn default() -> Self {
        Self::Unknown
    }
}

string_enum! {
    /// The unit system for the text fields of a response.
    pub enum Unit {
        /// Kilometers and meters.
        Metric => "metric",
        /// Miles and feet.
        Imperial => "imperial",
    }
}

string_enum! {
    /// Features a route should avoid.
    pub enum RouteRestriction {
        /// Toll roads and bridges.
        Tolls => "tolls",
        /// Highways.
        Highways => "highways",
        /// Ferries.
        Ferries => "ferries",
        /// Indoor steps for walking and transit directions.
        Indoor => "indoor",
    }
}

string_enum! {
    /// The assumptions used to compute the duration in traffic.
    pub enum TrafficModel {
        /// The best estimate given historical and live traffic.
        BestGuess => "best_guess",
        /// Usually longer than the actual travel time.
        Pessimistic => "pessimistic",
        /// Usually shorter than the actual travel time.
        Optimistic => "optimistic",
    }
}

string_enum! {
    /// A preferred mode of transit.
    pub enum TransitMode {
        /// Travel by bus.
        Bus => "bus",
        /// Travel by subway.
        Subway => "subway",
        /// Travel by train.
        Train => "train",
        /// Travel by tram or light rail.
        Tram => "tram",
        /// Any rail mode, equivalent to train, tram, and subway.
        Rail => "rail",
    }
}

string_enum! {
    /// Biases transit routes.
    pub enum TransitRoutingPreference {
        /// Prefer routes with less walking.
        LessWalking => "less_walking",
        /// Prefer routes with fewer transfers.
        FewerTransfers => "fewer_transfers",
    }
}

/// The result of a Directions request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionsResult {
    /// The geocoding status of the origin, destination, and waypoints.
    pub geocoded_waypoints: Vec<GeocodedWaypoint>,
    /// The routes from the origin to the destination.
    pub routes: Vec<DirectionsRoute>,
}

/// The geocoding status of one waypoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodedWaypoint {
    /// `OK` or `ZERO_RESULTS`.
    pub geocoder_status: String,
    /// The geocoder did not return an exact match.
    pub partial_match: bool,
    /// The place ID of the waypoint.
    pub place_id: String,
    /// The address types of the waypoint.
    pub types: Vec<super::AddressType>,
}

/// A route from the origin to the destination.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionsRoute {
    /// A short description of the route.
    pub summary: String,
    /// One leg per pair of consecutive waypoints.
    pub legs: Vec<DirectionsLeg>,
    /// The order of the waypoints, if they were optimized.
    pub waypoint_order: Vec<u32>,
    /// An approximate path of the whole route.
    pub overview_polyline: EncodedPolyline,
    /// The viewport bounding the route.
    pub bounds: Bounds,
    /// Copyright text to display with the route.
    pub copyrights: String,
    /// The total fare, for transit routes.
    pub fare: Option<Fare>,
    /// Warnings to display with the route.
    pub warnings: Vec<String>,
}

/// A leg of a route, between two consecutive waypoints.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionsLeg {
    /// The steps of the leg.
    pub steps: Vec<DirectionsStep>,
    /// The length of the leg.
    pub distance: Distance,
    /// The travel time of the leg.
    pub duration: Duration,
    /// The travel time considering traffic.
    pub duration_in_traffic: Option<Duration>,
    /// The estimated arrival time, for transit routes.
    pub arrival_time: Option<TransitTime>,
    /// The estimated departure time, for transit routes.
    pub departure_time: Option<TransitTime>,
    /// Where the leg starts.
    pub start_location: LatLng,
    /// Where the leg ends.
    pub end_location: LatLng,
    /// The address of the start location.
    pub start_address: String,
    /// The address of the end location.
    pub end_address: String,
}

/// A single instruction in a leg.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionsStep {
    /// The instruction, formatted as HTML.
    pub html_instructions: String,
    /// The length of the step.
    pub distance: Distance,
    /// The travel time of the step.
    pub duration: Duration,
    /// Where the step starts.
    pub start_location: LatLng,
    /// Where the step ends.
    pub end_location: LatLng,
    /// Detailed sub-steps, for transit routes.
    pub steps: Vec<DirectionsStep>,
    /// The path of the step.
    pub polyline: EncodedPolyline,
    /// The travel mode of the step.
    pub travel_mode: TravelMode,
    /// Transit details, for transit steps.
    pub transit_details: Option<TransitDetails>,
}

/// A point in time, as returned for transit routes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitTime {
    /// The time, formatted for display.
    pub text: String,
    /// The time zone of the transit stop.
    pub time_zone: String,
    /// Seconds since the Unix epoch.
    pub value: i64,
}

/// The fare of a transit route.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fare {
    /// An ISO 4217 currency code.
    pub currency: String,
    /// The fare amount.
    pub value: f64,
    /// The fare, formatted for display.
    pub text: String,
}

/// Details of a transit step.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitDetails {
    /// Where the step ends.
    pub arrival_stop: StopDetails,
    /// Where the step starts.
    pub departure_stop: StopDetails,
    /// The arrival time.
    pub arrival_time: TransitTime,
    /// The departure time.
    pub departure_time: TransitTime,
    /// The direction of travel, as shown on the vehicle.
    pub headsign: String,
    /// The number of stops in the step.
    pub num_stops: u32,
    /// The transit line.
    pub line: TransitLine,
}

/// A transit stop.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopDetails {
    /// The name of the stop.
    pub name: String,
    /// The location of the stop.
    pub location: LatLng,
}

/// A transit line.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitLine {
    /// The full name of the line.
    pub name: String,
    /// The short name of the line.
    pub short_name: String,
    /// The color used in signage for the line.
    pub color: String,
    /// The vehicle type used on the line.
    pub vehicle: Vehicle,
}

/// A transit vehicle type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vehicle {
    /// The name of the vehicle type.
    pub name: String,
    /// The vehicle type, for example `BUS`.
    #[serde(rename = "type")]
    pub vehicle_type: String,
    /// An icon for the vehicle type.
    pub icon: String,
}

/// The result of a Distance Matrix request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceMatrix {
    /// The origins, as geocoded by the service.
    pub origin_addresses: Vec<String>,
    /// The destinations, as geocoded by the service.
    pub destination_addresses: Vec<String>,
    /// One row per origin.
    pub rows: Vec<DistanceMatrixRow>,
}

/// The results for one origin.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceMatrixRow {
    /// One element per destination.
    pub elements: Vec<DistanceMatrixElement>,
}

/// The route from one origin to one destination.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceMatrixElement {
    /// `OK`, `NOT_FOUND`, or `ZERO_RESULTS`.
    pub status: String,
    /// The travel time.
    pub duration: Option<Duration>,
    /// The travel time considering traffic.
    pub duration_in_traffic: Option<Duration>,
    /// The route length.
    pub distance: Option<Distance>,
    /// The total fare, for transit routes.
    pub fare: Option<Fare>,
}
