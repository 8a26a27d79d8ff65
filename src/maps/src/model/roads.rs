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

//! Types used by the Roads service.

use super::LatLng;
use serde::{Deserialize, Serialize};

/// A point snapped to a road.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnappedPoint {
    /// The snapped location.
    pub location: LatLng,
    /// The index of the corresponding point in the request, if any.
    ///
    /// Interpolated points do not have an original index.
    pub original_index: Option<u32>,
    /// The place ID of the road segment.
    pub place_id: String,
}

/// The posted speed limit of a road segment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedLimit {
    /// The place ID of the road segment.
    pub place_id: String,
    /// The speed limit, in `units`.
    pub speed_limit: f64,
    /// `KPH` or `MPH`.
    pub units: String,
}

/// The result of a Speed Limits request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedLimitsResult {
    /// The speed limits of the road segments.
    pub speed_limits: Vec<SpeedLimit>,
    /// The snapped points, if the request contained a path.
    pub snapped_points: Vec<SnappedPoint>,
}

string_enum! {
    /// The units of a Speed Limits response.
    pub enum SpeedUnits {
        /// Kilometers per hour.
        Kph => "KPH",
        /// Miles per hour.
        Mph => "MPH",
    }
}
