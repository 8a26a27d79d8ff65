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

//! Types used by the Geolocation service.

use super::LatLng;
use serde::{Deserialize, Serialize};

/// The estimated location of a device.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationResult {
    /// The estimated location.
    pub location: LatLng,
    /// The accuracy radius of the estimate, in meters.
    pub accuracy: f64,
}

/// The signals a device observes, sent to the Geolocation service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeolocationPayload {
    /// The mobile country code of the device's home network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_mobile_country_code: Option<i32>,
    /// The mobile network code of the device's home network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_mobile_network_code: Option<i32>,
    /// The radio type, for example `gsm` or `lte`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radio_type: Option<String>,
    /// The carrier name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    /// Fall back to IP geolocation if the other signals are insufficient.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consider_ip: Option<bool>,
    /// The cell towers observed by the device.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cell_towers: Vec<CellTower>,
    /// The WiFi access points observed by the device.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub wifi_access_points: Vec<WifiAccessPoint>,
}

/// A cell tower observed by the device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CellTower {
    /// The unique identifier of the cell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_id: Option<i64>,
    /// The location area code, or tracking area code for LTE.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_area_code: Option<i32>,
    /// The mobile country code of the tower.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_country_code: Option<i32>,
    /// The mobile network code of the tower.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_network_code: Option<i32>,
    /// Milliseconds since the cell was observed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    /// The signal strength, in dBm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_strength: Option<i32>,
    /// The timing advance value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing_advance: Option<i32>,
}

/// A WiFi access point observed by the device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WifiAccessPoint {
    /// The MAC address of the access point.
    pub mac_address: String,
    /// The signal strength, in dBm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_strength: Option<i32>,
    /// Milliseconds since the access point was observed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    /// The channel used by the device to communicate with the access point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<i32>,
    /// The signal to noise ratio, in dB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_to_noise_ratio: Option<i32>,
}
