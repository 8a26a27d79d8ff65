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

//! The Geolocation API.
//!
//! Estimates the location of a device from the cell towers and WiFi access
//! points it observes.

use crate::Result;
use crate::api_config::{ApiConfig, FieldNamingPolicy, HttpMethod};
use crate::api_response::{ApiResponse, decode_json};
use crate::context::GeoApiContext;
use crate::error::Error;
use crate::model::{CellTower, GeolocationPayload, GeolocationResult, LatLng, WifiAccessPoint};
use crate::request::{Endpoint, PendingRequest};
use crate::transport::HttpResponse;

/// The Geolocation endpoint.
#[derive(Clone, Debug, Default)]
pub struct Geolocation {
    payload: GeolocationPayload,
}

impl Endpoint for Geolocation {
    type Output = GeolocationResult;
    const CONFIG: ApiConfig = ApiConfig::new("/geolocation/v1/geolocate")
        .with_host_name("https://www.googleapis.com")
        .with_field_naming(FieldNamingPolicy::Identity)
        .without_client_id()
        .with_method(HttpMethod::Post);
    const NAME: &'static str = "geolocate";

    fn body(&self) -> Result<Option<String>> {
        serde_json::to_string(&self.payload)
            .map(Some)
            .map_err(Error::ser)
    }

    fn decode(response: HttpResponse) -> Result<GeolocationResult> {
        decode_json::<Response>(Self::CONFIG.field_naming, response)
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct Response {
    location: LatLng,
    accuracy: f64,
    error: Option<ErrorBody>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ErrorBody {
    errors: Vec<ErrorDetail>,
    message: String,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ErrorDetail {
    reason: String,
    message: String,
}

impl ApiResponse for Response {
    type Output = GeolocationResult;

    fn status(&self) -> &str {
        match &self.error {
            None => "OK",
            Some(e) => e.errors.first().map_or("UNKNOWN_ERROR", |d| d.reason.as_str()),
        }
    }

    fn error_message(&self) -> Option<&str> {
        let error = self.error.as_ref()?;
        error
            .errors
            .first()
            .map(|d| d.message.as_str())
            .filter(|m| !m.is_empty())
            .or(Some(error.message.as_str()))
    }

    fn into_result(self) -> GeolocationResult {
        GeolocationResult {
            location: self.location,
            accuracy: self.accuracy,
        }
    }
}

impl GeoApiContext {
    /// Starts a Geolocation request.
    ///
    /// # Example
    /// ```no_run
    /// # use google_maps_services::context::GeoApiContext;
    /// use google_maps_services::model::WifiAccessPoint;
    /// # async fn sample(context: &GeoApiContext) -> google_maps_services::Result<()> {
    /// let result = context
    ///     .geolocate()
    ///     .consider_ip(false)
    ///     .add_wifi_access_point(WifiAccessPoint {
    ///         mac_address: "00:25:9c:cf:1c:ac".into(),
    ///         ..Default::default()
    ///     })
    ///     .await?;
    /// println!("{} within {} meters", result.location, result.accuracy);
    /// # Ok(()) }
    /// ```
    pub fn geolocate(&self) -> PendingRequest<Geolocation> {
        PendingRequest::new(self, Geolocation::default())
    }
}

impl PendingRequest<Geolocation> {
    /// Replaces the whole payload.
    pub fn payload(mut self, v: GeolocationPayload) -> Self {
        self.endpoint_mut().payload = v;
        self
    }

    /// The mobile country code of the device's home network.
    pub fn home_mobile_country_code(mut self, v: i32) -> Self {
        self.endpoint_mut().payload.home_mobile_country_code = Some(v);
        self
    }

    /// The mobile network code of the device's home network.
    pub fn home_mobile_network_code(mut self, v: i32) -> Self {
        self.endpoint_mut().payload.home_mobile_network_code = Some(v);
        self
    }

    /// The radio type, for example `lte`.
    pub fn radio_type<V: Into<String>>(mut self, v: V) -> Self {
        self.endpoint_mut().payload.radio_type = Some(v.into());
        self
    }

    /// The carrier name.
    pub fn carrier<V: Into<String>>(mut self, v: V) -> Self {
        self.endpoint_mut().payload.carrier = Some(v.into());
        self
    }

    /// Falls back to IP geolocation.
    pub fn consider_ip(mut self, v: bool) -> Self {
        self.endpoint_mut().payload.consider_ip = Some(v);
        self
    }

    /// Adds an observed cell tower.
    pub fn add_cell_tower(mut self, v: CellTower) -> Self {
        self.endpoint_mut().payload.cell_towers.push(v);
        self
    }

    /// Adds an observed WiFi access point.
    pub fn add_wifi_access_point(mut self, v: WifiAccessPoint) -> Self {
        self.endpoint_mut().payload.wifi_access_points.push(v);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;

    type TestResult = anyhow::Result<()>;

    fn response(status: u16, body: &'static str) -> HttpResponse {
        HttpResponse {
            status,
            body: Bytes::from_static(body.as_bytes()),
            ..Default::default()
        }
    }

    #[test]
    fn body() -> TestResult {
        let context = GeoApiContext::builder().with_api_key("AIza-key").build()?;
        let mut request = context
            .geolocate()
            .consider_ip(false)
            .radio_type("lte")
            .add_cell_tower(CellTower {
                cell_id: Some(42),
                mobile_country_code: Some(310),
                ..Default::default()
            });
        let body = request.endpoint_mut().body()?.unwrap_or_default();
        let got = serde_json::from_str::<serde_json::Value>(&body)?;
        assert_eq!(
            got,
            serde_json::json!({
                "considerIp": false,
                "radioType": "lte",
                "cellTowers": [{"cellId": 42, "mobileCountryCode": 310}]
            })
        );
        assert!(request.params().is_empty());
        Ok(())
    }

    #[test]
    fn requires_api_key() -> TestResult {
        let context = GeoApiContext::builder()
            .with_enterprise_credentials("clientID", "vNIXE0xscrmjlyV-12Nj_BvUPaw=")
            .build()?;
        let err = context.geolocate().url().unwrap_err();
        assert!(err.is_configuration(), "{err:?}");
        Ok(())
    }

    #[test]
    fn decode() -> TestResult {
        let got = Geolocation::decode(response(
            200,
            r#"{"location": {"lat": 37.42, "lng": -122.08}, "accuracy": 1145.0}"#,
        ))?;
        assert_eq!(got.location, LatLng::new(37.42, -122.08));
        assert_eq!(got.accuracy, 1145.0);
        Ok(())
    }

    #[test]
    fn decode_not_found() {
        let err = Geolocation::decode(response(
            404,
            r#"{"error": {"errors": [{"domain": "geolocation", "reason": "notFound", "message": "Not Found"}], "code": 404, "message": "Not Found"}}"#,
        ))
        .unwrap_err();
        let api = err.api_error().expect("a service error");
        assert_eq!(api.kind(), ApiErrorKind::NotFound);
        assert_eq!(api.message(), "Not Found");
        assert_eq!(err.http_status_code(), Some(404));
    }

    #[test]
    fn decode_daily_limit() {
        let err = Geolocation::decode(response(
            403,
            r#"{"error": {"errors": [{"domain": "usageLimits", "reason": "dailyLimitExceeded", "message": "Daily Limit Exceeded"}], "code": 403, "message": "Daily Limit Exceeded"}}"#,
        ))
        .unwrap_err();
        assert_eq!(
            err.api_error().map(|e| e.kind()),
            Some(ApiErrorKind::OverDailyLimit)
        );
    }
}
