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

//! The Time Zone API.

use crate::Result;
use crate::api_config::{ApiConfig, FieldNamingPolicy};
use crate::api_response::{ApiResponse, decode_json};
use crate::context::GeoApiContext;
use crate::model::{LatLng, TimeZoneResult};
use crate::query::QueryParams;
use crate::request::{Endpoint, PendingRequest, validate};
use crate::transport::HttpResponse;
use std::time::SystemTime;

/// The Time Zone endpoint.
#[derive(Clone, Debug, Default)]
pub struct TimeZone;

impl Endpoint for TimeZone {
    type Output = TimeZoneResult;
    const CONFIG: ApiConfig =
        ApiConfig::new("/maps/api/timezone/json").with_field_naming(FieldNamingPolicy::Identity);
    const NAME: &'static str = "time_zone";

    fn validate(&self, params: &QueryParams) -> Result<()> {
        validate::require(params, "location")?;
        validate::require(params, "timestamp")
    }

    fn decode(response: HttpResponse) -> Result<TimeZoneResult> {
        decode_json::<Response>(Self::CONFIG.field_naming, response)
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct Response {
    status: String,
    error_message: Option<String>,
    dst_offset: i64,
    raw_offset: i64,
    time_zone_id: String,
    time_zone_name: String,
}

impl ApiResponse for Response {
    type Output = TimeZoneResult;

    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn into_result(self) -> TimeZoneResult {
        TimeZoneResult {
            dst_offset: self.dst_offset,
            raw_offset: self.raw_offset,
            time_zone_id: self.time_zone_id,
            time_zone_name: self.time_zone_name,
        }
    }
}

impl GeoApiContext {
    /// Retrieves the time zone of a location.
    ///
    /// The offsets in the result apply at the Unix epoch, use
    /// [PendingRequest::timestamp] to query the offsets at a different time.
    ///
    /// # Example
    /// ```no_run
    /// # use google_maps_services::context::GeoApiContext;
    /// use google_maps_services::model::LatLng;
    /// # async fn sample(context: &GeoApiContext) -> google_maps_services::Result<()> {
    /// let tz = context
    ///     .time_zone(LatLng::new(39.6034810, -119.6822510))
    ///     .timestamp(std::time::SystemTime::now())
    ///     .await?;
    /// println!("{} {}", tz.time_zone_id, tz.raw_offset + tz.dst_offset);
    /// # Ok(()) }
    /// ```
    pub fn time_zone(&self, location: LatLng) -> PendingRequest<TimeZone> {
        PendingRequest::new(self, TimeZone)
            .param("location", location)
            .param("timestamp", SystemTime::UNIX_EPOCH)
    }
}

impl PendingRequest<TimeZone> {
    /// The time used to compute the daylight savings offset.
    pub fn timestamp(self, v: SystemTime) -> Self {
        self.param("timestamp", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    type TestResult = anyhow::Result<()>;

    fn json(body: &'static str) -> HttpResponse {
        HttpResponse {
            status: 200,
            body: Bytes::from_static(body.as_bytes()),
            ..Default::default()
        }
    }

    #[test]
    fn params() -> TestResult {
        let context = GeoApiContext::builder().with_api_key("AIza-key").build()?;
        let request = context.time_zone(LatLng::new(39.603481, -119.682251));
        assert_eq!(request.params().get("timestamp"), Some("0"));
        let request = request
            .timestamp(SystemTime::UNIX_EPOCH + Duration::from_secs(1_331_161_200))
            .language("es");
        assert_eq!(
            request.url()?,
            "https://maps.googleapis.com/maps/api/timezone/json?key=AIza-key\
             &location=39.60348100%2C-119.68225100&timestamp=1331161200&language=es"
        );
        Ok(())
    }

    #[test]
    fn decode() -> TestResult {
        let got = TimeZone::decode(json(
            r#"{
                "dstOffset": 0,
                "rawOffset": -28800,
                "status": "OK",
                "timeZoneId": "America/Los_Angeles",
                "timeZoneName": "Pacific Standard Time"
            }"#,
        ))?;
        assert_eq!(
            got,
            TimeZoneResult {
                dst_offset: 0,
                raw_offset: -28800,
                time_zone_id: "America/Los_Angeles".into(),
                time_zone_name: "Pacific Standard Time".into(),
            }
        );
        Ok(())
    }

    #[test]
    fn decode_zero_results() {
        let err = TimeZone::decode(json(r#"{"status": "ZERO_RESULTS"}"#)).unwrap_err();
        assert_eq!(
            err.api_error().map(|e| e.kind()),
            Some(ApiErrorKind::ZeroResults)
        );
    }
}
