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

//! The Geocoding API.
//!
//! Converts addresses to coordinates, and coordinates or place IDs to
//! addresses.

use crate::Result;
use crate::api_config::ApiConfig;
use crate::api_response::{ApiResponse, decode_json};
use crate::context::GeoApiContext;
use crate::error::Error;
use crate::model::{AddressType, Bounds, ComponentFilter, GeocodingResult, LatLng, LocationType};
use crate::query::{QueryParams, join};
use crate::request::{Endpoint, PendingRequest};
use crate::transport::HttpResponse;

/// The Geocoding endpoint.
#[derive(Clone, Debug, Default)]
pub struct Geocoding;

impl Endpoint for Geocoding {
    type Output = Vec<GeocodingResult>;
    const CONFIG: ApiConfig = ApiConfig::new("/maps/api/geocode/json");
    const NAME: &'static str = "geocode";

    fn validate(&self, params: &QueryParams) -> Result<()> {
        let any = ["latlng", "address", "components", "place_id"]
            .iter()
            .any(|p| params.contains(p));
        if !any {
            return Err(Error::invalid_argument(
                "request must contain at least one of 'address', 'latlng', 'place_id' or 'components'",
            ));
        }
        Ok(())
    }

    fn decode(response: HttpResponse) -> Result<Vec<GeocodingResult>> {
        decode_json::<Response>(Self::CONFIG.field_naming, response)
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct Response {
    status: String,
    error_message: Option<String>,
    results: Vec<GeocodingResult>,
}

impl ApiResponse for Response {
    type Output = Vec<GeocodingResult>;

    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn successful(&self) -> bool {
        matches!(self.status.as_str(), "OK" | "ZERO_RESULTS")
    }

    fn into_result(self) -> Vec<GeocodingResult> {
        self.results
    }
}

impl GeoApiContext {
    /// Starts a Geocoding request. Set at least one of the address, the
    /// location, the place ID, or the component filters.
    pub fn geocode(&self) -> PendingRequest<Geocoding> {
        PendingRequest::new(self, Geocoding)
    }

    /// Geocodes an address.
    ///
    /// # Example
    /// ```no_run
    /// # use google_maps_services::context::GeoApiContext;
    /// # async fn sample(context: &GeoApiContext) -> google_maps_services::Result<()> {
    /// let results = context.geocode_address("1600 Amphitheatre Parkway, Mountain View, CA").await?;
    /// for r in results {
    ///     println!("{} {}", r.formatted_address, r.geometry.location);
    /// }
    /// # Ok(()) }
    /// ```
    pub fn geocode_address<V: Into<String>>(&self, address: V) -> PendingRequest<Geocoding> {
        self.geocode().address(address)
    }

    /// Finds the addresses near a location.
    pub fn reverse_geocode(&self, location: LatLng) -> PendingRequest<Geocoding> {
        self.geocode().latlng(location)
    }
}

impl PendingRequest<Geocoding> {
    /// The street address to geocode.
    pub fn address<V: Into<String>>(self, v: V) -> Self {
        self.param("address", v.into())
    }

    /// The location to reverse geocode.
    pub fn latlng(self, v: LatLng) -> Self {
        self.param("latlng", v)
    }

    /// The place to reverse geocode.
    pub fn place<V: Into<String>>(self, place_id: V) -> Self {
        self.param("place_id", place_id.into())
    }

    /// Restricts the results to an area.
    pub fn components<I>(self, v: I) -> Self
    where
        I: IntoIterator<Item = ComponentFilter>,
    {
        self.param("components", join('|', v))
    }

    /// Prefers results in a viewport.
    pub fn bounds(self, v: Bounds) -> Self {
        self.param("bounds", format!("{}|{}", v.southwest, v.northeast))
    }

    /// A region code, as a ccTLD two-letter value, to bias the results.
    pub fn region<V: Into<String>>(self, v: V) -> Self {
        self.param("region", v.into())
    }

    /// Restricts reverse geocoding results to these types.
    pub fn result_type<I>(self, v: I) -> Self
    where
        I: IntoIterator<Item = AddressType>,
    {
        self.param("result_type", join('|', v))
    }

    /// Restricts reverse geocoding results to these location types.
    pub fn location_type<I>(self, v: I) -> Self
    where
        I: IntoIterator<Item = LocationType>,
    {
        self.param("location_type", join('|', v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    type TestResult = anyhow::Result<()>;

    fn context() -> anyhow::Result<GeoApiContext> {
        Ok(GeoApiContext::builder().with_api_key("AIza-key").build()?)
    }

    #[test]
    fn params() -> TestResult {
        let context = context()?;
        let request = context
            .geocode_address("Winnetka")
            .components([ComponentFilter::country("US"), ComponentFilter::postal_code("60093")])
            .bounds(Bounds {
                southwest: LatLng::new(34.172684, -118.604794),
                northeast: LatLng::new(34.236144, -118.500938),
            })
            .region("us");
        let params = request.params();
        assert_eq!(params.get("address"), Some("Winnetka"));
        assert_eq!(params.get("components"), Some("country:US|postal_code:60093"));
        assert_eq!(
            params.get("bounds"),
            Some("34.17268400,-118.60479400|34.23614400,-118.50093800")
        );
        request.url()?;
        Ok(())
    }

    #[test]
    fn reverse() -> TestResult {
        let context = context()?;
        let request = context
            .reverse_geocode(LatLng::new(40.714224, -73.961452))
            .result_type([AddressType::StreetAddress])
            .location_type([LocationType::Rooftop]);
        assert_eq!(request.params().get("latlng"), Some("40.71422400,-73.96145200"));
        assert_eq!(request.params().get("result_type"), Some("street_address"));
        assert_eq!(request.params().get("location_type"), Some("ROOFTOP"));
        Ok(())
    }

    #[test]
    fn validation() -> TestResult {
        let context = context()?;
        let err = context.geocode().region("us").url().unwrap_err();
        assert!(err.is_invalid_argument(), "{err:?}");
        context.geocode().place("ChIJd8BlQ2BZwokRAFUEcm_qrcA").url()?;
        Ok(())
    }

    #[test]
    fn decode() -> TestResult {
        let got = Geocoding::decode(HttpResponse {
            status: 200,
            body: Bytes::from_static(
                br#"{
                    "status": "OK",
                    "results": [{
                        "formatted_address": "1600 Amphitheatre Pkwy, Mountain View, CA 94043, USA",
                        "geometry": {"location": {"lat": 37.42, "lng": -122.08}, "location_type": "ROOFTOP"},
                        "place_id": "ChIJ2eUgeAK6j4ARbn5u_wAGqWA",
                        "types": ["street_address"]
                    }]
                }"#,
            ),
            ..Default::default()
        })?;
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].geometry.location_type, LocationType::Rooftop);
        assert_eq!(got[0].types, [AddressType::StreetAddress]);
        Ok(())
    }

    #[test]
    fn decode_zero_results() -> TestResult {
        let got = Geocoding::decode(HttpResponse {
            status: 200,
            body: Bytes::from_static(br#"{"status": "ZERO_RESULTS", "results": []}"#),
            ..Default::default()
        })?;
        assert!(got.is_empty());
        Ok(())
    }
}
