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

//! Types used by the Geocoding service.

use super::{AddressType, Bounds, LatLng, LocationType};
use crate::query::UrlValue;
use serde::{Deserialize, Serialize};

/// A geocoded address or place.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingResult {
    /// The components of the address.
    pub address_components: Vec<AddressComponent>,
    /// The human-readable address.
    pub formatted_address: String,
    /// The location of the result.
    pub geometry: Geometry,
    /// The types of the result.
    pub types: Vec<AddressType>,
    /// The geocoder did not return an exact match.
    pub partial_match: bool,
    /// The place ID of the result.
    pub place_id: String,
    /// The localities contained in a postal code.
    pub postcode_localities: Vec<String>,
    /// The plus code of the result.
    pub plus_code: Option<PlusCode>,
}

/// One component of an address.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressComponent {
    /// The full name of the component.
    pub long_name: String,
    /// An abbreviated name, if available.
    pub short_name: String,
    /// The types of the component.
    pub types: Vec<AddressType>,
}

/// The location of a result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// The bounds of the result, if any.
    pub bounds: Option<Bounds>,
    /// The location.
    pub location: LatLng,
    /// The precision of the location.
    pub location_type: LocationType,
    /// The recommended viewport to display the result.
    pub viewport: Bounds,
}

/// An encoded location reference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlusCode {
    /// A 4 character area code and 6 character or longer local code.
    pub global_code: String,
    /// A 6 character or longer local code with an explicit location.
    pub compound_code: String,
}

/// Restricts geocoding or autocomplete results to an area.
///
/// # Example
/// ```
/// # use google_maps_services::model::ComponentFilter;
/// # use google_maps_services::query::UrlValue;
/// assert_eq!(ComponentFilter::country("FR").to_url_value(), "country:FR");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentFilter {
    component: &'static str,
    value: String,
}

impl ComponentFilter {
    fn new<V: Into<String>>(component: &'static str, value: V) -> Self {
        Self {
            component,
            value: value.into(),
        }
    }

    /// Matches long or short names of a route.
    pub fn route<V: Into<String>>(v: V) -> Self {
        Self::new("route", v)
    }

    /// Matches against both locality and sublocality types.
    pub fn locality<V: Into<String>>(v: V) -> Self {
        Self::new("locality", v)
    }

    /// Matches all the administrative area levels.
    pub fn administrative_area<V: Into<String>>(v: V) -> Self {
        Self::new("administrative_area", v)
    }

    /// Matches a postal code or its prefix.
    pub fn postal_code<V: Into<String>>(v: V) -> Self {
        Self::new("postal_code", v)
    }

    /// Matches a country name or a two letter ISO 3166-1 country code.
    pub fn country<V: Into<String>>(v: V) -> Self {
        Self::new("country", v)
    }
}

impl UrlValue for ComponentFilter {
    fn to_url_value(&self) -> String {
        format!("{}:{}", self.component, self.value)
    }
}
