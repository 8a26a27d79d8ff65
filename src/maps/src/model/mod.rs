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

//! The types sent to and returned by the services.
//!
//! Response types tolerate missing fields, which take their default value,
//! and enumerations tolerate values unknown to this version of the client,
//! which decode as an `Unknown` variant.

use crate::query::UrlValue;
use serde::{Deserialize, Serialize};

/// Defines a string-valued enumeration.
///
/// The generated type implements [UrlValue], `Display`, and `serde` traits.
/// Deserialization is case-insensitive and maps unrecognized strings to the
/// `Unknown` variant.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )*
            /// A value not recognized by this version of the client.
            Unknown,
        }

        impl $name {
            /// The wire representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $value, )*
                    Self::Unknown => "unknown",
                }
            }

            /// Parses the wire representation, ignoring case.
            pub fn from_wire(value: &str) -> Self {
                $( if value.eq_ignore_ascii_case($value) { return Self::$variant; } )*
                Self::Unknown
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $crate::query::UrlValue for $name {
            fn to_url_value(&self) -> String {
                self.as_str().to_string()
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                Ok(Self::from_wire(&value))
            }
        }
    };
}

mod directions;
mod geocoding;
mod geolocation;
mod places;
mod roads;
mod static_maps;

pub use crate::polyline::EncodedPolyline;
pub use directions::*;
pub use geocoding::*;
pub use geolocation::*;
pub use places::*;
pub use roads::*;
pub use static_maps::*;

/// A point on the Earth.
///
/// Services using `latitude`/`longitude` keys are also supported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatLng {
    /// The latitude, in degrees.
    #[serde(alias = "latitude")]
    pub lat: f64,
    /// The longitude, in degrees.
    #[serde(alias = "longitude")]
    pub lng: f64,
}

impl LatLng {
    /// Creates a point from its coordinates, in degrees.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl UrlValue for LatLng {
    fn to_url_value(&self) -> String {
        format!("{:.8},{:.8}", self.lat, self.lng)
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_url_value())
    }
}

/// A rectangle in geographic coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bounds {
    /// The north-east corner.
    pub northeast: LatLng,
    /// The south-west corner.
    pub southwest: LatLng,
}

/// A distance, as returned by the services.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Distance {
    /// The distance in meters.
    pub value: i64,
    /// The distance formatted for display, in the requested units.
    pub text: String,
}

/// A duration, as returned by the services.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Duration {
    /// The duration in seconds.
    pub value: i64,
    /// The duration formatted for display.
    pub text: String,
}

/// An elevation sample.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationResult {
    /// The elevation, in meters.
    pub elevation: f64,
    /// Where the elevation was computed.
    pub location: LatLng,
    /// The distance between the data points used to interpolate the
    /// elevation, in meters.
    pub resolution: f64,
}

/// The time zone of a location.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeZoneResult {
    /// The daylight savings offset, in seconds.
    pub dst_offset: i64,
    /// The offset from UTC, in seconds.
    pub raw_offset: i64,
    /// The IANA time zone name, for example `America/Los_Angeles`.
    pub time_zone_id: String,
    /// The long form name of the time zone, localized.
    pub time_zone_name: String,
}

/// An image returned by the Static Maps or Place Photo services.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageResult {
    /// The content type of the image, for example `image/png`.
    pub content_type: String,
    /// The image bytes.
    pub image_data: bytes::Bytes,
}

string_enum! {
    /// The precision of a geocoded location.
    pub enum LocationType {
        /// A precise street address.
        Rooftop => "ROOFTOP",
        /// Interpolated between two precise points.
        RangeInterpolated => "RANGE_INTERPOLATED",
        /// The center of a feature.
        GeometricCenter => "GEOMETRIC_CENTER",
        /// Approximate.
        Approximate => "APPROXIMATE",
    }
}

impl Default for LocationType {
    fn default() -> Self {
        Self::Unknown
    }
}

string_enum! {
    /// The type of a geocoding result or address component.
    pub enum AddressType {
        /// A precise street address.
        StreetAddress => "street_address",
        /// A named route.
        Route => "route",
        /// A major intersection.
        Intersection => "intersection",
        /// A political entity.
        Political => "political",
        /// A national political entity.
        Country => "country",
        /// A first-order civil entity below the country level.
        AdministrativeAreaLevel1 => "administrative_area_level_1",
        /// A second-order civil entity below the country level.
        AdministrativeAreaLevel2 => "administrative_area_level_2",
        /// A third-order civil entity below the country level.
        AdministrativeAreaLevel3 => "administrative_area_level_3",
        /// A commonly-used alternative name for the entity.
        ColloquialArea => "colloquial_area",
        /// An incorporated city or town.
        Locality => "locality",
        /// A first-order civil entity below a locality.
        Sublocality => "sublocality",
        /// A named neighborhood.
        Neighborhood => "neighborhood",
        /// A named location, usually a building.
        Premise => "premise",
        /// A first-order entity below a named location.
        Subpremise => "subpremise",
        /// An encoded location reference.
        PlusCode => "plus_code",
        /// A postal code.
        PostalCode => "postal_code",
        /// A prominent natural feature.
        NaturalFeature => "natural_feature",
        /// An airport.
        Airport => "airport",
        /// A named park.
        Park => "park",
        /// A named point of interest.
        PointOfInterest => "point_of_interest",
        /// A business or place of interest.
        Establishment => "establishment",
        /// A street number.
        StreetNumber => "street_number",
        /// A postal town.
        PostalTown => "postal_town",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn latlng_url_value() {
        let p = LatLng::new(-33.8674869, 151.2069902);
        assert_eq!(p.to_url_value(), "-33.86748690,151.20699020");
        assert_eq!(p.to_string(), p.to_url_value());
    }

    #[test]
    fn latlng_aliases() -> anyhow::Result<()> {
        let got = serde_json::from_value::<LatLng>(serde_json::json!({
            "latitude": 1.5, "longitude": 2.5
        }))?;
        assert_eq!(got, LatLng::new(1.5, 2.5));
        Ok(())
    }

    #[test_case("ROOFTOP", LocationType::Rooftop)]
    #[test_case("rooftop", LocationType::Rooftop)]
    #[test_case("NOT_A_REAL_TYPE", LocationType::Unknown)]
    fn string_enum_deserialize(input: &str, want: LocationType) -> anyhow::Result<()> {
        let got = serde_json::from_value::<LocationType>(serde_json::json!(input))?;
        assert_eq!(got, want);
        Ok(())
    }

    #[test]
    fn string_enum_unknown_in_list() -> anyhow::Result<()> {
        let got = serde_json::from_value::<Vec<AddressType>>(serde_json::json!([
            "locality",
            "political",
            "some_future_type"
        ]))?;
        assert_eq!(
            got,
            vec![
                AddressType::Locality,
                AddressType::Political,
                AddressType::Unknown
            ]
        );
        Ok(())
    }

    #[test]
    fn string_enum_serialize() -> anyhow::Result<()> {
        let got = serde_json::to_value(AddressType::AdministrativeAreaLevel1)?;
        assert_eq!(got, serde_json::json!("administrative_area_level_1"));
        assert_eq!(AddressType::Airport.to_url_value(), "airport");
        Ok(())
    }
}
