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

//! Types used by the Places service.

use super::{AddressComponent, Geometry, LatLng, PlusCode};
use crate::query::UrlValue;
use serde::{Deserialize, Serialize};

/// A page of Nearby Search or Text Search results.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesSearchResponse {
    /// The places found.
    pub results: Vec<PlacesSearchResult>,
    /// A token to request the next page, if any.
    pub next_page_token: Option<String>,
    /// Attributions to display with the results.
    pub html_attributions: Vec<String>,
}

/// A place returned by a search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesSearchResult {
    /// The human-readable address.
    pub formatted_address: String,
    /// The location of the place.
    pub geometry: Geometry,
    /// The name of the place.
    pub name: String,
    /// An icon representing the place.
    pub icon: String,
    /// The place ID.
    pub place_id: String,
    /// The plus code of the place.
    pub plus_code: Option<PlusCode>,
    /// The rating, from 1.0 to 5.0.
    pub rating: f32,
    /// The number of user ratings.
    pub user_ratings_total: u32,
    /// The types of the place.
    pub types: Vec<String>,
    /// The opening hours of the place.
    pub opening_hours: Option<OpeningHours>,
    /// Photos of the place.
    pub photos: Vec<Photo>,
    /// A simplified address.
    pub vicinity: String,
    /// The operational status of the business.
    pub business_status: String,
    /// The price level, from 0 (free) to 4 (very expensive).
    pub price_level: Option<u8>,
    /// The place is permanently closed.
    pub permanently_closed: bool,
}

/// The opening hours of a place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningHours {
    /// The place is open now.
    pub open_now: Option<bool>,
    /// The opening hours formatted for each day of the week.
    pub weekday_text: Vec<String>,
}

/// A reference to a photo of a place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Photo {
    /// Identifies the photo in a Place Photo request.
    pub photo_reference: String,
    /// The maximum height of the photo.
    pub height: u32,
    /// The maximum width of the photo.
    pub width: u32,
    /// Attributions to display with the photo.
    pub html_attributions: Vec<String>,
}

/// Detailed information about a place.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceDetails {
    /// The components of the address.
    pub address_components: Vec<AddressComponent>,
    /// The address in adr microformat.
    pub adr_address: String,
    /// The operational status of the business.
    pub business_status: String,
    /// The human-readable address.
    pub formatted_address: String,
    /// The phone number in local format.
    pub formatted_phone_number: String,
    /// The location of the place.
    pub geometry: Geometry,
    /// An icon representing the place.
    pub icon: String,
    /// The phone number in international format.
    pub international_phone_number: String,
    /// The name of the place.
    pub name: String,
    /// The opening hours of the place.
    pub opening_hours: Option<OpeningHours>,
    /// Photos of the place.
    pub photos: Vec<Photo>,
    /// The place ID.
    pub place_id: String,
    /// The plus code of the place.
    pub plus_code: Option<PlusCode>,
    /// The price level, from 0 (free) to 4 (very expensive).
    pub price_level: Option<u8>,
    /// The rating, from 1.0 to 5.0.
    pub rating: f32,
    /// User reviews.
    pub reviews: Vec<Review>,
    /// The types of the place.
    pub types: Vec<String>,
    /// The Google page for the place.
    pub url: String,
    /// The number of user ratings.
    pub user_ratings_total: u32,
    /// The offset from UTC, in minutes.
    pub utc_offset: Option<i32>,
    /// A simplified address.
    pub vicinity: String,
    /// The website of the place.
    pub website: String,
    /// Attributions to display with the details.
    #[serde(skip)]
    pub html_attributions: Vec<String>,
}

/// A user review of a place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    /// The name of the author.
    pub author_name: String,
    /// The rating, from 1 to 5.
    pub rating: u8,
    /// The text of the review.
    pub text: String,
    /// Seconds since the Unix epoch.
    pub time: i64,
    /// The time of the review, relative to now.
    pub relative_time_description: String,
    /// The language of the review.
    pub language: String,
}

/// The result of a Find Place request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindPlaceFromText {
    /// The matching places.
    pub candidates: Vec<PlacesSearchResult>,
}

/// A Place Autocomplete or Query Autocomplete prediction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompletePrediction {
    /// The predicted text.
    pub description: String,
    /// The place ID, absent for query predictions.
    pub place_id: Option<String>,
    /// The types of the place.
    pub types: Vec<String>,
    /// The parts of the description matching the input.
    pub matched_substrings: Vec<MatchedSubstring>,
    /// The description split into main and secondary text.
    pub structured_formatting: Option<StructuredFormatting>,
    /// The terms of the description.
    pub terms: Vec<Term>,
    /// The distance from the origin, in meters.
    pub distance_meters: Option<i64>,
}

/// A substring of a prediction matching the input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchedSubstring {
    /// The length of the match.
    pub length: u32,
    /// The start of the match.
    pub offset: u32,
}

/// A prediction split into main and secondary text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredFormatting {
    /// The main text, usually the name of the place.
    pub main_text: String,
    /// The secondary text, usually the location of the place.
    pub secondary_text: String,
}

/// A term in a prediction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Term {
    /// The start of the term in the description.
    pub offset: u32,
    /// The text of the term.
    pub value: String,
}

string_enum! {
    /// The order of Nearby Search results.
    pub enum RankBy {
        /// Sort by importance.
        Prominence => "prominence",
        /// Sort by distance from the location.
        Distance => "distance",
    }
}

string_enum! {
    /// Restricts searches to one type of place.
    pub enum PlaceType {
        /// Airports.
        Airport => "airport",
        /// Banks.
        Bank => "bank",
        /// Bars.
        Bar => "bar",
        /// Cafes.
        Cafe => "cafe",
        /// Gas stations.
        GasStation => "gas_station",
        /// Hospitals.
        Hospital => "hospital",
        /// Lodging.
        Lodging => "lodging",
        /// Museums.
        Museum => "museum",
        /// Parks.
        Park => "park",
        /// Parking.
        Parking => "parking",
        /// Pharmacies.
        Pharmacy => "pharmacy",
        /// Restaurants.
        Restaurant => "restaurant",
        /// Shopping malls.
        ShoppingMall => "shopping_mall",
        /// Supermarkets.
        Supermarket => "supermarket",
        /// Train stations.
        TrainStation => "train_station",
    }
}

string_enum! {
    /// Restricts autocomplete predictions to one type.
    pub enum PlaceAutocompleteType {
        /// Geocoding results, as opposed to businesses.
        Geocode => "geocode",
        /// Results with a precise address.
        Address => "address",
        /// Business results.
        Establishment => "establishment",
        /// Localities and administrative areas.
        Regions => "(regions)",
        /// Localities.
        Cities => "(cities)",
    }
}

string_enum! {
    /// The type of input of a Find Place request.
    pub enum InputType {
        /// A name, address, or phone number.
        TextQuery => "textquery",
        /// A phone number, in international format.
        PhoneNumber => "phonenumber",
    }
}

string_enum! {
    /// The fields returned by a Place Details request.
    pub enum PlaceDetailsField {
        /// The address components.
        AddressComponent => "address_component",
        /// The address in adr microformat.
        AdrAddress => "adr_address",
        /// The business status.
        BusinessStatus => "business_status",
        /// The formatted address.
        FormattedAddress => "formatted_address",
        /// The local phone number.
        FormattedPhoneNumber => "formatted_phone_number",
        /// The location.
        Geometry => "geometry",
        /// The icon.
        Icon => "icon",
        /// The international phone number.
        InternationalPhoneNumber => "international_phone_number",
        /// The name.
        Name => "name",
        /// The opening hours.
        OpeningHours => "opening_hours",
        /// The photos.
        Photos => "photos",
        /// The place ID.
        PlaceId => "place_id",
        /// The plus code.
        PlusCode => "plus_code",
        /// The price level.
        PriceLevel => "price_level",
        /// The rating.
        Rating => "rating",
        /// The reviews.
        Reviews => "reviews",
        /// The types.
        Types => "types",
        /// The Google page.
        Url => "url",
        /// The number of user ratings.
        UserRatingsTotal => "user_ratings_total",
        /// The offset from UTC.
        UtcOffset => "utc_offset",
        /// The simplified address.
        Vicinity => "vicinity",
        /// The website.
        Website => "website",
    }
}

string_enum! {
    /// The fields returned by a Find Place request.
    pub enum FindPlaceField {
        /// The business status.
        BusinessStatus => "business_status",
        /// The formatted address.
        FormattedAddress => "formatted_address",
        /// The location.
        Geometry => "geometry",
        /// The icon.
        Icon => "icon",
        /// The name.
        Name => "name",
        /// The opening hours.
        OpeningHours => "opening_hours",
        /// The photos.
        Photos => "photos",
        /// The place ID.
        PlaceId => "place_id",
        /// The plus code.
        PlusCode => "plus_code",
        /// The price level.
        PriceLevel => "price_level",
        /// The rating.
        Rating => "rating",
        /// The types.
        Types => "types",
        /// The number of user ratings.
        UserRatingsTotal => "user_ratings_total",
    }
}

/// The price level of a place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PriceLevel {
    /// Free.
    Free,
    /// Inexpensive.
    Inexpensive,
    /// Moderately priced.
    Moderate,
    /// Expensive.
    Expensive,
    /// Very expensive.
    VeryExpensive,
}

impl UrlValue for PriceLevel {
    fn to_url_value(&self) -> String {
        let level = match self {
            Self::Free => 0,
            Self::Inexpensive => 1,
            Self::Moderate => 2,
            Self::Expensive => 3,
            Self::VeryExpensive => 4,
        };
        level.to_string()
    }
}

/// Prefers results in an area for Find Place requests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LocationBias {
    /// Use the caller's IP address.
    Ip,
    /// Prefer results near a point.
    Point(LatLng),
    /// Prefer results within a circle.
    Circle {
        /// The center of the circle.
        center: LatLng,
        /// The radius, in meters.
        radius: u32,
    },
    /// Prefer results within a rectangle.
    Rectangle {
        /// The south-west corner.
        southwest: LatLng,
        /// The north-east corner.
        northeast: LatLng,
    },
}

impl UrlValue for LocationBias {
    fn to_url_value(&self) -> String {
        match self {
            Self::Ip => "ipbias".to_string(),
            Self::Point(p) => format!("point:{}", p.to_url_value()),
            Self::Circle { center, radius } => {
                format!("circle:{radius}@{}", center.to_url_value())
            }
            Self::Rectangle {
                southwest,
                northeast,
            } => format!(
                "rectangle:{}|{}",
                southwest.to_url_value(),
                northeast.to_url_value()
            ),
        }
    }
}
