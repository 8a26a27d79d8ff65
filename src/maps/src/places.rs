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

//! The Places API.
//!
//! Searches for places, returns their details, and completes partial
//! queries. Each operation is a separate endpoint type, they all share the
//! [PendingRequest] setters.

use crate::Result;
use crate::api_config::ApiConfig;
use crate::api_response::{ApiResponse, decode_image, decode_json};
use crate::context::GeoApiContext;
use crate::error::Error;
use crate::model::{
    AutocompletePrediction, ComponentFilter, FindPlaceField, FindPlaceFromText, ImageResult,
    InputType, LatLng, LocationBias, PlaceAutocompleteType, PlaceDetails, PlaceDetailsField,
    PlaceType, PlacesSearchResponse, PlacesSearchResult, PriceLevel, RankBy,
};
use crate::query::{QueryParams, join};
use crate::request::{Endpoint, PendingRequest, validate};
use crate::transport::HttpResponse;

/// The Nearby Search endpoint.
#[derive(Clone, Debug, Default)]
pub struct NearbySearch;

impl Endpoint for NearbySearch {
    type Output = PlacesSearchResponse;
    const CONFIG: ApiConfig = ApiConfig::new("/maps/api/place/nearbysearch/json");
    const NAME: &'static str = "place_nearby_search";

    fn validate(&self, params: &QueryParams) -> Result<()> {
        if params.contains("pagetoken") {
            return Ok(());
        }
        validate::require(params, "location")?;
        if params.get("rankby") == Some(RankBy::Distance.as_str()) {
            if params.contains("radius") {
                return Err(Error::invalid_argument(
                    "request must not contain 'radius' with rankby=distance",
                ));
            }
            if !["keyword", "name", "type"].iter().any(|p| params.contains(p)) {
                return Err(Error::invalid_argument(
                    "with rankby=distance, the request must contain one of 'keyword', 'name' or 'type'",
                ));
            }
        }
        validate::max_radius(params)
    }

    fn decode(response: HttpResponse) -> Result<PlacesSearchResponse> {
        decode_json::<SearchResponse>(Self::CONFIG.field_naming, response)
    }
}

/// The Text Search endpoint.
#[derive(Clone, Debug, Default)]
pub struct TextSearch;

impl Endpoint for TextSearch {
    type Output = PlacesSearchResponse;
    const CONFIG: ApiConfig = ApiConfig::new("/maps/api/place/textsearch/json");
    const NAME: &'static str = "place_text_search";

    fn validate(&self, params: &QueryParams) -> Result<()> {
        if params.contains("pagetoken") {
            return Ok(());
        }
        if !params.contains("query") && !params.contains("type") {
            return Err(Error::invalid_argument(
                "request must contain 'query' or 'type'",
            ));
        }
        if params.contains("location") && !params.contains("radius") {
            return Err(Error::invalid_argument(
                "request must contain 'radius' when it contains 'location'",
            ));
        }
        validate::max_radius(params)
    }

    fn decode(response: HttpResponse) -> Result<PlacesSearchResponse> {
        decode_json::<SearchResponse>(Self::CONFIG.field_naming, response)
    }
}

/// The Place Details endpoint.
#[derive(Clone, Debug, Default)]
pub struct Details;

impl Endpoint for Details {
    type Output = PlaceDetails;
    const CONFIG: ApiConfig = ApiConfig::new("/maps/api/place/details/json");
    const NAME: &'static str = "place_details";

    fn validate(&self, params: &QueryParams) -> Result<()> {
        validate::require(params, "placeid")
    }

    fn decode(response: HttpResponse) -> Result<PlaceDetails> {
        decode_json::<DetailsResponse>(Self::CONFIG.field_naming, response)
    }
}

/// The Find Place endpoint.
#[derive(Clone, Debug, Default)]
pub struct FindPlace;

impl Endpoint for FindPlace {
    type Output = FindPlaceFromText;
    const CONFIG: ApiConfig = ApiConfig::new("/maps/api/place/findplacefromtext/json");
    const NAME: &'static str = "find_place_from_text";

    fn validate(&self, params: &QueryParams) -> Result<()> {
        validate::require(params, "input")?;
        validate::require(params, "inputtype")
    }

    fn decode(response: HttpResponse) -> Result<FindPlaceFromText> {
        decode_json::<FindPlaceResponse>(Self::CONFIG.field_naming, response)
    }
}

/// The Place Autocomplete endpoint.
#[derive(Clone, Debug, Default)]
pub struct Autocomplete;

impl Endpoint for Autocomplete {
    type Output = Vec<AutocompletePrediction>;
    const CONFIG: ApiConfig = ApiConfig::new("/maps/api/place/autocomplete/json");
    const NAME: &'static str = "place_autocomplete";

    fn validate(&self, params: &QueryParams) -> Result<()> {
        validate::require(params, "input")?;
        validate::max_radius(params)
    }

    fn decode(response: HttpResponse) -> Result<Vec<AutocompletePrediction>> {
        decode_json::<AutocompleteResponse>(Self::CONFIG.field_naming, response)
    }
}

/// The Query Autocomplete endpoint.
#[derive(Clone, Debug, Default)]
pub struct QueryAutocomplete;

impl Endpoint for QueryAutocomplete {
    type Output = Vec<AutocompletePrediction>;
    const CONFIG: ApiConfig = ApiConfig::new("/maps/api/place/queryautocomplete/json");
    const NAME: &'static str = "query_autocomplete";

    fn validate(&self, params: &QueryParams) -> Result<()> {
        validate::require(params, "input")
    }

    fn decode(response: HttpResponse) -> Result<Vec<AutocompletePrediction>> {
        decode_json::<AutocompleteResponse>(Self::CONFIG.field_naming, response)
    }
}

/// The Place Photo endpoint.
#[derive(Clone, Debug, Default)]
pub struct Photo;

impl Endpoint for Photo {
    type Output = ImageResult;
    const CONFIG: ApiConfig = ApiConfig::new("/maps/api/place/photo");
    const NAME: &'static str = "place_photo";

    fn validate(&self, params: &QueryParams) -> Result<()> {
        validate::require(params, "photoreference")?;
        if !params.contains("maxwidth") && !params.contains("maxheight") {
            return Err(Error::invalid_argument(
                "request must contain 'maxwidth' or 'maxheight'",
            ));
        }
        Ok(())
    }

    fn decode(response: HttpResponse) -> Result<ImageResult> {
        decode_image(response)
    }
}

fn list_successful(status: &str) -> bool {
    matches!(status, "OK" | "ZERO_RESULTS")
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SearchResponse {
    status: String,
    error_message: Option<String>,
    results: Vec<PlacesSearchResult>,
    next_page_token: Option<String>,
    html_attributions: Vec<String>,
}

impl ApiResponse for SearchResponse {
    type Output = PlacesSearchResponse;

    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn successful(&self) -> bool {
        list_successful(&self.status)
    }

    fn into_result(self) -> PlacesSearchResponse {
        PlacesSearchResponse {
            results: self.results,
            next_page_token: self.next_page_token,
            html_attributions: self.html_attributions,
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct DetailsResponse {
    status: String,
    error_message: Option<String>,
    result: PlaceDetails,
    html_attributions: Vec<String>,
}

impl ApiResponse for DetailsResponse {
    type Output = PlaceDetails;

    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn into_result(self) -> PlaceDetails {
        PlaceDetails {
            html_attributions: self.html_attributions,
            ..self.result
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct FindPlaceResponse {
    status: String,
    error_message: Option<String>,
    candidates: Vec<PlacesSearchResult>,
}

impl ApiResponse for FindPlaceResponse {
    type Output = FindPlaceFromText;

    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn successful(&self) -> bool {
        list_successful(&self.status)
    }

    fn into_result(self) -> FindPlaceFromText {
        FindPlaceFromText {
            candidates: self.candidates,
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct AutocompleteResponse {
    status: String,
    error_message: Option<String>,
    predictions: Vec<AutocompletePrediction>,
}

impl ApiResponse for AutocompleteResponse {
    type Output = Vec<AutocompletePrediction>;

    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    fn successful(&self) -> bool {
        list_successful(&self.status)
    }

    fn into_result(self) -> Vec<AutocompletePrediction> {
        self.predictions
    }
}

impl GeoApiContext {
    /// Starts a Nearby Search around a location.
    ///
    /// # Example
    /// ```no_run
    /// # use google_maps_services::context::GeoApiContext;
    /// use google_maps_services::model::{LatLng, PlaceType};
    /// # async fn sample(context: &GeoApiContext) -> google_maps_services::Result<()> {
    /// let page = context
    ///     .nearby_search_query(LatLng::new(-33.8670522, 151.1957362))
    ///     .radius(500)
    ///     .place_type(PlaceType::Restaurant)
    ///     .await?;
    /// for place in &page.results {
    ///     println!("{}", place.name);
    /// }
    /// if let Some(token) = page.next_page_token {
    ///     let next = context.nearby_search_next_page(token).await?;
    ///     println!("{} more", next.results.len());
    /// }
    /// # Ok(()) }
    /// ```
    pub fn nearby_search_query(&self, location: LatLng) -> PendingRequest<NearbySearch> {
        PendingRequest::new(self, NearbySearch).location(location)
    }

    /// Requests the next page of a Nearby Search.
    pub fn nearby_search_next_page<V: Into<String>>(
        &self,
        page_token: V,
    ) -> PendingRequest<NearbySearch> {
        PendingRequest::new(self, NearbySearch).page_token(page_token)
    }

    /// Starts a Text Search.
    pub fn text_search_query<V: Into<String>>(&self, query: V) -> PendingRequest<TextSearch> {
        PendingRequest::new(self, TextSearch).query(query)
    }

    /// Starts a Text Search restricted to one type of place, without a query.
    pub fn text_search_by_type(&self, place_type: PlaceType) -> PendingRequest<TextSearch> {
        PendingRequest::new(self, TextSearch).place_type(place_type)
    }

    /// Requests the next page of a Text Search.
    pub fn text_search_next_page<V: Into<String>>(
        &self,
        page_token: V,
    ) -> PendingRequest<TextSearch> {
        PendingRequest::new(self, TextSearch).page_token(page_token)
    }

    /// Starts a Place Details request.
    pub fn place_details<V: Into<String>>(&self, place_id: V) -> PendingRequest<Details> {
        PendingRequest::new(self, Details).param("placeid", place_id.into())
    }

    /// Starts a Find Place request.
    pub fn find_place_from_text<V: Into<String>>(
        &self,
        input: V,
        input_type: InputType,
    ) -> PendingRequest<FindPlace> {
        PendingRequest::new(self, FindPlace)
            .param("input", input.into())
            .param("inputtype", input_type)
    }

    /// Starts a Place Autocomplete request.
    ///
    /// The session token groups the autocomplete requests of one user
    /// session with the final Place Details request.
    pub fn place_autocomplete<V, S>(&self, input: V, session_token: S) -> PendingRequest<Autocomplete>
    where
        V: Into<String>,
        S: Into<String>,
    {
        PendingRequest::new(self, Autocomplete)
            .param("input", input.into())
            .param("sessiontoken", session_token.into())
    }

    /// Starts a Query Autocomplete request.
    pub fn query_autocomplete<V: Into<String>>(
        &self,
        input: V,
    ) -> PendingRequest<QueryAutocomplete> {
        PendingRequest::new(self, QueryAutocomplete).param("input", input.into())
    }

    /// Downloads a photo returned by a Places request.
    ///
    /// Set at least one of the maximum width or height.
    pub fn photo<V: Into<String>>(&self, photo_reference: V) -> PendingRequest<Photo> {
        PendingRequest::new(self, Photo).param("photoreference", photo_reference.into())
    }
}

impl PendingRequest<NearbySearch> {
    /// The center of the search.
    pub fn location(self, v: LatLng) -> Self {
        self.param("location", v)
    }

    /// The search radius, in meters.
    pub fn radius(self, v: u32) -> Self {
        self.param("radius", v)
    }

    /// The order of the results.
    pub fn rank_by(self, v: RankBy) -> Self {
        self.param("rankby", v)
    }

    /// Matches the terms against all the content indexed for a place.
    pub fn keyword<V: Into<String>>(self, v: V) -> Self {
        self.param("keyword", v.into())
    }

    /// Matches the terms against the names of places.
    pub fn name<V: Into<String>>(self, v: V) -> Self {
        self.param("name", v.into())
    }

    /// Restricts the results to one type of place.
    pub fn place_type(self, v: PlaceType) -> Self {
        self.param("type", v)
    }

    /// The lowest price level.
    pub fn min_price(self, v: PriceLevel) -> Self {
        self.param("minprice", v)
    }

    /// The highest price level.
    pub fn max_price(self, v: PriceLevel) -> Self {
        self.param("maxprice", v)
    }

    /// Returns only the places open at the time of the request.
    pub fn open_now(self, v: bool) -> Self {
        self.param("opennow", v)
    }

    /// Requests the page after a previous search. The other parameters are
    /// ignored.
    pub fn page_token<V: Into<String>>(self, v: V) -> Self {
        self.param("pagetoken", v.into())
    }
}

impl PendingRequest<TextSearch> {
    /// The text to search for, for example `restaurants in Sydney`.
    pub fn query<V: Into<String>>(self, v: V) -> Self {
        self.param("query", v.into())
    }

    /// Biases the results towards a location. Requires a radius.
    pub fn location(self, v: LatLng) -> Self {
        self.param("location", v)
    }

    /// The search radius, in meters.
    pub fn radius(self, v: u32) -> Self {
        self.param("radius", v)
    }

    /// A region code, as a ccTLD two-letter value, to bias the results.
    pub fn region<V: Into<String>>(self, v: V) -> Self {
        self.param("region", v.into())
    }

    /// Restricts the results to one type of place.
    pub fn place_type(self, v: PlaceType) -> Self {
        self.param("type", v)
    }

    /// The lowest price level.
    pub fn min_price(self, v: PriceLevel) -> Self {
        self.param("minprice", v)
    }

    /// The highest price level.
    pub fn max_price(self, v: PriceLevel) -> Self {
        self.param("maxprice", v)
    }

    /// Returns only the places open at the time of the request.
    pub fn open_now(self, v: bool) -> Self {
        self.param("opennow", v)
    }

    /// Requests the page after a previous search. The other parameters are
    /// ignored.
    pub fn page_token<V: Into<String>>(self, v: V) -> Self {
        self.param("pagetoken", v.into())
    }
}

impl PendingRequest<Details> {
    /// Restricts the fields in the response.
    pub fn fields<I>(self, v: I) -> Self
    where
        I: IntoIterator<Item = PlaceDetailsField>,
    {
        self.param("fields", join(',', v))
    }

    /// The session token of a previous autocomplete session.
    pub fn session_token<V: Into<String>>(self, v: V) -> Self {
        self.param("sessiontoken", v.into())
    }

    /// A region code, as a ccTLD two-letter value, to format the address.
    pub fn region<V: Into<String>>(self, v: V) -> Self {
        self.param("region", v.into())
    }
}

impl PendingRequest<FindPlace> {
    /// Restricts the fields in the response.
    pub fn fields<I>(self, v: I) -> Self
    where
        I: IntoIterator<Item = FindPlaceField>,
    {
        self.param("fields", join(',', v))
    }

    /// Prefers results in an area.
    pub fn location_bias(self, v: LocationBias) -> Self {
        self.param("locationbias", v)
    }
}

impl PendingRequest<Autocomplete> {
    /// The position of the last character the service uses for matching.
    pub fn offset(self, v: u32) -> Self {
        self.param("offset", v)
    }

    /// The point used to compute the distance to each prediction.
    pub fn origin(self, v: LatLng) -> Self {
        self.param("origin", v)
    }

    /// Biases the predictions towards a location.
    pub fn location(self, v: LatLng) -> Self {
        self.param("location", v)
    }

    /// The radius around the location, in meters.
    pub fn radius(self, v: u32) -> Self {
        self.param("radius", v)
    }

    /// Restricts the predictions to these types.
    pub fn types<I>(self, v: I) -> Self
    where
        I: IntoIterator<Item = PlaceAutocompleteType>,
    {
        self.param("types", join('|', v))
    }

    /// Restricts the predictions to these countries.
    pub fn components<I>(self, v: I) -> Self
    where
        I: IntoIterator<Item = ComponentFilter>,
    {
        self.param("components", join('|', v))
    }

    /// Returns only the predictions within the location and radius.
    pub fn strict_bounds(self, v: bool) -> Self {
        self.param("strictbounds", v)
    }
}

impl PendingRequest<QueryAutocomplete> {
    /// The position of the last character the service uses for matching.
    pub fn offset(self, v: u32) -> Self {
        self.param("offset", v)
    }

    /// Biases the predictions towards a location.
    pub fn location(self, v: LatLng) -> Self {
        self.param("location", v)
    }

    /// The radius around the location, in meters.
    pub fn radius(self, v: u32) -> Self {
        self.param("radius", v)
    }
}

impl PendingRequest<Photo> {
    /// The maximum width of the image, in pixels.
    pub fn max_width(self, v: u32) -> Self {
        self.param("maxwidth", v)
    }

    /// The maximum height of the image, in pixels.
    pub fn max_height(self, v: u32) -> Self {
        self.param("maxheight", v)
    }
}
