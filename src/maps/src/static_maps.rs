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

//! The Maps Static API.
//!
//! Renders a map as an image, optionally with markers and paths.

use crate::Result;
use crate::api_config::ApiConfig;
use crate::api_response::decode_image;
use crate::context::GeoApiContext;
use crate::error::Error;
use crate::model::{ImageFormat, ImageResult, LatLng, Markers, Path, Size, StaticMapType};
use crate::query::QueryParams;
use crate::request::{Endpoint, PendingRequest, validate};
use crate::transport::HttpResponse;

/// The Maps Static endpoint.
#[derive(Clone, Debug, Default)]
pub struct StaticMap;

impl Endpoint for StaticMap {
    type Output = ImageResult;
    const CONFIG: ApiConfig = ApiConfig::new("/maps/api/staticmap");
    const NAME: &'static str = "static_map";

    fn validate(&self, params: &QueryParams) -> Result<()> {
        validate::require(params, "size")?;
        if params.contains("markers") || params.contains("path") {
            return Ok(());
        }
        for name in ["center", "zoom"] {
            if !params.contains(name) {
                return Err(Error::invalid_argument(format!(
                    "request must contain '{name}' if 'markers' or 'path' aren't present"
                )));
            }
        }
        Ok(())
    }

    fn decode(response: HttpResponse) -> Result<ImageResult> {
        decode_image(response)
    }
}

impl GeoApiContext {
    /// Starts a Maps Static request for an image of the given size.
    ///
    /// # Example
    /// ```no_run
    /// # use google_maps_services::context::GeoApiContext;
    /// use google_maps_services::model::{ImageFormat, LatLng, Markers, Size};
    /// # async fn sample(context: &GeoApiContext) -> google_maps_services::Result<()> {
    /// let image = context
    ///     .static_map(Size::new(640, 480))
    ///     .center(LatLng::new(-33.8688, 151.2093))
    ///     .zoom(12)
    ///     .format(ImageFormat::Png)
    ///     .markers(Markers::new().with_label('S').add_location("Sydney"))
    ///     .await?;
    /// println!("{} bytes of {}", image.image_data.len(), image.content_type);
    /// # Ok(()) }
    /// ```
    pub fn static_map(&self, size: Size) -> PendingRequest<StaticMap> {
        PendingRequest::new(self, StaticMap).param("size", size)
    }
}

impl PendingRequest<StaticMap> {
    /// The center of the map.
    pub fn center(self, v: LatLng) -> Self {
        self.param("center", v)
    }

    /// The center of the map, as an address or place name.
    pub fn center_address<V: Into<String>>(self, v: V) -> Self {
        self.param("center", v.into())
    }

    /// The zoom level, from 0 (the whole world) to 21 (buildings).
    pub fn zoom(self, v: u32) -> Self {
        self.param("zoom", v)
    }

    /// The size of the image, in pixels.
    pub fn size(self, v: Size) -> Self {
        self.param("size", v)
    }

    /// The number of pixels returned, 1, 2, or 4 for premium plans.
    pub fn scale(self, v: u32) -> Self {
        self.param("scale", v)
    }

    /// The image format.
    pub fn format(self, v: ImageFormat) -> Self {
        self.param("format", v)
    }

    /// The type of map.
    pub fn maptype(self, v: StaticMapType) -> Self {
        self.param("maptype", v)
    }

    /// A region code, as a ccTLD two-letter value, for the borders and
    /// labels.
    pub fn region<V: Into<String>>(self, v: V) -> Self {
        self.param("region", v.into())
    }

    /// Adds a group of markers.
    pub fn markers(self, v: Markers) -> Self {
        self.param_add_to_list("markers", v)
    }

    /// Adds a path.
    pub fn path(self, v: Path) -> Self {
        self.param_add_to_list("path", v)
    }

    /// Adds a location that must remain visible.
    pub fn visible(self, v: LatLng) -> Self {
        self.param_add_to_list("visible", v)
    }

    /// Adds a location, as an address or place name, that must remain
    /// visible.
    pub fn visible_address<V: Into<String>>(self, v: V) -> Self {
        self.param_add_to_list("visible", v.into())
    }
}
