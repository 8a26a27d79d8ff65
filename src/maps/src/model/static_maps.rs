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

//! Types used by the Static Maps service.

use super::{EncodedPolyline, LatLng};
use crate::query::UrlValue;

/// The size of a static map, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    /// The width.
    pub width: u32,
    /// The height.
    pub height: u32,
}

impl Size {
    /// Creates a size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl UrlValue for Size {
    fn to_url_value(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

string_enum! {
    /// The image format of a static map.
    pub enum ImageFormat {
        /// 8-bit PNG, the default.
        Png => "png",
        /// 8-bit PNG.
        Png8 => "png8",
        /// 32-bit PNG.
        Png32 => "png32",
        /// GIF.
        Gif => "gif",
        /// Progressive JPEG.
        Jpg => "jpg",
        /// Non-progressive JPEG.
        JpgBaseline => "jpg-baseline",
    }
}

string_enum! {
    /// The type of a static map.
    pub enum StaticMapType {
        /// A standard road map.
        Roadmap => "roadmap",
        /// A satellite image.
        Satellite => "satellite",
        /// A physical relief map.
        Terrain => "terrain",
        /// A satellite image with a road map overlay.
        Hybrid => "hybrid",
    }
}

string_enum! {
    /// The size of a marker.
    pub enum MarkerSize {
        /// The smallest markers, without labels.
        Tiny => "tiny",
        /// Medium markers.
        Mid => "mid",
        /// Small markers, without labels.
        Small => "small",
        /// Normal, default sized markers.
        Normal => "normal",
    }
}

/// A set of markers sharing the same style.
///
/// # Example
/// ```
/// # use google_maps_services::model::{LatLng, Markers, MarkerSize};
/// # use google_maps_services::query::UrlValue;
/// let markers = Markers::new()
///     .with_size(MarkerSize::Mid)
///     .with_color("blue")
///     .with_label('S')
///     .add_location("Sydney");
/// assert_eq!(markers.to_url_value(), "size:mid|color:blue|label:S|Sydney");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Markers {
    size: Option<MarkerSize>,
    color: Option<String>,
    label: Option<char>,
    custom_icon: Option<String>,
    locations: Vec<String>,
}

impl Markers {
    /// Creates an empty set of markers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the marker size.
    pub fn with_size(mut self, v: MarkerSize) -> Self {
        self.size = Some(v);
        self
    }

    /// Sets the color, a 24-bit `0xRRGGBB` value or a predefined color name.
    pub fn with_color<V: Into<String>>(mut self, v: V) -> Self {
        self.color = Some(v.into());
        self
    }

    /// Sets a single uppercase alphanumeric label.
    pub fn with_label(mut self, v: char) -> Self {
        self.label = Some(v);
        self
    }

    /// Uses a custom icon instead of the default marker.
    pub fn with_custom_icon<V: Into<String>>(mut self, url: V) -> Self {
        self.custom_icon = Some(url.into());
        self
    }

    /// Adds a marker at a named location.
    pub fn add_location<V: Into<String>>(mut self, v: V) -> Self {
        self.locations.push(v.into());
        self
    }

    /// Adds a marker at a point.
    pub fn add_point(mut self, v: LatLng) -> Self {
        self.locations.push(v.to_url_value());
        self
    }
}

impl UrlValue for Markers {
    fn to_url_value(&self) -> String {
        let mut parts = Vec::new();
        if let Some(v) = &self.size {
            parts.push(format!("size:{v}"));
        }
        if let Some(v) = &self.color {
            parts.push(format!("color:{v}"));
        }
        if let Some(v) = &self.label {
            parts.push(format!("label:{v}"));
        }
        if let Some(v) = &self.custom_icon {
            parts.push(format!("icon:{v}"));
        }
        parts.extend(self.locations.iter().cloned());
        parts.join("|")
    }
}

/// A path drawn on a static map.
///
/// # Example
/// ```
/// # use google_maps_services::model::{LatLng, Path};
/// # use google_maps_services::query::UrlValue;
/// let path = Path::new()
///     .with_weight(3)
///     .with_color("red")
///     .add_point(LatLng::new(1.0, 2.0))
///     .add_location("Sydney");
/// assert_eq!(path.to_url_value(), "weight:3|color:red|1.00000000,2.00000000|Sydney");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    weight: Option<u32>,
    color: Option<String>,
    fill_color: Option<String>,
    geodesic: bool,
    points: Vec<String>,
}

impl Path {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a path from an encoded polyline.
    pub fn encoded(polyline: &EncodedPolyline) -> Self {
        Self::new().add_location(format!("enc:{}", polyline.encoded_path()))
    }

    /// Sets the thickness of the path, in pixels.
    pub fn with_weight(mut self, v: u32) -> Self {
        self.weight = Some(v);
        self
    }

    /// Sets the color of the path.
    pub fn with_color<V: Into<String>>(mut self, v: V) -> Self {
        self.color = Some(v.into());
        self
    }

    /// Fills the area enclosed by the path with this color.
    pub fn with_fill_color<V: Into<String>>(mut self, v: V) -> Self {
        self.fill_color = Some(v.into());
        self
    }

    /// Draws the path as a geodesic curve.
    pub fn with_geodesic(mut self, v: bool) -> Self {
        self.geodesic = v;
        self
    }

    /// Adds a named location to the path.
    pub fn add_location<V: Into<String>>(mut self, v: V) -> Self {
        self.points.push(v.into());
        self
    }

    /// Adds a point to the path.
    pub fn add_point(mut self, v: LatLng) -> Self {
        self.points.push(v.to_url_value());
        self
    }
}

impl UrlValue for Path {
    fn to_url_value(&self) -> String {
        let mut parts = Vec::new();
        if let Some(v) = &self.weight {
            parts.push(format!("weight:{v}"));
        }
        if let Some(v) = &self.color {
            parts.push(format!("color:{v}"));
        }
        if let Some(v) = &self.fill_color {
            parts.push(format!("fillcolor:{v}"));
        }
        if self.geodesic {
            parts.push("geodesic:true".to_string());
        }
        parts.extend(self.points.iter().cloned());
        parts.join("|")
    }
}
