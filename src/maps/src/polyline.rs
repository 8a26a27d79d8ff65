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

//! The encoded polyline algorithm.
//!
//! Paths returned by the services, and paths sent with some requests, use a
//! compact ASCII encoding. Each coordinate is rounded to five decimal places,
//! stored as the difference from the previous point, and written in 5-bit
//! chunks offset into the printable ASCII range.

use crate::model::LatLng;
use serde::{Deserialize, Serialize};

/// The error type for polyline decoding.
#[derive(thiserror::Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The input ends in the middle of a coordinate.
    #[error("the encoded polyline is truncated at offset {0}")]
    Truncated(usize),
    /// The input contains a byte outside the encoding alphabet.
    #[error("invalid byte {byte:#x} at offset {offset} in encoded polyline")]
    InvalidByte {
        /// The offending byte.
        byte: u8,
        /// Its offset in the input.
        offset: usize,
    },
}

/// An encoded path, as returned by the services.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodedPolyline {
    /// The encoded path.
    pub points: String,
}

impl EncodedPolyline {
    /// Wraps an already encoded path.
    pub fn new<T: Into<String>>(points: T) -> Self {
        Self {
            points: points.into(),
        }
    }

    /// Encodes `path`.
    pub fn from_path(path: &[LatLng]) -> Self {
        Self::new(encode(path))
    }

    /// Decodes the path.
    pub fn decode_path(&self) -> Result<Vec<LatLng>, Error> {
        decode(&self.points)
    }

    /// The encoded path.
    pub fn encoded_path(&self) -> &str {
        &self.points
    }
}

/// Encodes a sequence of points.
///
/// # Example
/// ```
/// # use google_maps_services::{model::LatLng, polyline::encode};
/// let path = [LatLng::new(38.5, -120.2), LatLng::new(40.7, -120.95)];
/// assert_eq!(encode(&path), "_p~iF~ps|U_ulLnnqC");
/// ```
pub fn encode(path: &[LatLng]) -> String {
    let mut encoded = String::new();
    let (mut last_lat, mut last_lng) = (0_i64, 0_i64);
    for point in path {
        let lat = (point.lat * 1e5).round() as i64;
        let lng = (point.lng * 1e5).round() as i64;
        encode_value(lat - last_lat, &mut encoded);
        encode_value(lng - last_lng, &mut encoded);
        last_lat = lat;
        last_lng = lng;
    }
    encoded
}

/// Decodes an encoded polyline.
pub fn decode(encoded: &str) -> Result<Vec<LatLng>, Error> {
    let bytes = encoded.as_bytes();
    let mut path = Vec::new();
    let mut offset = 0;
    let (mut lat, mut lng) = (0_i64, 0_i64);
    while offset < bytes.len() {
        lat += decode_value(bytes, &mut offset)?;
        lng += decode_value(bytes, &mut offset)?;
        path.push(LatLng::new(lat as f64 / 1e5, lng as f64 / 1e5));
    }
    Ok(path)
}

fn encode_value(delta: i64, out: &mut String) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };
    while value >= 0x20 {
        out.push(char::from((0x20 | (value & 0x1f)) as u8 + 63));
        value >>= 5;
    }
    out.push(char::from(value as u8 + 63));
}

fn decode_value(bytes: &[u8], offset: &mut usize) -> Result<i64, Error> {
    let mut result = 0_i64;
    let mut shift = 0;
    loop {
        let Some(&byte) = bytes.get(*offset) else {
            return Err(Error::Truncated(*offset));
        };
        // 63 + 0x3f is the largest valid byte. A shift past 60 would overflow.
        if !(63..=126).contains(&byte) || shift > 60 {
            return Err(Error::InvalidByte {
                byte,
                offset: *offset,
            });
        }
        *offset += 1;
        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }
    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}
