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

//! Google Maps Platform web services client for Rust.
//!
//! This crate sends requests to the Maps web services (Directions, Distance
//! Matrix, Elevation, Geocoding, Geolocation, Places, Roads, Maps Static, and
//! Time Zone), and decodes their responses into the types in [model].
//!
//! All requests go through a [GeoApiContext], which holds the credentials,
//! the retry and rate limiting policies, and the worker threads that run the
//! requests. Each endpoint has a method on the context returning a
//! [PendingRequest][request::PendingRequest]. Configure the request with its
//! setters, and then `.await` it, or call
//! [send()][request::PendingRequest::send] to get a [PendingResult] that can
//! be awaited, waited on, or given a callback.
//!
//! # Example
//! ```no_run
//! use google_maps_services::GeoApiContext;
//! # async fn sample() -> anyhow::Result<()> {
//! let context = GeoApiContext::builder()
//!     .with_api_key("AIza-your-api-key")
//!     .with_query_rate_limit(10.0)
//!     .build()?;
//! let results = context
//!     .geocode_address("1600 Amphitheatre Parkway, Mountain View, CA")
//!     .await?;
//! println!("{}", results[0].formatted_address);
//! # Ok(()) }
//! ```
//!
//! **WARNING:** this crate is under active development. We expect multiple
//! breaking changes in the upcoming releases.

pub use gax::Result;
pub use gax::error;
pub use gax::{backoff_policy, exponential_backoff, metrics, pending_result, rate_limiter};
pub use gax::{retry_policy, retry_result};

pub use context::GeoApiContext;
pub use gax::pending_result::PendingResult;

pub mod api_config;
pub mod api_response;
pub mod context;
pub mod model;
pub mod polyline;
pub mod query;
pub mod request;
pub mod transport;
pub mod url_signer;

pub mod directions;
pub mod distance_matrix;
pub mod elevation;
pub mod geocoding;
pub mod geolocation;
pub mod places;
pub mod roads;
pub mod static_maps;
pub mod time_zone;

mod dispatch;
