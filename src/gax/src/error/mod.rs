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

//! Errors returned by the Maps web services client.
//!
//! The client distinguishes between problems detected before a request is
//! sent (invalid configuration or invalid request parameters), problems
//! sending the request or receiving the response (I/O errors, undecodable
//! payloads), and errors reported by the service itself.
//!
//! Errors reported by the service carry an [ApiError], classified with
//! [classify] into one of the [ApiErrorKind] variants.
//!
//! # Example
//! ```
//! use google_maps_gax::error::{ApiErrorKind, Error};
//! fn handle_error(e: Error) {
//!     match e.api_error().map(|a| a.kind()) {
//!         Some(ApiErrorKind::OverDailyLimit) => println!("try again tomorrow: {e}"),
//!         Some(kind) => println!("the service rejected the request ({kind:?}): {e}"),
//!         None => println!("the request did not complete: {e}"),
//!     }
//! }
//! ```

mod api_error;
mod core_error;
pub use api_error::*;
pub use core_error::*;
