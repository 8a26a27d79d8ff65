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

//! Google Maps Platform request execution helpers.
//!
//! This crate contains the types and functions shared by every API surface of
//! the Google Maps Platform web services client: the error taxonomy, retry
//! and backoff policies, the retry loop, a rate limiter, and the pending
//! result handle returned by every request.
//!
//! Most applications use these types through the `google-maps-services`
//! crate, and only need to name them when customizing the client, for
//! example, to provide a custom retry policy.

/// An alias of [std::result::Result] where the error is always [crate::error::Error].
///
/// This is the result type used by all functions sending requests.
pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// The core error types used by the client.
pub mod error;

pub mod backoff_policy;
pub mod exponential_backoff;
pub mod metrics;
pub mod pending_result;
pub mod rate_limiter;
pub mod retry_policy;
pub mod retry_result;

/// The retry loop shared by all requests.
///
/// Applications should not need to call this directly, the client runs it
/// for every request.
#[doc(hidden)]
pub mod retry_loop_internal;
