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

//! Retry loop control types.
//!
//! Applications only need to use these types when implementing their own
//! retry policies.

use crate::error::Error;

/// The result of a loop control decision.
///
/// # Example
///
/// ```
/// # use google_maps_gax::{error::Error, retry_policy::RetryPolicy};
/// # use google_maps_gax::retry_result::RetryResult;
/// #[derive(Debug)]
/// struct MyRetryPolicy;
/// impl RetryPolicy for MyRetryPolicy {
///     fn on_error(
///         &self,
///         _loop_start: tokio::time::Instant,
///         attempt_count: u32,
///         error: Error) -> RetryResult
///     {
///         if attempt_count > 42 {
///             return RetryResult::Exhausted(error);
///         }
///         RetryResult::Continue(error)
///     }
/// }
/// ```
#[derive(Debug)]
pub enum RetryResult {
    /// The error is non-retryable, stop the loop.
    Permanent(Error),

    /// The error is retryable, but the policy is stopping the loop.
    ///
    /// Loop control policies may stop the loop on retryable errors, for
    /// example, because the policy only allows a limited number of attempts.
    Exhausted(Error),

    /// The error was retryable, continue the loop.
    Continue(Error),
}

impl RetryResult {
    /// Returns true if the error is not retryable.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent(_))
    }

    /// Returns true if the error is retryable but the policy stopped the loop.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted(_))
    }

    /// Returns true if the loop should continue.
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }

    /// Returns the error, consuming the result.
    pub fn into_error(self) -> Error {
        match self {
            Self::Permanent(e) | Self::Exhausted(e) | Self::Continue(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_result() {
        let r = RetryResult::Permanent(Error::io("err"));
        assert!(r.is_permanent(), "{r:?}");
        assert!(!r.is_exhausted(), "{r:?}");
        assert!(!r.is_continue(), "{r:?}");
        assert!(r.into_error().is_io());

        let r = RetryResult::Exhausted(Error::io("err"));
        assert!(!r.is_permanent(), "{r:?}");
        assert!(r.is_exhausted(), "{r:?}");
        assert!(!r.is_continue(), "{r:?}");

        let r = RetryResult::Continue(Error::io("err"));
        assert!(!r.is_permanent(), "{r:?}");
        assert!(!r.is_exhausted(), "{r:?}");
        assert!(r.is_continue(), "{r:?}");
    }
}
