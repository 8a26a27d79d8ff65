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

//! Common implementation for exponential backoff.
//!
//! This module provides an implementation of truncated [exponential backoff]
//! with randomized jitter. It implements the [BackoffPolicy] trait.
//!
//! [BackoffPolicy]: crate::backoff_policy::BackoffPolicy
//! [exponential backoff]: https://en.wikipedia.org/wiki/Exponential_backoff

use std::time::Duration;

/// The error type for exponential backoff creation.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("the scaling value ({0}) should be >= 1.0")]
    InvalidScalingFactor(f64),
    #[error("the initial delay ({0:?}) should be greater than zero")]
    InvalidInitialDelay(Duration),
    #[error(
        "the maximum delay ({maximum:?}) should be greater than or equal to the initial delay ({initial:?})"
    )]
    EmptyRange {
        maximum: Duration,
        initial: Duration,
    },
    #[error("the randomization factor ({0}) should be in the [0.0, 1.0) range")]
    InvalidRandomization(f64),
}

/// Implements truncated exponential backoff with jitter.
///
/// The delay after the `n`-th attempt is `initial_delay * scaling^(n-1)`,
/// truncated to `maximum_delay`, and then randomized to a value in the
/// `[delay * (1 - randomization), delay]` range. Jitter only shortens the
/// delay, so `maximum_delay` is never exceeded.
#[derive(Clone, Debug)]
pub struct ExponentialBackoffBuilder {
    initial_delay: Duration,
    maximum_delay: Duration,
    scaling: f64,
    randomization: f64,
}

impl ExponentialBackoffBuilder {
    /// Creates a builder with the default parameters.
    ///
    /// The defaults start with a 500 millisecond delay, grow it by 50% on
    /// each attempt, and shorten each delay by a random amount of up to
    /// 50%.
    ///
    /// # Example
    /// ```
    /// # use google_maps_gax::exponential_backoff::Error;
    /// # use google_maps_gax::exponential_backoff::ExponentialBackoffBuilder;
    /// use std::time::Duration;
    ///
    /// let policy = ExponentialBackoffBuilder::new()
    ///         .with_initial_delay(Duration::from_millis(100))
    ///         .with_maximum_delay(Duration::from_secs(5))
    ///         .with_scaling(4.0)
    ///         .build()?;
    /// # Ok::<(), Error>(())
    /// ```
    pub fn new() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            maximum_delay: Duration::from_secs(30),
            scaling: 1.5,
            randomization: 0.5,
        }
    }

    /// Change the initial delay.
    pub fn with_initial_delay<V: Into<Duration>>(mut self, v: V) -> Self {
        self.initial_delay = v.into();
        self
    }

    /// Change the maximum delay.
    pub fn with_maximum_delay<V: Into<Duration>>(mut self, v: V) -> Self {
        self.maximum_delay = v.into();
        self
    }

    /// Change the scaling factor in this backoff policy.
    pub fn with_scaling<V: Into<f64>>(mut self, v: V) -> Self {
        self.scaling = v.into();
        self
    }

    /// Change the randomization factor in this backoff policy.
    ///
    /// A value of `0.0` disables jitter.
    pub fn with_randomization<V: Into<f64>>(mut self, v: V) -> Self {
        self.randomization = v.into();
        self
    }

    /// Creates a new exponential backoff policy.
    ///
    /// # Example
    /// ```
    /// # use google_maps_gax::exponential_backoff::Error;
    /// # use google_maps_gax::exponential_backoff::ExponentialBackoffBuilder;
    /// # use google_maps_gax::backoff_policy::BackoffPolicy;
    /// use std::time::Duration;
    /// use tokio::time::Instant;
    /// let backoff = ExponentialBackoffBuilder::new()
    ///     .with_initial_delay(Duration::from_secs(5))
    ///     .with_maximum_delay(Duration::from_secs(50))
    ///     .with_scaling(2.0)
    ///     .with_randomization(0.0)
    ///     .build()?;
    /// let p = backoff.on_failure(Instant::now(), 1);
    /// assert_eq!(p, Duration::from_secs(5));
    /// let p = backoff.on_failure(Instant::now(), 2);
    /// assert_eq!(p, Duration::from_secs(10));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn build(self) -> Result<ExponentialBackoff, Error> {
        if self.scaling < 1.0 {
            return Err(Error::InvalidScalingFactor(self.scaling));
        }
        if self.initial_delay.is_zero() {
            return Err(Error::InvalidInitialDelay(self.initial_delay));
        }
        if self.maximum_delay < self.initial_delay {
            return Err(Error::EmptyRange {
                maximum: self.maximum_delay,
                initial: self.initial_delay,
            });
        }
        if !(0.0..1.0).contains(&self.randomization) {
            return Err(Error::InvalidRandomization(self.randomization));
        }
        Ok(ExponentialBackoff {
            initial_delay: self.initial_delay,
            maximum_delay: self.maximum_delay,
            scaling: self.scaling,
            randomization: self.randomization,
        })
    }

    /// Creates a new exponential backoff policy clamping the ranges towards
    /// recommended values.
    ///
    /// The maximum delay is clamped first, to be between one second and one
    /// hour (both inclusive). Then the initial delay is clamped to be between
    /// one millisecond and the maximum delay. The scaling factor is clamped to
    /// the `[1.0, 32.0]` range, and the randomization factor to the
    /// `[0.0, 0.9]` range.
    ///
    /// # Example
    /// ```
    /// # use google_maps_gax::exponential_backoff::ExponentialBackoffBuilder;
    /// # use google_maps_gax::backoff_policy::BackoffPolicy;
    /// use std::time::Duration;
    /// use tokio::time::Instant;
    /// let backoff = ExponentialBackoffBuilder::new().clamp();
    /// assert!(backoff.on_failure(Instant::now(), 1) > Duration::ZERO);
    /// ```
    pub fn clamp(self) -> ExponentialBackoff {
        let scaling = self.scaling.clamp(1.0, 32.0);
        let maximum_delay = self
            .maximum_delay
            .clamp(Duration::from_secs(1), Duration::from_secs(60 * 60));
        let initial_delay = self
            .initial_delay
            .clamp(Duration::from_millis(1), maximum_delay);
        let randomization = if self.randomization.is_nan() {
            0.0
        } else {
            self.randomization.clamp(0.0, 0.9)
        };
        ExponentialBackoff {
            initial_delay,
            maximum_delay,
            scaling,
            randomization,
        }
    }
}

impl Default for ExponentialBackoffBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Implements truncated exponential backoff with jitter.
#[derive(Debug)]
pub struct ExponentialBackoff {
    initial_delay: Duration,
    maximum_delay: Duration,
    scaling: f64,
    randomization: f64,
}

impl ExponentialBackoff {
    fn delay(&self, attempt_count: u32) -> Duration {
        let exp = std::cmp::min(i32::MAX as u32, attempt_count) as i32;
        let exp = exp.saturating_sub(1);
        let scaling = self.scaling.powi(exp);
        if scaling >= self.maximum_delay.div_duration_f64(self.initial_delay) {
            self.maximum_delay
        } else {
            // .mul_f64() cannot panic because (1) we guarantee scaling >= 1.0,
            // and (2) we just checked that
            //     self.initial_delay * scaling < maximum_delay.
            self.initial_delay.mul_f64(scaling)
        }
    }

    fn delay_with_jitter(&self, attempt_count: u32, rng: &mut impl rand::Rng) -> Duration {
        let delay = self.delay(attempt_count);
        if self.randomization == 0.0 {
            return delay;
        }
        let lo = delay.mul_f64(1.0 - self.randomization);
        rng.random_range(lo..=delay)
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        ExponentialBackoffBuilder::new().clamp()
    }
}

impl crate::backoff_policy::BackoffPolicy for ExponentialBackoff {
    fn on_failure(&self, _loop_start: tokio::time::Instant, attempt_count: u32) -> Duration {
        self.delay_with_jitter(attempt_count, &mut rand::rng())
    }
}
