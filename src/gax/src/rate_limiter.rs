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

//! A smooth rate limiter for outbound requests.
//!
//! The [RateLimiter] issues permits at a steady rate. Permits not used while
//! the limiter is idle are stored, up to `max_burst_seconds` worth of
//! permits, and are handed out without waiting. This lets a client absorb a
//! short burst after an idle period while never exceeding the configured rate
//! over any long window.
//!
//! The limiter never makes a caller wait for permits requested by a later
//! caller. Each acquisition reserves the next free slot and the *next* caller
//! pays for any permits borrowed from the future.
//!
//! # Example
//! ```
//! # use google_maps_gax::rate_limiter::RateLimiter;
//! # tokio_test::block_on(async {
//! let limiter = RateLimiter::new(50.0)?;
//! let waited = limiter.acquire(1).await;
//! println!("waited {waited:?} before sending the request");
//! # Ok::<(), google_maps_gax::rate_limiter::Error>(())
//! # });
//! ```

use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Log a warning if a caller waits longer than this for a permit.
const SLOW_ACQUIRE_THRESHOLD: Duration = Duration::from_secs(1);

/// The longest a single reservation may push back the next free permit.
const MAX_RESERVATION: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// The error type for rate limiter creation.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("the rate ({0}) should be a positive, finite number of permits per second")]
    InvalidRate(f64),
    #[error("the maximum burst ({0}) should be a non-negative, finite number of seconds")]
    InvalidBurst(f64),
}

/// A rate limiter issuing permits at a configurable steady rate.
///
/// The limiter is internally synchronized, it is typically wrapped in an
/// [Arc][std::sync::Arc] and shared by all the requests of a client.
#[derive(Debug)]
pub struct RateLimiter {
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    stored_permits: f64,
    max_permits: f64,
    max_burst_seconds: f64,
    // Seconds between two permits at the steady rate.
    stable_interval: f64,
    // The time when the next permit is available. May be in the future, when
    // a previous caller borrowed permits.
    next_free: Instant,
}

impl RateLimiter {
    /// Creates a limiter issuing `permits_per_second` permits, and storing up
    /// to one second worth of unused permits.
    pub fn new(permits_per_second: f64) -> Result<Self, Error> {
        Self::with_burst(permits_per_second, 1.0)
    }

    /// Creates a limiter issuing `permits_per_second` permits, and storing up
    /// to `max_burst_seconds` worth of unused permits.
    ///
    /// The limiter starts with no stored permits, the first acquisition is
    /// immediate and the following ones wait for the steady rate.
    pub fn with_burst(permits_per_second: f64, max_burst_seconds: f64) -> Result<Self, Error> {
        validate_rate(permits_per_second)?;
        if !max_burst_seconds.is_finite() || max_burst_seconds < 0.0 {
            return Err(Error::InvalidBurst(max_burst_seconds));
        }
        let state = State {
            stored_permits: 0.0,
            max_permits: max_burst_seconds * permits_per_second,
            max_burst_seconds,
            stable_interval: 1.0 / permits_per_second,
            next_free: Instant::now(),
        };
        Ok(Self {
            state: Mutex::new(state),
        })
    }

    /// The steady rate, in permits per second.
    pub fn rate(&self) -> f64 {
        1.0 / self.lock().stable_interval
    }

    /// Changes the steady rate.
    ///
    /// The new rate applies to future acquisitions. Callers already waiting
    /// for a permit are not woken up, nor do they wait longer.
    pub fn set_rate(&self, permits_per_second: f64) -> Result<(), Error> {
        validate_rate(permits_per_second)?;
        let mut state = self.lock();
        state.resync(Instant::now());
        let old_max = state.max_permits;
        state.stable_interval = 1.0 / permits_per_second;
        state.max_permits = state.max_burst_seconds * permits_per_second;
        state.stored_permits = if old_max == 0.0 {
            0.0
        } else {
            state.stored_permits * state.max_permits / old_max
        };
        Ok(())
    }

    /// Acquires `permits`, waiting as needed.
    ///
    /// Returns the time spent waiting, `Duration::ZERO` if the permits were
    /// available immediately.
    pub async fn acquire(&self, permits: u32) -> Duration {
        let wait = self.reserve(permits, Instant::now());
        if wait > SLOW_ACQUIRE_THRESHOLD {
            tracing::warn!("rate limiter delaying request by {wait:?}");
        }
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        wait
    }

    /// Acquires `permits`, blocking the calling thread as needed.
    ///
    /// Prefer [acquire][RateLimiter::acquire] in asynchronous code.
    pub fn acquire_blocking(&self, permits: u32) -> Duration {
        let wait = self.reserve(permits, Instant::now());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        wait
    }

    /// Acquires `permits` if they are available without waiting.
    pub fn try_acquire(&self, permits: u32) -> bool {
        self.try_reserve(permits, Duration::ZERO, Instant::now())
            .is_some()
    }

    /// Acquires `permits` if they are available within `timeout`.
    ///
    /// Returns `false` immediately, without waiting, if the permits cannot be
    /// acquired before the timeout expires.
    pub async fn try_acquire_for(&self, permits: u32, timeout: Duration) -> bool {
        match self.try_reserve(permits, timeout, Instant::now()) {
            None => false,
            Some(wait) => {
                if !wait.is_zero() {
                    tokio::time::sleep(wait).await;
                }
                true
            }
        }
    }

    fn reserve(&self, permits: u32, now: Instant) -> Duration {
        let mut state = self.lock();
        let moment = state.reserve_earliest_available(permits, now);
        moment.saturating_duration_since(now)
    }

    fn try_reserve(&self, permits: u32, timeout: Duration, now: Instant) -> Option<Duration> {
        let mut state = self.lock();
        let unavailable = now
            .checked_add(timeout)
            .is_some_and(|deadline| state.next_free > deadline);
        if unavailable {
            return None;
        }
        let moment = state.reserve_earliest_available(permits, now);
        Some(moment.saturating_duration_since(now))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("rate limiter lock is poisoned")
    }
}

impl State {
    // Updates the stored permits based on the current time.
    fn resync(&mut self, now: Instant) {
        if now > self.next_free {
            let idle = (now - self.next_free).as_secs_f64();
            let new_permits = idle / self.stable_interval;
            self.stored_permits = self.max_permits.min(self.stored_permits + new_permits);
            self.next_free = now;
        }
    }

    // Reserves the permits, returns the time when the caller may proceed.
    fn reserve_earliest_available(&mut self, permits: u32, now: Instant) -> Instant {
        self.resync(now);
        let moment = self.next_free;
        let required = permits as f64;
        let from_storage = required.min(self.stored_permits);
        let fresh = required - from_storage;
        let wait = Duration::try_from_secs_f64(fresh * self.stable_interval)
            .map_or(MAX_RESERVATION, |w| w.min(MAX_RESERVATION));
        self.next_free = self.next_free.checked_add(wait).unwrap_or(self.next_free);
        self.stored_permits -= from_storage;
        moment
    }
}

fn validate_rate(permits_per_second: f64) -> Result<(), Error> {
    let valid = permits_per_second.is_finite()
        && permits_per_second > 0.0
        && (1.0 / permits_per_second).is_finite();
    if !valid {
        return Err(Error::InvalidRate(permits_per_second));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0.0)]
    #[test_case(-1.0)]
    #[test_case(f64::NAN)]
    #[test_case(f64::INFINITY)]
    #[test_case(f64::MIN_POSITIVE / 4.0)]
    fn invalid_rate(rate: f64) {
        let r = RateLimiter::new(rate);
        assert!(matches!(r, Err(Error::InvalidRate(_))), "{r:?}");
    }

    #[test_case(-1.0)]
    #[test_case(f64::NAN)]
    fn invalid_burst(burst: f64) {
        let r = RateLimiter::with_burst(10.0, burst);
        assert!(matches!(r, Err(Error::InvalidBurst(_))), "{r:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn first_acquire_is_immediate() -> anyhow::Result<()> {
        let limiter = RateLimiter::new(5.0)?;
        assert_eq!(limiter.acquire(1).await, Duration::ZERO);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn steady_rate() -> anyhow::Result<()> {
        let limiter = RateLimiter::new(5.0)?;
        let start = Instant::now();
        limiter.acquire(1).await;
        for _ in 0..5 {
            let waited = limiter.acquire(1).await;
            assert_eq!(waited, Duration::from_millis(200));
        }
        assert_eq!(start.elapsed(), Duration::from_secs(1));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn burst_after_idle() -> anyhow::Result<()> {
        const RATE: u32 = 10;
        let limiter = RateLimiter::new(RATE as f64)?;
        // Idle for a while, the limiter stores one second worth of permits.
        tokio::time::advance(Duration::from_secs(5)).await;

        // Issuing 2x rate permits takes close to one second, the stored
        // permits are issued immediately.
        let start = Instant::now();
        for _ in 0..(2 * RATE) {
            limiter.acquire(1).await;
        }
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(900), "{elapsed:?}");
        assert!(elapsed <= Duration::from_secs(1), "{elapsed:?}");
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn never_exceeds_rate() -> anyhow::Result<()> {
        const RATE: u32 = 20;
        let limiter = RateLimiter::new(RATE as f64)?;
        let start = Instant::now();
        let mut issued = 0_u32;
        while start.elapsed() < Duration::from_secs(10) {
            limiter.acquire(1).await;
            issued += 1;
        }
        // The first permit is free, the rest are paced at the steady rate.
        assert!(issued <= 10 * RATE + 1, "{issued}");
        assert!(issued >= 10 * RATE, "{issued}");
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn acquire_many() -> anyhow::Result<()> {
        let limiter = RateLimiter::new(2.0)?;
        // Borrowing from the future is immediate, the next caller pays.
        assert_eq!(limiter.acquire(4).await, Duration::ZERO);
        assert_eq!(limiter.acquire(1).await, Duration::from_secs(2));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn try_acquire() -> anyhow::Result<()> {
        let limiter = RateLimiter::new(1.0)?;
        assert!(limiter.try_acquire(1));
        assert!(!limiter.try_acquire(1));
        assert!(!limiter.try_acquire_for(1, Duration::from_millis(500)).await);
        let start = Instant::now();
        assert!(limiter.try_acquire_for(1, Duration::from_secs(1)).await);
        assert_eq!(start.elapsed(), Duration::from_secs(1));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn tiny_rate_caps_the_wait() -> anyhow::Result<()> {
        let limiter = RateLimiter::new(1e-300)?;
        assert!(limiter.try_acquire(1));
        assert!(!limiter.try_acquire(1));
        assert!(!limiter.try_acquire_for(1, Duration::from_secs(3600)).await);
        let waited = limiter.reserve(1, Instant::now());
        assert!(waited <= MAX_RESERVATION, "{waited:?}");
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn set_rate() -> anyhow::Result<()> {
        let limiter = RateLimiter::new(1.0)?;
        assert_eq!(limiter.rate(), 1.0);
        limiter.acquire(1).await;
        limiter.set_rate(10.0)?;
        assert_eq!(limiter.rate(), 10.0);
        // The permit borrowed at the old rate is still paid for.
        assert_eq!(limiter.acquire(1).await, Duration::from_secs(1));
        assert_eq!(limiter.acquire(1).await, Duration::from_millis(100));
        let r = limiter.set_rate(0.0);
        assert!(matches!(r, Err(Error::InvalidRate(_))), "{r:?}");
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn set_rate_rescales_stored_permits() -> anyhow::Result<()> {
        let limiter = RateLimiter::new(10.0)?;
        tokio::time::advance(Duration::from_secs(2)).await;
        // 10 stored permits at 10 qps become 5 stored permits at 5 qps.
        limiter.set_rate(5.0)?;
        for _ in 0..5 {
            assert_eq!(limiter.acquire(1).await, Duration::ZERO);
        }
        assert_eq!(limiter.acquire(1).await, Duration::ZERO);
        assert_eq!(limiter.acquire(1).await, Duration::from_millis(200));
        Ok(())
    }

    #[test]
    fn acquire_blocking() -> anyhow::Result<()> {
        let limiter = RateLimiter::new(100.0)?;
        assert_eq!(limiter.acquire_blocking(1), Duration::ZERO);
        let waited = limiter.acquire_blocking(1);
        assert!(waited <= Duration::from_millis(10), "{waited:?}");
        Ok(())
    }
}
