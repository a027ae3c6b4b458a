//! Adaptive burst sizing and wall-clock pacing.
//!
//! All counters live in a [`BurstControl`] owned by one CPU, so several
//! cores in the same process tune themselves independently. Wall-clock time
//! comes from a [`Clock`], which tests replace with a [`ManualClock`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::Config;

/// Source of elapsed time, and a way to wait.
pub trait Clock {
    /// Time since some fixed origin.
    fn now(&self) -> Duration;

    fn sleep(&self, duration: Duration);
}

/// The real wall clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// A clock that only moves when told to, or when slept on.
///
/// Clones share the same time, so a test can keep one and hand another to
/// the CPU.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.fetch_add(nanos, Ordering::SeqCst);
    }

    /// Total time slept or advanced so far.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Burst sizes and the current pacing delay.
#[derive(Debug, Clone, PartialEq)]
pub struct BurstControl {
    /// Inner bursts per `burst_run()`.
    pub outer_burst_op_count: u64,
    /// Instructions per inner burst.
    pub inner_burst_op_count: u64,
    pub min_burst_count: u64,
    pub max_burst_count: u64,
    pub max_delay: Duration,
    /// Sleep applied after the most recent paced burst.
    pub delay: Duration,
}

impl Default for BurstControl {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl BurstControl {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            outer_burst_op_count: config.startup_burst_count,
            inner_burst_op_count: config.inner_burst_op_count,
            min_burst_count: config.min_burst_count,
            max_burst_count: config.max_burst_count,
            max_delay: config.max_delay(),
            delay: Duration::ZERO,
        }
    }

    /// Steer `burst_count` so a run takes `target` seconds instead of
    /// `current`.
    ///
    /// The scaled count (plus one, so it never reaches zero) is averaged
    /// with the old count and clamped to the configured range. A zero
    /// measurement doubles the count.
    #[must_use]
    pub fn calc_new_count(&self, burst_count: u64, current: f64, target: f64) -> u64 {
        if current <= 0.0 {
            return burst_count.saturating_mul(2).min(self.max_burst_count);
        }
        let scaled = burst_count as f64 / current * target + 1.0;
        if scaled > self.max_burst_count as f64 {
            return self.max_burst_count;
        }
        let averaged = (burst_count as f64 + scaled) / 2.0;
        if averaged < self.min_burst_count as f64 {
            self.min_burst_count
        } else {
            averaged as u64
        }
    }

    /// Sleep needed after a burst of `cycles` that took `duration` seconds
    /// so the average rate comes down to `target_cycles_per_sec`.
    ///
    /// Returns `None` when the burst was already at or below the target
    /// rate, or took no measurable time. Never exceeds `max_delay`.
    #[must_use]
    pub fn pacing_delay(
        &self,
        cycles: u64,
        duration: f64,
        target_cycles_per_sec: f64,
    ) -> Option<Duration> {
        if duration <= 0.0 || target_cycles_per_sec <= 0.0 {
            return None;
        }
        let achieved = cycles as f64 / duration;
        let target_duration = achieved / target_cycles_per_sec * duration;
        let delay = target_duration - duration;
        if delay > 0.0 {
            let delay = Duration::try_from_secs_f64(delay).unwrap_or(self.max_delay);
            Some(delay.min(self.max_delay))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn burst_count_tracks_target_duration() {
        let burst = BurstControl::default();
        assert_eq!(burst.calc_new_count(100, 30.0, 30.0), 100);
        assert_eq!(burst.calc_new_count(100, 40.0, 20.0), 75);
        assert_eq!(burst.calc_new_count(100, 20.0, 40.0), 150);
    }

    #[test]
    fn burst_count_is_clamped() {
        let burst = BurstControl::default();
        assert_eq!(burst.calc_new_count(100, 1.0, 1000.0), 10_000);
        assert_eq!(burst.calc_new_count(10, 1000.0, 1.0), 10);
        assert_eq!(burst.calc_new_count(100, 0.0, 0.1), 200);
        assert_eq!(burst.calc_new_count(9_000, 0.0, 0.1), 10_000);
    }

    #[test]
    fn no_delay_when_running_slow() {
        let burst = BurstControl::default();
        // 1000 cycles in 1s against a 2000 cycles/s target
        assert_eq!(burst.pacing_delay(1000, 1.0, 2000.0), None);
        assert_eq!(burst.pacing_delay(1000, 0.0, 2000.0), None);
    }

    #[test]
    fn delay_slows_a_fast_burst() {
        let burst = BurstControl {
            max_delay: Duration::from_secs(10),
            ..BurstControl::default()
        };
        // Twice as fast as wanted: sleep as long again.
        let delay = burst.pacing_delay(2000, 0.5, 2000.0).unwrap();
        assert!((delay.as_secs_f64() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let clock = ManualClock::new();
        let other = clock.clone();
        other.sleep(Duration::from_millis(3));
        clock.advance(Duration::from_millis(2));
        assert_eq!(other.now(), Duration::from_millis(5));
    }

    proptest! {
        #[test]
        fn delay_never_exceeds_the_cap(
            cycles in 1u64..10_000_000,
            duration in 0.000_001f64..10.0,
            target in 1.0f64..1e7,
        ) {
            let burst = BurstControl::default();
            if let Some(delay) = burst.pacing_delay(cycles, duration, target) {
                prop_assert!(delay <= burst.max_delay);
            }
            if (cycles as f64 / duration) < target {
                prop_assert_eq!(burst.pacing_delay(cycles, duration, target), None);
            }
        }
    }
}
