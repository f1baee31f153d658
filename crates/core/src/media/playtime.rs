//! RTP timestamp → presentation timestamp conversion.
//!
//! RTP timestamps jump when a source restarts or seeks, and a raw delta
//! across such a jump is meaningless. [`PlaytimeEstimator`] accumulates
//! forward deltas as play time and, on a backward jump, advances by the
//! dominant inter-frame interval observed so far instead.
//!
//! The result is scaled like an MPEG-TS PTS: 27 MHz reference divided by
//! 300, wrapped to 33 bits.

use std::collections::BTreeMap;

use super::VIDEO_CLOCK_RATE;

/// Observations between two recalibrations of the interval estimate.
pub const RECALIBRATION_WINDOW: u32 = 20;

const PTS_WRAP: u64 = 1 << 33;

/// Converts 90 kHz RTP timestamps into a monotonic 33-bit PTS.
///
/// Play time is accumulated in 90 kHz ticks, so
/// `floor(27_000_000 * seconds / 300)` is exactly the tick count.
#[derive(Debug, Default)]
pub struct PlaytimeEstimator {
    /// 0 until the first timestamp arrives.
    previous: u32,
    elapsed_ticks: u64,
    interval: u32,
    /// Keyed by interval, ordered so recalibration scans deterministically.
    histogram: BTreeMap<u32, u32>,
    observations: u32,
}

impl PlaytimeEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a known frame interval (e.g. 3600 for 25 fps), used for
    /// backward jumps until the first recalibration.
    pub fn with_interval(interval: u32) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    /// Current estimate of the typical timestamp step.
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Accumulated play time in 90 kHz ticks (unwrapped).
    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ticks as f64 / VIDEO_CLOCK_RATE as f64
    }

    /// Feed the next RTP timestamp and return the 33-bit wrapped PTS.
    pub fn estimate(&mut self, timestamp: u32) -> i64 {
        if self.previous == 0 {
            // first sample is the baseline
        } else if timestamp < self.previous {
            tracing::debug!(
                previous = self.previous,
                timestamp,
                interval = self.interval,
                "RTP timestamp jumped backward"
            );
            self.elapsed_ticks += self.interval as u64;
        } else if timestamp > self.previous {
            let delta = timestamp - self.previous;
            *self.histogram.entry(delta).or_default() += 1;
            self.observations += 1;
            if self.observations >= RECALIBRATION_WINDOW {
                self.recalibrate();
            }
            self.elapsed_ticks += delta as u64;
        }
        self.previous = timestamp;

        (self.elapsed_ticks % PTS_WRAP) as i64
    }

    /// Adopt the most frequent interval of the window.
    ///
    /// Ties keep the current estimate while it is still in the window.
    /// Otherwise the first interval in scan order wins unless a later one
    /// is strictly more frequent.
    fn recalibrate(&mut self) {
        let mut best = self.interval;
        for (&interval, &count) in &self.histogram {
            if !self.histogram.contains_key(&best) {
                best = interval;
            }
            if count > self.histogram.get(&best).copied().unwrap_or_default() {
                best = interval;
            }
        }

        if best != self.interval {
            tracing::debug!(from = self.interval, to = best, "RTP interval recalibrated");
        }
        self.interval = best;
        self.histogram.clear();
        self.observations = 0;
    }
}
