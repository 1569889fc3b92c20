//! EMG envelope filters: moving-average smoother and peak/decay tracker

use crate::config::EnvelopeConfig;
use biosense_core::Sample;
use std::collections::VecDeque;

/// Periodically rebuild the running sum from the queue so floating-point
/// drift stays bounded over unbounded runtimes.
const SUM_RESYNC_INTERVAL: u64 = 4096;

/// Sliding-window moving-average filter with O(1) amortized updates.
///
/// While the window is still filling, `update` returns 0 (warming up). Once
/// full, each update evicts the oldest element and returns the window mean.
#[derive(Debug, Clone)]
pub struct EnvelopeSmoother {
    window: usize,
    queue: VecDeque<f32>,
    sum: f32,
    updates: u64,
}

impl EnvelopeSmoother {
    /// Create a smoother with the given window length
    pub fn new(window: usize) -> Self {
        EnvelopeSmoother {
            window,
            queue: VecDeque::with_capacity(window),
            sum: 0.0,
            updates: 0,
        }
    }

    /// Push one rectified sample and return the smoothed value.
    ///
    /// A NaN input short-circuits to 0 without touching the queue or the
    /// running sum, so one bad acquisition reading cannot poison the filter.
    pub fn update(&mut self, x: f32) -> f32 {
        if x.is_nan() {
            return 0.0;
        }

        if self.queue.len() < self.window {
            self.queue.push_back(x);
            self.sum += x;
            return 0.0;
        }

        let old = self.queue.pop_front().unwrap_or(0.0);
        self.queue.push_back(x);
        self.sum += x - old;

        self.updates += 1;
        if self.updates % SUM_RESYNC_INTERVAL == 0 {
            self.sum = self.queue.iter().sum();
        }

        self.sum / self.window as f32
    }

    /// True once the window is full and outputs are valid
    pub fn is_warmed_up(&self) -> bool {
        self.queue.len() >= self.window
    }

    /// Clear all accumulated state
    pub fn reset(&mut self) {
        self.queue.clear();
        self.sum = 0.0;
        self.updates = 0;
    }
}

/// Noise-floor-lifted peak tracker with linear decay, updated once per tick
/// in EMG mode. Tracks the recent activity peak and bleeds it off at a fixed
/// rate, clamped at zero.
#[derive(Debug, Clone)]
pub struct PeakTracker {
    noise_floor: i32,
    decay: i32,
    value: i32,
}

impl PeakTracker {
    /// Create a tracker from the envelope configuration
    pub fn new(config: &EnvelopeConfig) -> Self {
        PeakTracker {
            noise_floor: config.noise_floor,
            decay: config.decay,
            value: 0,
        }
    }

    /// Feed one raw sample
    pub fn update(&mut self, sample: Sample) {
        let lifted = sample - self.noise_floor;
        if lifted > self.value {
            self.value = lifted;
        }
        self.value = (self.value - self.decay).max(0);
    }

    /// Current peak envelope value
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Clear the tracked peak
    pub fn reset(&mut self) {
        self.value = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warm_up_returns_zero() {
        let mut smoother = EnvelopeSmoother::new(20);
        for i in 0..19 {
            assert_eq!(smoother.update(i as f32), 0.0);
            assert!(!smoother.is_warmed_up());
        }
        // 20th update fills the window but still returns 0; the 21st is live
        assert_eq!(smoother.update(19.0), 0.0);
        assert!(smoother.is_warmed_up());
        assert!(smoother.update(20.0) > 0.0);
    }

    #[test]
    fn test_matches_brute_force_window_mean() {
        let window = 20;
        let mut smoother = EnvelopeSmoother::new(window);

        // Deterministic pseudo-random sequence
        let mut seed = 0x2545_f491u64;
        let inputs: Vec<f32> = (0..500)
            .map(|_| {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                ((seed >> 33) % 1024) as f32
            })
            .collect();

        for (i, &x) in inputs.iter().enumerate() {
            let out = smoother.update(x);
            if i >= window {
                let brute: f32 = inputs[i + 1 - window..=i].iter().sum::<f32>() / window as f32;
                assert!(
                    (out - brute).abs() < 1e-3,
                    "mismatch at {}: {} vs {}",
                    i,
                    out,
                    brute
                );
            }
        }
    }

    #[test]
    fn test_nan_is_absorbed_without_mutation() {
        let mut smoother = EnvelopeSmoother::new(4);
        for x in [1.0, 2.0, 3.0, 4.0] {
            smoother.update(x);
        }
        let before = smoother.update(5.0);

        assert_eq!(smoother.update(f32::NAN), 0.0);
        // State unchanged: the same input yields the same rolling output as
        // if the NaN had never arrived
        let mut twin = EnvelopeSmoother::new(4);
        for x in [1.0, 2.0, 3.0, 4.0, 5.0] {
            twin.update(x);
        }
        assert_eq!(smoother.update(6.0), twin.update(6.0));
        assert!(before > 0.0);
    }

    #[test]
    fn test_peak_tracker_decay() {
        let config = EnvelopeConfig {
            window: 20,
            noise_floor: 580,
            decay: 2,
        };
        let mut tracker = PeakTracker::new(&config);

        tracker.update(680); // lifted to 100, decayed to 98
        assert_eq!(tracker.value(), 98);

        tracker.update(0); // below floor, decays further
        assert_eq!(tracker.value(), 96);

        for _ in 0..100 {
            tracker.update(0);
        }
        assert_eq!(tracker.value(), 0); // clamped, never negative
    }
}
