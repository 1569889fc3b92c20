//! ECG beat detection and heart-rate estimation

use crate::config::BeatConfig;
use biosense_core::Sample;
use std::collections::VecDeque;

/// Number of beat timestamps retained for the interval average
const HISTORY_LEN: usize = 3;

/// Milliseconds per minute, doubled for the two-interval average
const BPM_NUMERATOR: u64 = 120_000;

/// Threshold-crossing beat detector with debounce.
///
/// A sample-to-sample rise above the jump threshold is a candidate beat edge;
/// edges inside the debounce window are re-triggers on the same QRS complex
/// and are dropped. The detector keeps the last three accepted timestamps and
/// recomputes BPM from the average of the two most recent inter-beat
/// intervals. Between beats the BPM reading is intentionally stale.
#[derive(Debug, Clone)]
pub struct BeatDetector {
    jump_threshold: i32,
    debounce_ms: u64,
    timestamps: VecDeque<u64>,
    last_sample: Sample,
    bpm: i32,
}

impl BeatDetector {
    /// Create a detector from the beat configuration
    pub fn new(config: &BeatConfig) -> Self {
        BeatDetector {
            jump_threshold: config.jump_threshold,
            debounce_ms: config.debounce_ms,
            timestamps: VecDeque::with_capacity(HISTORY_LEN + 1),
            last_sample: 0,
            bpm: 0,
        }
    }

    /// Feed one raw ECG sample with its acquisition timestamp
    pub fn update(&mut self, sample: Sample, now_ms: u64) {
        let delta = sample - self.last_sample;
        self.last_sample = sample;

        if delta <= self.jump_threshold {
            return;
        }

        if let Some(&last) = self.timestamps.back() {
            if now_ms.saturating_sub(last) <= self.debounce_ms {
                return;
            }
        }

        self.timestamps.push_back(now_ms);
        if self.timestamps.len() > HISTORY_LEN {
            self.timestamps.pop_front();
        }

        if self.timestamps.len() == HISTORY_LEN {
            // t2 - t1 + t1 - t0 collapses to the span of the last two intervals
            let span = self.timestamps[2] - self.timestamps[0];
            if span > 0 {
                self.bpm = (BPM_NUMERATOR / span) as i32;
            }
        }
    }

    /// Last computed heart rate in beats per minute; 0 until three beats
    /// have been seen
    pub fn bpm(&self) -> i32 {
        self.bpm
    }

    /// Number of beat timestamps currently held
    pub fn beats_seen(&self) -> usize {
        self.timestamps.len()
    }

    /// Drop all beat history and the cached BPM
    pub fn reset(&mut self) {
        self.timestamps.clear();
        self.last_sample = 0;
        self.bpm = 0;
    }
}
