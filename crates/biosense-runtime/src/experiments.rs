//! Experiment helpers built on the smoothed muscle-power metric
//!
//! Duration-bounded busy-poll loops that yield once per iteration, so the
//! sampling task keeps running underneath them. Negative durations or
//! thresholds are invalid inputs and return `None` rather than failing.

use crate::monitor::SignalMonitor;
use biosense_core::SignalShape;
use std::time::Duration;
use tokio::task::yield_now;
use tokio::time::sleep;

/// Muscle-power level that counts as a spike
const SPIKE_THRESHOLD: i32 = 25;

/// Settling pause before spike counting, to skip the turn-on transient
const SPIKES_SETTLE_MS: u64 = 50;

/// Settling pause before the reaction-time measurement
const REACTION_SETTLE_MS: u64 = 10;

/// Hard ceiling on a reaction-time measurement
const REACTION_LIMIT_MS: u64 = 10_000;

/// Returned by [`SignalMonitor::spikes`] when the signal never dropped back
/// below the threshold: the subject held the contraction for the whole window
pub const HOLDING_SENTINEL: i64 = -1;

impl SignalMonitor {
    /// Peak muscle power observed over `duration_ms`, scaled by `multiplier`.
    ///
    /// Returns `None` for negative arguments.
    pub async fn max_signal(&self, duration_ms: i64, multiplier: i64) -> Option<i64> {
        if duration_ms < 0 || multiplier < 0 {
            return None;
        }

        let clock = self.clock();
        let start = clock.now_millis();
        let mut max_value = 0i64;

        while clock.now_millis().saturating_sub(start) < duration_ms as u64 {
            let value = self.muscle_power().await as i64;
            if value > max_value {
                max_value = value;
            }
            yield_now().await;
        }

        Some(max_value * multiplier)
    }

    /// Count of spikes (threshold crossings) over `duration_ms`.
    ///
    /// A crossing is counted when the signal rises above the threshold and
    /// later drops back below it. If the signal is still above the threshold
    /// when the window ends, the subject is holding and [`HOLDING_SENTINEL`]
    /// is returned instead of a count. `None` for a negative duration.
    pub async fn spikes(&self, duration_ms: i64) -> Option<i64> {
        sleep(Duration::from_millis(SPIKES_SETTLE_MS)).await;

        if duration_ms < 0 {
            return None;
        }
        let duration = duration_ms as u64;

        let clock = self.clock();
        let start = clock.now_millis();
        let mut counter = 0i64;
        let mut crossed = false;

        while clock.now_millis().saturating_sub(start) < duration {
            let mut level = self.muscle_power().await;

            while level > SPIKE_THRESHOLD {
                if clock.now_millis().saturating_sub(start) > duration {
                    return Some(HOLDING_SENTINEL);
                }
                level = self.muscle_power().await;
                crossed = true;
                yield_now().await;
            }

            // One count per excursion above the threshold
            if crossed {
                counter += 1;
                crossed = false;
            }

            yield_now().await;
        }

        Some(counter)
    }

    /// Milliseconds until muscle power first reaches `threshold`, capped at
    /// 10000ms. `None` for a negative threshold.
    pub async fn reaction_time(&self, threshold: i32) -> Option<u64> {
        sleep(Duration::from_millis(REACTION_SETTLE_MS)).await;

        if threshold < 0 {
            return None;
        }

        let clock = self.clock();
        let start = clock.now_millis();

        let mut level = self.muscle_power().await;
        while level < threshold {
            level = self.muscle_power().await;
            let elapsed = clock.now_millis().saturating_sub(start);
            if elapsed > REACTION_LIMIT_MS {
                return Some(REACTION_LIMIT_MS);
            }
            yield_now().await;
        }

        Some(clock.now_millis().saturating_sub(start))
    }

    /// Stream telemetry lines: the raw delayed signal for
    /// [`SignalShape::Default`], the smoothed muscle power for
    /// [`SignalShape::Control`].
    ///
    /// A zero duration streams forever; otherwise the loop stops after
    /// `duration_ms` and the line count is shown on the device readout.
    pub async fn print(&self, shape: SignalShape, duration_ms: u64) {
        let label = self.pipeline().lock().await.kind().label();
        let telemetry = self.telemetry();

        if duration_ms == 0 {
            loop {
                let value = self.print_value(shape).await;
                telemetry.lock().await.emit(label, value);
                yield_now().await;
            }
        }

        let clock = self.clock();
        let start = clock.now_millis();
        let mut line_count = 0i32;

        while clock.now_millis().saturating_sub(start) < duration_ms {
            let value = self.print_value(shape).await;
            telemetry.lock().await.emit(label, value);
            if shape == SignalShape::Default {
                line_count += 1;
            }
            yield_now().await;
        }

        telemetry.lock().await.show_number(line_count);
    }

    async fn print_value(&self, shape: SignalShape) -> i32 {
        match shape {
            SignalShape::Control => self.muscle_power().await,
            SignalShape::Default => self.signal().await,
        }
    }
}
