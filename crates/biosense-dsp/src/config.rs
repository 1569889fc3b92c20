//! Configuration for the processing pipeline
//!
//! Serde-backed parameter blocks with defaults matching the shipped device
//! tuning: 250Hz acquisition, 20-sample envelope window, 10Hz notch at Q=1,
//! 40-count ECG jump threshold with 300ms debounce.

use biosense_core::{validate_sampling_rate, BioError, BioResult};
use serde::{Deserialize, Serialize};

/// Moving-average envelope parameters (EMG)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnvelopeConfig {
    /// Sliding window length in samples
    pub window: usize,
    /// Raw ADC counts treated as the EMG noise floor by the peak tracker
    pub noise_floor: i32,
    /// Linear decay applied to the peak envelope per tick
    pub decay: i32,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            window: 20,
            noise_floor: 580,
            decay: 2,
        }
    }
}

/// Notch filter parameters (EEG)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NotchConfig {
    /// Center frequency to reject in Hz
    pub center_hz: f32,
    /// Quality factor controlling the notch width
    pub q: f32,
}

impl Default for NotchConfig {
    fn default() -> Self {
        Self {
            center_hz: 10.0,
            q: 1.0,
        }
    }
}

/// Alpha-power estimator parameters (EEG)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AlphaConfig {
    /// EWMA decay applied to the previous power estimate
    pub decay: f32,
    /// Fixed calibration offset subtracted from the band-power difference
    pub baseline: f32,
}

impl Default for AlphaConfig {
    fn default() -> Self {
        Self {
            decay: 0.99,
            baseline: 20.0,
        }
    }
}

/// Beat detector parameters (ECG)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BeatConfig {
    /// Minimum sample-to-sample rise that counts as a candidate beat edge
    pub jump_threshold: i32,
    /// Refractory window rejecting re-triggers on the same QRS complex
    pub debounce_ms: u64,
}

impl Default for BeatConfig {
    fn default() -> Self {
        Self {
            jump_threshold: 40,
            debounce_ms: 300,
        }
    }
}

/// Full pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// ADC sample rate in Hz
    pub sample_rate_hz: u32,
    /// Rolling window length in milliseconds
    pub time_range_ms: u32,
    /// Read-cursor delay in milliseconds
    pub read_delay_ms: u32,
    /// Envelope parameters
    pub envelope: EnvelopeConfig,
    /// Notch parameters
    pub notch: NotchConfig,
    /// Alpha estimator parameters
    pub alpha: AlphaConfig,
    /// Beat detector parameters
    pub beat: BeatConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: biosense_core::SAMPLE_RATE_HZ,
            time_range_ms: biosense_core::TIME_RANGE_MS,
            read_delay_ms: biosense_core::READ_DELAY_MS,
            envelope: EnvelopeConfig::default(),
            notch: NotchConfig::default(),
            alpha: AlphaConfig::default(),
            beat: BeatConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Buffer capacity implied by the sample rate and window length
    pub fn buffer_capacity(&self) -> usize {
        (self.sample_rate_hz as usize * self.time_range_ms as usize) / 1000
    }

    /// Read-cursor skew in ticks, rounded up
    pub fn read_delay_ticks(&self) -> usize {
        (self.sample_rate_hz as usize * self.read_delay_ms as usize).div_ceil(1000)
    }

    /// Validate the configuration before building a pipeline from it
    pub fn validate(&self) -> BioResult<()> {
        validate_sampling_rate(self.sample_rate_hz)?;

        if self.envelope.window == 0 {
            return Err(BioError::InvalidFilterConfig {
                reason: "envelope window must be non-zero".to_string(),
            });
        }
        if self.notch.center_hz <= 0.0 || self.notch.center_hz >= self.sample_rate_hz as f32 / 2.0 {
            return Err(BioError::InvalidFilterConfig {
                reason: format!(
                    "notch center {}Hz must sit below the Nyquist frequency",
                    self.notch.center_hz
                ),
            });
        }
        if self.notch.q <= 0.0 {
            return Err(BioError::InvalidFilterConfig {
                reason: "notch quality factor must be positive".to_string(),
            });
        }
        if !(0.0..1.0).contains(&self.alpha.decay) {
            return Err(BioError::InvalidFilterConfig {
                reason: "alpha decay must lie in [0, 1)".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.buffer_capacity(), 1250);
        assert_eq!(config.read_delay_ticks(), 5);
    }

    #[test]
    fn test_rejects_bad_notch() {
        let mut config = PipelineConfig::default();
        config.notch.center_hz = 200.0; // beyond Nyquist at 250Hz
        assert!(config.validate().is_err());

        config.notch.center_hz = 10.0;
        config.notch.q = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.envelope.window, config.envelope.window);
        assert_eq!(restored.beat.debounce_ms, config.beat.debounce_ms);
    }
}
