//! Waveform simulator producing plausible 10-bit biosignal ADC codes

use crate::hal::AdcSource;
use biosense_core::{BioError, BioResult, Sample, SignalKind, ADC_MAX, ADC_MIDPOINT};
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Configuration for the waveform simulator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Signal kind to synthesize
    pub kind: SignalKind,
    /// Sample rate the caller will poll at, in Hz
    pub sample_rate_hz: u32,
    /// Gaussian noise standard deviation in ADC counts
    pub noise_std: f32,
    /// EMG burst cycle: seconds of activity followed by seconds of rest
    pub emg_burst_s: f32,
    /// ECG beat rate used to place QRS spikes, in beats per minute
    pub ecg_bpm: f32,
    /// EEG alpha oscillation amplitude in ADC counts
    pub eeg_alpha_amplitude: f32,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            kind: SignalKind::Emg,
            sample_rate_hz: biosense_core::SAMPLE_RATE_HZ,
            noise_std: 4.0,
            emg_burst_s: 1.0,
            ecg_bpm: 75.0,
            eeg_alpha_amplitude: 120.0,
            seed: None,
        }
    }
}

impl SimulatorConfig {
    /// Preset for a given signal kind with the default tuning
    pub fn for_kind(kind: SignalKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

/// Deterministic waveform generator implementing [`AdcSource`].
///
/// Each `read_sample` call advances simulated time by one sample period, so
/// the output is independent of the caller's real-time jitter.
pub struct BioSimulator {
    config: SimulatorConfig,
    rng: rand::rngs::StdRng,
    noise: Normal<f32>,
    tick: u64,
}

impl BioSimulator {
    /// Create a simulator; falls back to an entropy seed when none is given
    pub fn new(config: SimulatorConfig) -> BioResult<Self> {
        biosense_core::validate_sampling_rate(config.sample_rate_hz)?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let noise = Normal::new(0.0, config.noise_std.max(f32::EPSILON)).map_err(|e| {
            BioError::SimulationError {
                reason: format!("failed to create noise distribution: {}", e),
            }
        })?;

        Ok(BioSimulator {
            config,
            rng: rand::rngs::StdRng::seed_from_u64(seed),
            noise,
            tick: 0,
        })
    }

    /// Current configuration
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    fn emg_sample(&mut self, t: f32) -> f32 {
        // Alternating burst/rest cycle with broadband activity in the burst
        let cycle = 2.0 * self.config.emg_burst_s;
        let active = (t % cycle) < self.config.emg_burst_s;
        let activation = if active { 0.8 } else { 0.05 };

        let mut v = 0.0;
        for (freq, weight) in [(80.0, 1.0), (160.0, 0.3), (240.0, 0.1)] {
            v += weight * (2.0 * PI * freq * t).sin();
        }
        v += self.rng.gen_range(-0.4..0.4);

        activation * 180.0 * v
    }

    fn ecg_sample(&mut self, t: f32) -> f32 {
        // Sharp QRS spike at each beat instant, flat baseline elsewhere
        let beat_period = 60.0 / self.config.ecg_bpm;
        let phase = t % beat_period;
        let spike_width = 2.0 / self.config.sample_rate_hz as f32;

        if phase < spike_width {
            300.0
        } else if phase < 4.0 * spike_width {
            -60.0
        } else {
            0.0
        }
    }

    fn eeg_sample(&mut self, t: f32) -> f32 {
        // Dominant alpha oscillation over low-level broadband background
        self.config.eeg_alpha_amplitude * (2.0 * PI * 10.0 * t).sin()
            + 10.0 * (2.0 * PI * 4.0 * t).sin()
    }
}

impl AdcSource for BioSimulator {
    fn read_sample(&mut self) -> Sample {
        let t = self.tick as f32 / self.config.sample_rate_hz as f32;
        self.tick += 1;

        let deflection = match self.config.kind {
            SignalKind::Emg => self.emg_sample(t),
            SignalKind::Ecg => self.ecg_sample(t),
            SignalKind::Eeg => self.eeg_sample(t),
        };

        let noisy = ADC_MIDPOINT as f32 + deflection + self.noise.sample(&mut self.rng);
        (noisy as Sample).clamp(0, ADC_MAX)
    }
}
