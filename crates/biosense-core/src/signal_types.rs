//! Signal kinds, ADC constants and recording-session metadata

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ADC sample rate in Hz
pub const SAMPLE_RATE_HZ: u32 = 250;

/// Length of the rolling sample window in milliseconds
pub const TIME_RANGE_MS: u32 = 5000;

/// Capacity of the rolling sample buffer
pub const BUFFER_CAPACITY: usize = (SAMPLE_RATE_HZ * (TIME_RANGE_MS / 1000)) as usize;

/// Acquisition-to-consumption latency compensated by the read cursor
pub const READ_DELAY_MS: u32 = 20;

/// Read-cursor skew in ticks, rounded up
pub const READ_DELAY_TICKS: usize = (SAMPLE_RATE_HZ as usize * READ_DELAY_MS as usize).div_ceil(1000);

/// Midpoint of the 10-bit ADC range, treated as signal baseline
pub const ADC_MIDPOINT: i32 = 512;

/// Maximum raw ADC code (10-bit converter)
pub const ADC_MAX: i32 = 1023;

/// One raw ADC reading. 0..=1023 for the 10-bit converter; kept signed so
/// baseline-removed arithmetic never wraps.
pub type Sample = i32;

/// Biosignal recording modes, mutually exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// Electromyography (muscle activity)
    Emg,
    /// Electrocardiography (heart)
    Ecg,
    /// Electroencephalography (brain)
    Eeg,
}

impl SignalKind {
    /// Telemetry label for this signal kind
    pub fn label(&self) -> &'static str {
        match self {
            SignalKind::Emg => "EMG",
            SignalKind::Ecg => "ECG",
            SignalKind::Eeg => "EEG",
        }
    }
}

/// Shape selector for telemetry output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalShape {
    /// Raw delayed sample stream
    Default,
    /// Smoothed muscle-power control stream
    Control,
}

/// Metadata for one recording session, created when a mode is started
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingSession {
    /// Unique identifier for this session
    pub id: Uuid,
    /// Signal kind being recorded
    pub kind: SignalKind,
    /// Monotonic start timestamp in milliseconds
    pub started_at_ms: u64,
}

impl RecordingSession {
    /// Create a new session record
    pub fn new(kind: SignalKind, started_at_ms: u64) -> Self {
        RecordingSession {
            id: Uuid::new_v4(),
            kind,
            started_at_ms,
        }
    }
}

/// Validate a sampling rate for single-channel biosignal capture
pub fn validate_sampling_rate(rate: u32) -> crate::error::BioResult<()> {
    const MIN_RATE: u32 = 125;
    const MAX_RATE: u32 = 1000;

    if !(MIN_RATE..=MAX_RATE).contains(&rate) {
        Err(crate::error::BioError::InvalidSamplingRate {
            rate,
            valid_range: format!("{}-{}Hz", MIN_RATE, MAX_RATE),
        })
    } else {
        Ok(())
    }
}
