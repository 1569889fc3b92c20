//! Error handling for the biosense workspace
//!
//! One error enum shared by the core, DSP and runtime crates.

use core::fmt;

/// Result type alias for biosense operations
pub type BioResult<T> = Result<T, BioError>;

/// Error type for all biosense operations
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum BioError {
    /// Invalid buffer geometry (capacity/delay mismatch)
    InvalidBufferConfig {
        /// Description of the configuration error
        reason: String,
    },

    /// Invalid filter parameters (frequency, Q, window size)
    InvalidFilterConfig {
        /// Description of the configuration error
        reason: String,
    },

    /// Invalid sampling rate for the requested signal kind
    InvalidSamplingRate {
        /// Provided sampling rate
        rate: u32,
        /// Valid range description
        valid_range: String,
    },

    /// Acquisition hardware was already claimed by the sampling task
    AcquisitionAlreadyStarted,

    /// Acquisition hardware is missing or misconfigured
    DeviceError {
        /// Device-related error description
        reason: String,
    },

    /// Waveform simulation failure
    SimulationError {
        /// Simulation error description
        reason: String,
    },
}

impl fmt::Display for BioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BioError::InvalidBufferConfig { reason } => {
                write!(f, "Invalid buffer configuration: {}", reason)
            }
            BioError::InvalidFilterConfig { reason } => {
                write!(f, "Invalid filter configuration: {}", reason)
            }
            BioError::InvalidSamplingRate { rate, valid_range } => {
                write!(f, "Invalid sampling rate {}Hz, valid range: {}", rate, valid_range)
            }
            BioError::AcquisitionAlreadyStarted => {
                write!(f, "Acquisition task already started")
            }
            BioError::DeviceError { reason } => {
                write!(f, "Device error: {}", reason)
            }
            BioError::SimulationError { reason } => {
                write!(f, "Simulation error: {}", reason)
            }
        }
    }
}

impl std::error::Error for BioError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = BioError::InvalidSamplingRate {
            rate: 100,
            valid_range: "125-1000Hz".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("100"));
        assert!(display.contains("125-1000Hz"));
    }

    #[test]
    fn test_error_equality() {
        let error1 = BioError::AcquisitionAlreadyStarted;
        let error2 = BioError::AcquisitionAlreadyStarted;
        assert_eq!(error1, error2);
    }
}
