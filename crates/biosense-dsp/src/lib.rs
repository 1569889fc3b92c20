//! Biosense-DSP: Online filters and per-tick orchestration
//!
//! Streaming filters for the three recording modes (envelope smoothing for
//! EMG, beat detection for ECG, notch-based alpha power for EEG) and the
//! pipeline state that runs one tick of processing per acquired sample.

pub mod alpha;
pub mod beat;
pub mod config;
pub mod envelope;
pub mod notch;
pub mod pipeline;

pub use alpha::AlphaPowerEstimator;
pub use beat::BeatDetector;
pub use config::{
    AlphaConfig, BeatConfig, EnvelopeConfig, NotchConfig, PipelineConfig,
};
pub use envelope::{EnvelopeSmoother, PeakTracker};
pub use notch::NotchFilter;
pub use pipeline::SignalPipeline;
