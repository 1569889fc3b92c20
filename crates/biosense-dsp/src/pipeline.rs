//! Per-tick processing pipeline shared by all recording modes
//!
//! `SignalPipeline` owns the rolling sample buffer and the three per-mode
//! filter blocks. The acquisition task calls [`SignalPipeline::tick`] once
//! per sample; accessors read the derived metrics between ticks.

use crate::alpha::AlphaPowerEstimator;
use crate::beat::BeatDetector;
use crate::config::PipelineConfig;
use crate::envelope::{EnvelopeSmoother, PeakTracker};
use biosense_core::{
    BioResult, CircularSampleBuffer, Sample, SignalKind, ADC_MIDPOINT,
};

/// Processing state for one acquisition channel.
///
/// All mutable state lives here as one explicit aggregate; the acquisition
/// task is the only writer and accessor calls run between its yields.
#[derive(Debug, Clone)]
pub struct SignalPipeline {
    config: PipelineConfig,
    buffer: CircularSampleBuffer,
    kind: SignalKind,
    envelope: EnvelopeSmoother,
    peak: PeakTracker,
    beat: BeatDetector,
    alpha: AlphaPowerEstimator,
    ticks: u64,
}

impl SignalPipeline {
    /// Build a pipeline from a validated configuration
    pub fn new(config: PipelineConfig) -> BioResult<Self> {
        config.validate()?;

        let buffer =
            CircularSampleBuffer::new(config.buffer_capacity(), config.read_delay_ticks())?;

        Ok(SignalPipeline {
            buffer,
            kind: SignalKind::Emg,
            envelope: EnvelopeSmoother::new(config.envelope.window),
            peak: PeakTracker::new(&config.envelope),
            beat: BeatDetector::new(&config.beat),
            alpha: AlphaPowerEstimator::new(&config.alpha, &config.notch, config.sample_rate_hz),
            ticks: 0,
            config,
        })
    }

    /// Run one tick of processing: store the sample, then dispatch to the
    /// filter block of the active mode.
    ///
    /// Dispatch is by equality for all three kinds. The reference firmware
    /// ran the EEG branch as an unconditional fallthrough because of an
    /// assignment-as-comparison slip; that behavior is deliberately not
    /// reproduced here.
    pub fn tick(&mut self, sample: Sample, now_ms: u64) {
        self.buffer.write(sample);
        self.ticks += 1;

        match self.kind {
            SignalKind::Emg => self.peak.update(sample),
            SignalKind::Ecg => self.beat.update(sample, now_ms),
            SignalKind::Eeg => self.alpha.update(sample),
        }
    }

    /// Switch recording modes. Mode-specific derived state is reset; the
    /// sample buffer keeps whatever was already written.
    pub fn set_kind(&mut self, kind: SignalKind) {
        if kind != self.kind {
            self.envelope.reset();
            self.peak.reset();
            self.beat.reset();
            self.alpha.reset();
        }
        self.kind = kind;
    }

    /// Active recording mode
    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    /// Instantaneous delayed sample under the read cursor
    pub fn signal(&self) -> Sample {
        self.buffer.current()
    }

    /// Full rolling window in physical storage order (see
    /// [`CircularSampleBuffer::block`] for the ordering caveat)
    pub fn signal_block(&self) -> &[Sample] {
        self.buffer.block()
    }

    /// Most recent `ms` milliseconds of signal in chronological order
    pub fn signal_window(&self, ms: u32) -> Vec<Sample> {
        self.buffer
            .window(ms, self.config.sample_rate_hz, self.config.time_range_ms)
    }

    /// Smoothed rectified muscle activity.
    ///
    /// Rectifies the delayed sample around the ADC midpoint and pushes it
    /// through the moving-average smoother, so each read advances the
    /// smoother by one step. Returns 0 while the smoother warms up.
    pub fn muscle_power(&mut self) -> i32 {
        let rectified = (self.signal() - ADC_MIDPOINT).abs();
        self.envelope.update(rectified as f32) as i32
    }

    /// Peak/decay EMG envelope maintained by the EMG tick branch
    pub fn peak_envelope(&self) -> i32 {
        self.peak.value()
    }

    /// Heart rate in BPM; 0 until enough beats, stale between beats
    pub fn heart_rate(&self) -> i32 {
        self.beat.bpm()
    }

    /// Alpha-band power estimate; 0 while the estimator warms up
    pub fn brain_alpha_power(&self) -> i32 {
        self.alpha.alpha_power()
    }

    /// Total ticks processed since construction
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
