//! Signal monitor: recording modes and the perpetual sampling task

use crate::hal::{AdcSource, Clock, DigitalOut, OutputPin, TelemetrySink};
use biosense_core::{BioError, BioResult, RecordingSession, Sample, SignalKind};
use biosense_dsp::{PipelineConfig, SignalPipeline};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;

/// Owns the shared processing pipeline and the acquisition hardware, and
/// runs the sampling loop as one perpetual background task.
///
/// Starting any recording mode sets the mode, drives the two channel-select
/// outputs, and lazily spawns the sampling task exactly once; later start
/// calls only switch modes. The task never exits — the loop runs until the
/// process is torn down, which is the intended lifecycle.
pub struct SignalMonitor {
    pipeline: Arc<Mutex<SignalPipeline>>,
    clock: Arc<dyn Clock>,
    outputs: Arc<Mutex<Box<dyn DigitalOut>>>,
    telemetry: Arc<Mutex<Box<dyn TelemetrySink>>>,
    adc: Option<Box<dyn AdcSource>>,
    session: Option<RecordingSession>,
    sample_rate_hz: u32,
    loop_started: bool,
}

impl SignalMonitor {
    /// Assemble a monitor from its hardware interfaces
    pub fn new(
        config: PipelineConfig,
        adc: Box<dyn AdcSource>,
        clock: Arc<dyn Clock>,
        outputs: Box<dyn DigitalOut>,
        telemetry: Box<dyn TelemetrySink>,
    ) -> BioResult<Self> {
        let sample_rate_hz = config.sample_rate_hz;
        let pipeline = SignalPipeline::new(config)?;

        Ok(SignalMonitor {
            pipeline: Arc::new(Mutex::new(pipeline)),
            clock,
            outputs: Arc::new(Mutex::new(outputs)),
            telemetry: Arc::new(Mutex::new(telemetry)),
            adc: Some(adc),
            session: None,
            sample_rate_hz,
            loop_started: false,
        })
    }

    /// Start recording EMG
    pub async fn start_muscle_recording(&mut self) -> BioResult<RecordingSession> {
        self.begin(SignalKind::Emg, true, true).await
    }

    /// Start recording ECG
    pub async fn start_heart_recording(&mut self) -> BioResult<RecordingSession> {
        self.begin(SignalKind::Ecg, false, true).await
    }

    /// Start recording EEG
    pub async fn start_brain_recording(&mut self) -> BioResult<RecordingSession> {
        self.begin(SignalKind::Eeg, false, false).await
    }

    async fn begin(
        &mut self,
        kind: SignalKind,
        channel_a: bool,
        channel_b: bool,
    ) -> BioResult<RecordingSession> {
        {
            let mut outputs = self.outputs.lock().await;
            outputs.set(OutputPin::ChannelSelectA, channel_a);
            outputs.set(OutputPin::ChannelSelectB, channel_b);
        }

        self.pipeline.lock().await.set_kind(kind);

        if !self.loop_started {
            self.spawn_sampling_task()?;
            self.loop_started = true;
        }

        let session = RecordingSession::new(kind, self.clock.now_millis());
        tracing::info!(
            kind = kind.label(),
            session = %session.id,
            "recording started"
        );
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Spawn the perpetual acquisition loop. Claims the ADC; called at most
    /// once over the life of the monitor.
    fn spawn_sampling_task(&mut self) -> BioResult<()> {
        let mut adc = self
            .adc
            .take()
            .ok_or(BioError::AcquisitionAlreadyStarted)?;
        let pipeline = Arc::clone(&self.pipeline);
        let outputs = Arc::clone(&self.outputs);
        let clock = Arc::clone(&self.clock);

        let period = Duration::from_micros(1_000_000 / self.sample_rate_hz as u64);
        tracing::debug!(period_us = period.as_micros() as u64, "sampling task spawned");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // Jitter is tolerated; never try to catch up on missed ticks
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                outputs.lock().await.set(OutputPin::Diagnostic, true);

                let sample = adc.read_sample();
                let now_ms = clock.now_millis();
                pipeline.lock().await.tick(sample, now_ms);

                outputs.lock().await.set(OutputPin::Diagnostic, false);

                tokio::task::yield_now().await;
            }
        });

        Ok(())
    }

    /// Instantaneous delayed sample
    pub async fn signal(&self) -> Sample {
        self.pipeline.lock().await.signal()
    }

    /// Full rolling window in physical storage order, not time order
    pub async fn signal_block(&self) -> Vec<Sample> {
        self.pipeline.lock().await.signal_block().to_vec()
    }

    /// Most recent `ms` milliseconds of signal in chronological order
    pub async fn signal_window(&self, ms: u32) -> Vec<Sample> {
        self.pipeline.lock().await.signal_window(ms)
    }

    /// Smoothed rectified muscle activity (advances the envelope smoother)
    pub async fn muscle_power(&self) -> i32 {
        self.pipeline.lock().await.muscle_power()
    }

    /// Peak/decay EMG envelope maintained by the acquisition tick
    pub async fn peak_envelope(&self) -> i32 {
        self.pipeline.lock().await.peak_envelope()
    }

    /// Heart rate in BPM; 0 until three beats have been seen
    pub async fn heart_rate(&self) -> i32 {
        self.pipeline.lock().await.heart_rate()
    }

    /// Alpha-band power estimate
    pub async fn brain_alpha_power(&self) -> i32 {
        self.pipeline.lock().await.brain_alpha_power()
    }

    /// Metadata for the current recording, if one was started
    pub fn session(&self) -> Option<&RecordingSession> {
        self.session.as_ref()
    }

    /// Monotonic clock shared with the sampling task
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Handle to the shared pipeline, for consumers that need more than the
    /// metric accessors
    pub fn pipeline(&self) -> Arc<Mutex<SignalPipeline>> {
        Arc::clone(&self.pipeline)
    }

    pub(crate) fn telemetry(&self) -> Arc<Mutex<Box<dyn TelemetrySink>>> {
        Arc::clone(&self.telemetry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{NullOutputs, SystemClock};
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use tokio::time::sleep;

    /// ADC double returning a constant code
    struct ConstAdc(Sample);

    impl AdcSource for ConstAdc {
        fn read_sample(&mut self) -> Sample {
            self.0
        }
    }

    /// Output double recording the last level seen per pin
    #[derive(Clone, Default)]
    struct RecordingOutputs {
        levels: Arc<StdMutex<HashMap<OutputPin, bool>>>,
    }

    impl DigitalOut for RecordingOutputs {
        fn set(&mut self, pin: OutputPin, level: bool) {
            self.levels.lock().unwrap().insert(pin, level);
        }
    }

    /// Telemetry double that swallows output
    struct NullTelemetry;

    impl TelemetrySink for NullTelemetry {
        fn emit(&mut self, _label: &str, _value: i32) {}
        fn show_number(&mut self, _value: i32) {}
    }

    fn monitor_with(adc: Box<dyn AdcSource>, outputs: Box<dyn DigitalOut>) -> SignalMonitor {
        SignalMonitor::new(
            PipelineConfig::default(),
            adc,
            Arc::new(SystemClock::new()),
            outputs,
            Box::new(NullTelemetry),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_start_drives_channel_select_outputs() {
        let outputs = RecordingOutputs::default();
        let levels = Arc::clone(&outputs.levels);
        let mut monitor = monitor_with(Box::new(ConstAdc(512)), Box::new(outputs));

        monitor.start_heart_recording().await.unwrap();

        let snapshot = levels.lock().unwrap().clone();
        assert_eq!(snapshot.get(&OutputPin::ChannelSelectA), Some(&false));
        assert_eq!(snapshot.get(&OutputPin::ChannelSelectB), Some(&true));
    }

    #[tokio::test]
    async fn test_sampling_loop_fills_buffer() {
        let mut monitor = monitor_with(Box::new(ConstAdc(700)), Box::new(NullOutputs));
        monitor.start_muscle_recording().await.unwrap();

        sleep(Duration::from_millis(300)).await;

        assert_eq!(monitor.signal().await, 700);
        let block = monitor.signal_block().await;
        assert!(block.iter().any(|&s| s == 700));
    }

    #[tokio::test]
    async fn test_loop_spawned_at_most_once() {
        let mut monitor = monitor_with(Box::new(ConstAdc(512)), Box::new(NullOutputs));

        let first = monitor.start_muscle_recording().await.unwrap();
        let ticks_handle = monitor.pipeline();

        sleep(Duration::from_millis(100)).await;
        let second = monitor.start_brain_recording().await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(second.kind, SignalKind::Eeg);

        // Loop keeps running across the mode switch
        let before = ticks_handle.lock().await.ticks();
        sleep(Duration::from_millis(100)).await;
        let after = ticks_handle.lock().await.ticks();
        assert!(after > before);
    }

    #[tokio::test]
    async fn test_heart_rate_from_spiking_pattern() {
        let monitor = monitor_with(Box::new(ConstAdc(512)), Box::new(NullOutputs));
        let pipeline = monitor.pipeline();

        {
            let mut pipeline = pipeline.lock().await;
            pipeline.set_kind(SignalKind::Ecg);
            // One spike every 100 samples at 250Hz: 400ms intervals, 150 BPM
            for n in 0..1000u64 {
                let sample = if n > 0 && n % 100 == 0 { 712 } else { 512 };
                pipeline.tick(sample, n * 4);
            }
        }

        assert_eq!(monitor.heart_rate().await, 150);
    }

    #[tokio::test]
    async fn test_session_metadata_tracks_mode() {
        let mut monitor = monitor_with(Box::new(ConstAdc(512)), Box::new(NullOutputs));
        assert!(monitor.session().is_none());

        monitor.start_brain_recording().await.unwrap();
        assert_eq!(monitor.session().unwrap().kind, SignalKind::Eeg);
    }
}
