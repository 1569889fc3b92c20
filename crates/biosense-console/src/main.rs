//! Biosense console demo - simulated acquisition with live telemetry
//!
//! Wires the waveform simulator into the signal monitor, cycles through the
//! three recording modes and streams the derived metrics to stdout.

use anyhow::Context;
use biosense_core::{SignalKind, SignalShape};
use biosense_dsp::PipelineConfig;
use biosense_runtime::{
    BioSimulator, ConsoleTelemetry, NullOutputs, SignalMonitor, SimulatorConfig, SystemClock,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let kind = match std::env::args().nth(1).as_deref() {
        Some("heart") => SignalKind::Ecg,
        Some("brain") => SignalKind::Eeg,
        _ => SignalKind::Emg,
    };

    let simulator = BioSimulator::new(SimulatorConfig::for_kind(kind))
        .context("failed to build waveform simulator")?;

    let mut monitor = SignalMonitor::new(
        PipelineConfig::default(),
        Box::new(simulator),
        Arc::new(SystemClock::new()),
        Box::new(NullOutputs),
        Box::new(ConsoleTelemetry),
    )
    .context("failed to build signal monitor")?;

    let session = match kind {
        SignalKind::Emg => monitor.start_muscle_recording().await,
        SignalKind::Ecg => monitor.start_heart_recording().await,
        SignalKind::Eeg => monitor.start_brain_recording().await,
    }
    .context("failed to start recording")?;

    tracing::info!(kind = kind.label(), session = %session.id, "demo session running");

    // Let the buffer and filters warm up before reading anything
    sleep(Duration::from_millis(500)).await;

    match kind {
        SignalKind::Emg => {
            monitor.print(SignalShape::Control, 2000).await;

            let peak = monitor
                .max_signal(1000, 1)
                .await
                .expect("non-negative arguments");
            tracing::info!(peak, "max muscle power over 1s");
        }
        SignalKind::Ecg => {
            sleep(Duration::from_secs(3)).await;
            tracing::info!(bpm = monitor.heart_rate().await, "heart rate estimate");
        }
        SignalKind::Eeg => {
            sleep(Duration::from_secs(3)).await;
            tracing::info!(
                alpha = monitor.brain_alpha_power().await,
                "alpha power estimate"
            );
        }
    }

    Ok(())
}
