//! Hardware abstraction traits for the acquisition runtime
//!
//! The sampling loop only talks to the environment through these traits, so
//! the same runtime drives real converter hardware, the waveform simulator
//! or test doubles.

use biosense_core::Sample;
use std::time::Instant;

/// One raw ADC reading per call, at whatever cadence the caller imposes
pub trait AdcSource: Send {
    /// Read the next raw sample (10-bit code, 0..=1023)
    fn read_sample(&mut self) -> Sample;
}

/// Monotonic millisecond wall clock
pub trait Clock: Send + Sync {
    /// Milliseconds since an arbitrary fixed origin, monotonic
    fn now_millis(&self) -> u64;
}

/// Digital output lines driven by the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputPin {
    /// Timing diagnostic line, high while a tick is being processed
    Diagnostic,
    /// First channel-select line for downstream hardware routing
    ChannelSelectA,
    /// Second channel-select line
    ChannelSelectB,
}

/// Digital output sink
pub trait DigitalOut: Send {
    /// Drive one output line
    fn set(&mut self, pin: OutputPin, level: bool);
}

/// Line-oriented telemetry output
pub trait TelemetrySink: Send {
    /// Emit one labelled numeric reading
    fn emit(&mut self, label: &str, value: i32);

    /// Show a number on the device readout
    fn show_number(&mut self, value: i32);
}

/// Monotonic clock backed by [`std::time::Instant`]
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Clock with its origin at construction time
    pub fn new() -> Self {
        SystemClock {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Output sink that drops all writes; stands in for absent hardware
#[derive(Debug, Clone, Copy, Default)]
pub struct NullOutputs;

impl DigitalOut for NullOutputs {
    fn set(&mut self, _pin: OutputPin, _level: bool) {}
}

/// Telemetry sink writing `label:value` lines to stdout, matching the
/// serial-plotter format of the device firmware
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleTelemetry;

impl TelemetrySink for ConsoleTelemetry {
    fn emit(&mut self, label: &str, value: i32) {
        println!("{}:{}", label, value);
    }

    fn show_number(&mut self, value: i32) {
        println!("{}", value);
    }
}
