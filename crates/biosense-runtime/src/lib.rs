//! Biosense-Runtime: Acquisition loop, HAL traits and experiment helpers
//!
//! Bridges the processing pipeline to the outside world: hardware
//! abstraction traits for the ADC, clock, digital outputs and telemetry
//! sink; a waveform simulator implementing the ADC trait; and the
//! `SignalMonitor` that runs the perpetual sampling task and exposes the
//! recording API.

pub mod experiments;
pub mod hal;
pub mod monitor;
pub mod simulator;

pub use hal::{
    AdcSource, Clock, ConsoleTelemetry, DigitalOut, NullOutputs, OutputPin, SystemClock,
    TelemetrySink,
};
pub use monitor::SignalMonitor;
pub use simulator::{BioSimulator, SimulatorConfig};
