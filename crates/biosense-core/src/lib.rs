//! Biosense-Core: Foundation types for single-channel biosignal acquisition
//!
//! Sample and signal-kind types, system constants, the circular sample
//! buffer shared by all recording modes, and the core error type.

pub mod error;
pub mod ring_buffer;
pub mod signal_types;

pub use error::{BioError, BioResult};
pub use ring_buffer::CircularSampleBuffer;
pub use signal_types::*;
