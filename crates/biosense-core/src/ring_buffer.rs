//! Circular sample buffer with a delayed read cursor

use crate::error::{BioError, BioResult};
use crate::signal_types::Sample;

/// Fixed-capacity ring buffer holding the most recent N raw samples.
///
/// The write cursor advances by one per acquisition tick, wrapping modulo the
/// capacity. The read cursor trails the write cursor by a fixed tick count to
/// compensate for acquisition-to-consumption latency, and is recomputed on
/// every write. Storage is zero-filled at construction so reads before the
/// first full pass return defined values.
#[derive(Debug, Clone)]
pub struct CircularSampleBuffer {
    samples: Vec<Sample>,
    write_index: usize,
    read_index: usize,
    delay_ticks: usize,
}

impl CircularSampleBuffer {
    /// Create a zero-filled buffer with the given capacity and read delay
    pub fn new(capacity: usize, delay_ticks: usize) -> BioResult<Self> {
        if capacity == 0 {
            return Err(BioError::InvalidBufferConfig {
                reason: "capacity must be non-zero".to_string(),
            });
        }
        if delay_ticks >= capacity {
            return Err(BioError::InvalidBufferConfig {
                reason: format!(
                    "read delay {} must be smaller than capacity {}",
                    delay_ticks, capacity
                ),
            });
        }

        Ok(CircularSampleBuffer {
            samples: vec![0; capacity],
            write_index: 0,
            read_index: (capacity - delay_ticks) % capacity,
            delay_ticks,
        })
    }

    /// Store one sample at the write cursor and advance both cursors
    pub fn write(&mut self, sample: Sample) {
        let capacity = self.samples.len();
        self.samples[self.write_index] = sample;
        self.write_index = (self.write_index + 1) % capacity;
        // Read cursor trails the (already advanced) write cursor.
        self.read_index = (self.write_index + capacity - self.delay_ticks) % capacity;
    }

    /// Sample under the delayed read cursor
    pub fn current(&self) -> Sample {
        self.samples[self.read_index]
    }

    /// Full backing storage in **physical** order, not time order.
    ///
    /// Callers that need chronological ordering must account for the cursor
    /// positions themselves; downstream consumers rely on the raw layout, so
    /// this is deliberately not reordered.
    pub fn block(&self) -> &[Sample] {
        &self.samples
    }

    /// Most recent samples covering `ms` milliseconds, oldest first.
    ///
    /// Returns the zero sentinel `vec![0]` when the requested window does not
    /// fit the buffer. The window ends at the read cursor.
    pub fn window(&self, ms: u32, sample_rate_hz: u32, range_ms: u32) -> Vec<Sample> {
        if ms == range_ms {
            return self.samples.clone();
        }
        if ms > range_ms {
            return vec![0];
        }

        let capacity = self.samples.len();
        let required = (sample_rate_hz as usize * ms as usize).div_ceil(1000);
        if required == 0 {
            return Vec::new();
        }
        let start = (self.read_index + capacity - (required - 1)) % capacity;
        let end = (self.read_index + 1) % capacity;

        if start < end {
            self.samples[start..end].to_vec()
        } else {
            // Wrapped range: splice the tail and head slices
            let mut out = Vec::with_capacity(required);
            out.extend_from_slice(&self.samples[start..]);
            out.extend_from_slice(&self.samples[..end]);
            out
        }
    }

    /// Buffer capacity in samples
    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Current write cursor position
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// Current read cursor position
    pub fn read_index(&self) -> usize {
        self.read_index
    }
}
