//! Biquad notch filter for narrowband rejection

use crate::config::NotchConfig;
use biosense_core::Sample;

/// Second-order IIR notch filter in direct form I.
///
/// Coefficients are derived once from the center frequency, quality factor
/// and sample rate; the per-sample update is the standard biquad difference
/// equation over two taps of input and output history.
#[derive(Debug, Clone)]
pub struct NotchFilter {
    // y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl NotchFilter {
    /// Design a notch at `center_hz` with quality factor `q` for a signal
    /// sampled at `sample_rate_hz`
    pub fn new(config: &NotchConfig, sample_rate_hz: u32) -> Self {
        let omega = 2.0 * std::f32::consts::PI * config.center_hz / sample_rate_hz as f32;
        let alpha = omega.sin() / (2.0 * config.q);
        let cos_omega = omega.cos();

        let a0 = 1.0 + alpha;

        NotchFilter {
            b0: 1.0 / a0,
            b1: -2.0 * cos_omega / a0,
            b2: 1.0 / a0,
            a1: -2.0 * cos_omega / a0,
            a2: (1.0 - alpha) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Filter one sample, keeping full float precision
    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;

        y
    }

    /// Filter one raw ADC sample, truncating the output toward zero to match
    /// the fixed-point convention of the hardware output path
    pub fn process_sample(&mut self, sample: Sample) -> Sample {
        self.process(sample as f32) as Sample
    }

    /// Designed coefficients as `(b0, b1, b2, a1, a2)`
    pub fn coefficients(&self) -> (f32, f32, f32, f32, f32) {
        (self.b0, self.b1, self.b2, self.a1, self.a2)
    }

    /// Clear the input and output history taps
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_notch() -> NotchFilter {
        NotchFilter::new(
            &NotchConfig {
                center_hz: 10.0,
                q: 1.0,
            },
            250,
        )
    }

    #[test]
    fn test_coefficient_derivation() {
        let filter = alpha_notch();
        let (b0, b1, b2, a1, a2) = filter.coefficients();

        let omega = 2.0 * std::f32::consts::PI * 10.0 / 250.0;
        let alpha = omega.sin() / 2.0;
        let a0 = 1.0 + alpha;

        assert!((b0 - 1.0 / a0).abs() < 1e-6);
        assert!((b1 + 2.0 * omega.cos() / a0).abs() < 1e-6);
        assert!((b2 - 1.0 / a0).abs() < 1e-6);
        assert_eq!(b1, a1);
        assert!((a2 - (1.0 - alpha) / a0).abs() < 1e-6);
    }

    #[test]
    fn test_dc_response_converges_to_unity_gain() {
        let mut filter = alpha_notch();
        let (b0, b1, b2, a1, a2) = filter.coefficients();
        let expected_gain = (b0 + b1 + b2) / (1.0 + a1 + a2);

        let input = 512.0;
        let mut output = 0.0;
        for _ in 0..2000 {
            output = filter.process(input);
        }

        assert!(
            (output - input * expected_gain).abs() < 0.5,
            "DC output {} did not converge to {}",
            output,
            input * expected_gain
        );
    }

    #[test]
    fn test_attenuates_center_frequency() {
        let mut filter = alpha_notch();
        let fs = 250.0;

        // Drive with a pure 10Hz tone and measure steady-state amplitude
        let mut peak = 0.0f32;
        for n in 0..2500 {
            let t = n as f32 / fs;
            let x = (2.0 * std::f32::consts::PI * 10.0 * t).sin() * 100.0;
            let y = filter.process(x);
            if n > 1250 {
                peak = peak.max(y.abs());
            }
        }

        assert!(peak < 15.0, "10Hz tone leaked through the notch: {}", peak);
    }

    #[test]
    fn test_integer_output_truncates_toward_zero() {
        let mut filter = alpha_notch();
        // First output is b0 * x, which is slightly below x for a notch
        let y = filter.process_sample(100);
        let (b0, ..) = alpha_notch().coefficients();
        assert_eq!(y, (b0 * 100.0) as i32);
    }
}
