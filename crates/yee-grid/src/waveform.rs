//! Excitation waveforms.

use std::f64::consts::PI;

use yee_core::ConfigError;

/// Waveform shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveformKind {
    /// Gaussian pulse delayed by one period.
    Gaussian,
    /// First derivative of [`WaveformKind::Gaussian`].
    GaussianDot,
    /// Negative second derivative of a Gaussian (Mexican hat).
    Ricker,
    /// A single cycle of a sine wave.
    Sine,
    /// Continuous sine with a linear amplitude ramp over four cycles.
    ContSine,
}

/// A time-dependent excitation `amplitude * shape(t)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waveform {
    /// Shape of the pulse.
    pub kind: WaveformKind,
    /// Peak scaling.
    pub amplitude: f64,
    /// Centre frequency, Hz.
    pub frequency: f64,
}

impl Waveform {
    /// Create a waveform.
    pub const fn new(kind: WaveformKind, amplitude: f64, frequency: f64) -> Self {
        Self {
            kind,
            amplitude,
            frequency,
        }
    }

    /// A unit-amplitude Ricker wavelet, the usual GPR excitation.
    pub const fn ricker(frequency: f64) -> Self {
        Self::new(WaveformKind::Ricker, 1.0, frequency)
    }

    /// A unit-amplitude Gaussian pulse.
    pub const fn gaussian(frequency: f64) -> Self {
        Self::new(WaveformKind::Gaussian, 1.0, frequency)
    }

    /// Check that amplitude and frequency are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(ConfigError::InvalidWaveform {
                reason: format!("frequency must be > 0, got {}", self.frequency),
            });
        }
        if !self.amplitude.is_finite() {
            return Err(ConfigError::InvalidWaveform {
                reason: format!("amplitude must be finite, got {}", self.amplitude),
            });
        }
        Ok(())
    }

    /// Value at time `t` seconds.
    pub fn evaluate(&self, t: f64) -> f64 {
        let f = self.frequency;
        let shape = match self.kind {
            WaveformKind::Gaussian => {
                let chi = 1.0 / f;
                let zeta = 2.0 * PI * PI * f * f;
                let delay = t - chi;
                (-zeta * delay * delay).exp()
            }
            WaveformKind::GaussianDot => {
                let chi = 1.0 / f;
                let zeta = 2.0 * PI * PI * f * f;
                let delay = t - chi;
                -2.0 * zeta * delay * (-zeta * delay * delay).exp()
            }
            WaveformKind::Ricker => {
                let chi = 2f64.sqrt() / f;
                let zeta = PI * PI * f * f;
                let delay = t - chi;
                -((2.0 * zeta * delay * delay - 1.0) * (-zeta * delay * delay).exp())
            }
            WaveformKind::Sine => {
                if t * f <= 1.0 {
                    (2.0 * PI * f * t).sin()
                } else {
                    0.0
                }
            }
            WaveformKind::ContSine => {
                let ramp = (0.25 * f * t).min(1.0);
                ramp * (2.0 * PI * f * t).sin()
            }
        };
        self.amplitude * shape
    }
}
