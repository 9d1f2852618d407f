//! Tapering windows applied to spectrogram frames before the FFT

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    /// w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    Hann,

    /// w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    #[default]
    Hamming,

    /// w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    Blackman,

    /// No tapering
    Rectangular,
}

impl WindowType {
    /// Symmetric window coefficients w[0..length]
    ///
    /// A length-1 window is `[1.0]`.
    ///
    /// # Arguments
    /// * `length` - Window length M in samples
    pub fn coefficients(self, length: usize) -> Vec<f64> {
        if length == 1 {
            return vec![1.0];
        }

        let denom = (length as f64 - 1.0).max(1.0);
        (0..length)
            .map(|n| {
                let phase = 2.0 * PI * n as f64 / denom;
                match self {
                    WindowType::Hann => 0.5 - 0.5 * phase.cos(),
                    WindowType::Hamming => 0.54 - 0.46 * phase.cos(),
                    WindowType::Blackman => 0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos(),
                    WindowType::Rectangular => 1.0,
                }
            })
            .collect()
    }
}

/// Multiply `frame` by `window` element-wise into a new buffer
///
/// Samples past the end of `frame` are treated as zero.
///
/// # Arguments
/// * `frame` - Input samples, at most `window.len()` are used
/// * `window` - Window coefficients
///
/// # Returns
/// Tapered frame of length `window.len()`
pub fn apply_window(frame: &[f64], window: &[f64]) -> Vec<f64> {
    window
        .iter()
        .enumerate()
        .map(|(i, &w)| frame.get(i).copied().unwrap_or(0.0) * w)
        .collect()
}
