//! Single-sided spectrum analysis
//!
//! Turns a two-sided spectrum into the frequency axis, magnitude in dB and
//! phase of its first N/2 bins.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpectralError};

/// Floor added before taking log10 so exact silence stays finite
pub const DB_FLOOR_EPSILON: f64 = 1e-12;

/// Standard audiometric test frequencies in Hz
pub const AUDIOGRAM_FREQUENCIES_HZ: [f64; 11] = [
    125.0, 250.0, 500.0, 750.0, 1000.0, 1500.0, 2000.0, 3000.0, 4000.0, 6000.0, 8000.0,
];

/// 20*log10(amplitude + ε)
#[inline]
pub fn amplitude_to_db(amplitude: f64) -> f64 {
    20.0 * (amplitude + DB_FLOOR_EPSILON).log10()
}

/// Analyzer output, one entry per positive-frequency bin
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpectrumComponents {
    /// Bin frequencies in Hz, 0 up to (excluding) Nyquist
    pub frequencies: Vec<f64>,

    /// 20*log10(|X[k]| / (N/2) + ε)
    pub magnitudes_db: Vec<f64>,

    /// arg X[k] in radians
    pub phases: Vec<f64>,
}

impl SpectrumComponents {
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

/// Analyze the single-sided half of `spectrum`
///
/// Mirror (negative-frequency) bins are ignored.
///
/// # Arguments
/// * `spectrum` - Two-sided spectrum of length N
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
/// N/2 frequencies, magnitudes in dB (normalized by N/2) and phases
pub fn analyze(spectrum: &[Complex64], sample_rate: u32) -> Result<SpectrumComponents> {
    if sample_rate == 0 {
        return Err(SpectralError::InvalidInput(
            "sample rate must be positive".into(),
        ));
    }

    let n = spectrum.len();
    let half = n / 2;
    let norm = half as f64;
    let single_sided = &spectrum[..half];

    Ok(SpectrumComponents {
        frequencies: linear_frequencies(half, n, sample_rate),
        magnitudes_db: single_sided
            .iter()
            .map(|c| amplitude_to_db(c.norm() / norm))
            .collect(),
        phases: single_sided.iter().map(|c| c.arg()).collect(),
    })
}

/// Frequency axis scale used when presenting a spectrum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyScale {
    /// Evenly spaced bin frequencies
    #[default]
    Linear,

    /// Audiometric test frequencies up to Nyquist
    Audiogram,
}

/// Frequency axis for a spectrum of `spectrum_len` bins
///
/// # Arguments
/// * `scale` - Linear bin frequencies or audiogram test frequencies
/// * `spectrum_len` - Two-sided spectrum length N
/// * `sample_rate` - Sample rate in Hz
pub fn frequency_axis(scale: FrequencyScale, spectrum_len: usize, sample_rate: u32) -> Vec<f64> {
    match scale {
        FrequencyScale::Linear => linear_frequencies(spectrum_len / 2, spectrum_len, sample_rate),
        FrequencyScale::Audiogram => {
            let nyquist = sample_rate as f64 / 2.0;
            AUDIOGRAM_FREQUENCIES_HZ
                .iter()
                .copied()
                .filter(|&f| f <= nyquist)
                .collect()
        }
    }
}

/// Convert bin index to Hz for a transform of size `n`
#[inline]
pub fn bin_to_hz(bin: usize, n: usize, sample_rate: u32) -> f64 {
    bin as f64 * sample_rate as f64 / n as f64
}

fn linear_frequencies(count: usize, n: usize, sample_rate: u32) -> Vec<f64> {
    (0..count).map(|k| bin_to_hz(k, n, sample_rate)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::fft::forward_transform_real;
    use std::f64::consts::PI;

    #[test]
    fn test_frequency_axis_spacing() {
        let spectrum = vec![Complex64::new(0.0, 0.0); 1024];
        let components = analyze(&spectrum, 48000).unwrap();

        assert_eq!(components.len(), 512);
        assert_eq!(components.frequencies[0], 0.0);
        assert!((components.frequencies[1] - 46.875).abs() < 1e-9);
        // Nyquist itself is excluded
        assert!(components.frequencies[511] < 24000.0);
    }

    #[test]
    fn test_full_scale_sine_is_zero_db() {
        let n = 1024;
        let bin = 64;
        let signal: Vec<f64> = (0..n)
            .map(|t| (2.0 * PI * bin as f64 * t as f64 / n as f64).cos())
            .collect();

        let components = analyze(&forward_transform_real(&signal), 8000).unwrap();

        assert!(components.magnitudes_db[bin].abs() < 1e-6);
        assert!((components.frequencies[bin] - 500.0).abs() < 1e-9);
        assert!(components.phases[bin].abs() < 1e-6);
    }

    #[test]
    fn test_silence_hits_epsilon_floor() {
        let components = analyze(&vec![Complex64::new(0.0, 0.0); 16], 100).unwrap();
        let floor = 20.0 * DB_FLOOR_EPSILON.log10();

        assert!(components.magnitudes_db.iter().all(|&db| (db - floor).abs() < 1e-9));
        assert!((floor + 240.0).abs() < 1e-9);
    }

    #[test]
    fn test_phase_sign() {
        let spectrum = vec![
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, -1.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 1.0),
        ];
        let components = analyze(&spectrum, 4).unwrap();

        assert!((components.phases[1] + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_zero_sample_rate() {
        assert!(analyze(&[Complex64::new(1.0, 0.0); 4], 0).is_err());
    }

    #[test]
    fn test_audiogram_axis_respects_nyquist() {
        let axis = frequency_axis(FrequencyScale::Audiogram, 1024, 8000);
        assert_eq!(axis.last().copied(), Some(4000.0));
        assert_eq!(axis.len(), 9);

        let full = frequency_axis(FrequencyScale::Audiogram, 1024, 44100);
        assert_eq!(full.len(), AUDIOGRAM_FREQUENCIES_HZ.len());
    }

    #[test]
    fn test_linear_axis_matches_analyzer() {
        let spectrum = vec![Complex64::new(1.0, 0.0); 64];
        let components = analyze(&spectrum, 22050).unwrap();

        assert_eq!(
            frequency_axis(FrequencyScale::Linear, 64, 22050),
            components.frequencies
        );
    }
}
