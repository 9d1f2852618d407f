//! Band equalization of a two-sided spectrum

use log::{trace, warn};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::band::{EqualizationScheme, FrequencyBand};
use crate::error::{Result, SpectralError};

/// How gains on positive-frequency bins are mirrored onto negative ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorMode {
    /// Every scaled bin k >= 1 also scales bin N-k, for every band.
    /// Spectra of real signals stay conjugate-symmetric.
    #[default]
    Hermitian,

    /// Bit-for-bit behaviour of the original equalizer service: bands that
    /// start at DC are not mirrored at all, and other bands scale the
    /// negative range [N - k_end, N - k_start).
    Legacy,
}

/// Equalizer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EqualizerConfig {
    pub mirror_mode: MirrorMode,
}

impl EqualizerConfig {
    /// Apply `scheme` to `spectrum` with this configuration's mirroring
    pub fn apply(
        &self,
        spectrum: &[Complex64],
        sample_rate: u32,
        scheme: &EqualizationScheme,
    ) -> Result<Vec<Complex64>> {
        equalize_with(spectrum, sample_rate, scheme, self.mirror_mode)
    }
}

/// Apply `scheme` to a two-sided spectrum with Hermitian mirroring
///
/// Bands are applied in list order and compound where they overlap.
/// Bin ranges are clamped to [0, N/2]; bands beyond Nyquist are no-ops.
pub fn equalize(
    spectrum: &[Complex64],
    sample_rate: u32,
    scheme: &EqualizationScheme,
) -> Result<Vec<Complex64>> {
    equalize_with(spectrum, sample_rate, scheme, MirrorMode::default())
}

/// Apply `scheme` with an explicit mirroring mode
///
/// # Arguments
/// * `spectrum` - Two-sided spectrum of length N
/// * `sample_rate` - Sample rate in Hz the spectrum was taken at
/// * `scheme` - Bands applied in list order
/// * `mirror_mode` - How gains reach the negative-frequency bins
///
/// # Returns
/// A scaled copy of `spectrum`, same length
pub fn equalize_with(
    spectrum: &[Complex64],
    sample_rate: u32,
    scheme: &EqualizationScheme,
    mirror_mode: MirrorMode,
) -> Result<Vec<Complex64>> {
    if sample_rate == 0 {
        return Err(SpectralError::InvalidInput(
            "sample rate must be positive".into(),
        ));
    }

    let mut output = spectrum.to_vec();
    let n = output.len();
    if n < 2 {
        return Ok(output);
    }

    let freq_step = sample_rate as f64 / n as f64;
    for band in scheme {
        let (k_start, k_end) = band_bins(band, freq_step, n / 2);
        if k_start >= k_end {
            warn!(
                "band [{}, {}) Hz maps to no bins at {} Hz",
                band.start_hz(),
                band.end_hz(),
                sample_rate
            );
            continue;
        }

        let gain = band.scale_factor();
        trace!("scaling bins [{}, {}) by {}", k_start, k_end, gain);

        output[k_start..k_end].iter_mut().for_each(|c| *c *= gain);

        match mirror_mode {
            MirrorMode::Hermitian => {
                for k in k_start.max(1)..k_end {
                    output[n - k] *= gain;
                }
            }
            MirrorMode::Legacy => {
                if k_start > 0 {
                    output[n - k_end..n - k_start]
                        .iter_mut()
                        .for_each(|c| *c *= gain);
                }
            }
        }
    }

    Ok(output)
}

/// Positive-frequency bin range [k_start, k_end) covered by `band`
fn band_bins(band: &FrequencyBand, freq_step: f64, half: usize) -> (usize, usize) {
    let clamp = |k: f64| k.clamp(0.0, half as f64) as usize;
    (
        clamp((band.start_hz() / freq_step).floor()),
        clamp((band.end_hz() / freq_step).ceil()),
    )
}
