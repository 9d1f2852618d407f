//! Quality metrics comparing a processed signal against a reference
//!
//! All metrics compare the common prefix of the two sequences.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpectralError};
use crate::spectrum::fft::forward_transform_real;

const EPS: f64 = 1e-12;

/// Bundle of all metrics for one reference/estimate pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeparationMetrics {
    /// Signal-to-distortion ratio in dB
    pub sdr_db: f64,

    /// Scale-invariant signal-to-distortion ratio in dB
    pub si_sdr_db: f64,

    /// RMS of the sample-wise difference
    pub reconstruction_error: f64,

    /// ||X| - |Y|| / ||X|| over single-sided magnitude spectra
    pub spectral_convergence: f64,
}

/// Compute every metric for `estimate` against `reference`
pub fn evaluate(reference: &[f64], estimate: &[f64]) -> Result<SeparationMetrics> {
    Ok(SeparationMetrics {
        sdr_db: sdr_db(reference, estimate)?,
        si_sdr_db: si_sdr_db(reference, estimate)?,
        reconstruction_error: reconstruction_error(reference, estimate)?,
        spectral_convergence: spectral_convergence(reference, estimate)?,
    })
}

/// Root-mean-square sample error
pub fn reconstruction_error(reference: &[f64], estimate: &[f64]) -> Result<f64> {
    let (r, e) = common_prefix(reference, estimate)?;
    let sum_sq: f64 = r.iter().zip(e).map(|(a, b)| (a - b) * (a - b)).sum();
    Ok((sum_sq / r.len() as f64).sqrt())
}

/// 10*log10(||s||^2 / ||s - ŝ||^2)
pub fn sdr_db(reference: &[f64], estimate: &[f64]) -> Result<f64> {
    let (r, e) = common_prefix(reference, estimate)?;
    let signal = energy(r);
    let distortion: f64 = r.iter().zip(e).map(|(a, b)| (a - b) * (a - b)).sum();
    Ok(ratio_db(signal, distortion))
}

/// SDR after projecting the estimate onto the reference
///
/// Insensitive to the overall gain of the estimate.
pub fn si_sdr_db(reference: &[f64], estimate: &[f64]) -> Result<f64> {
    let (r, e) = common_prefix(reference, estimate)?;
    let dot: f64 = r.iter().zip(e).map(|(a, b)| a * b).sum();
    let alpha = dot / (energy(r) + EPS);

    let target = alpha * alpha * energy(r);
    let noise: f64 = r
        .iter()
        .zip(e)
        .map(|(a, b)| {
            let residual = b - alpha * a;
            residual * residual
        })
        .sum();
    Ok(ratio_db(target, noise))
}

/// Relative distance between single-sided magnitude spectra
pub fn spectral_convergence(reference: &[f64], estimate: &[f64]) -> Result<f64> {
    let (r, e) = common_prefix(reference, estimate)?;
    let reference_spectrum = forward_transform_real(r);
    let estimate_spectrum = forward_transform_real(e);
    let half = (reference_spectrum.len() / 2).max(1);

    let mut diff = 0.0_f64;
    let mut norm = 0.0_f64;
    for (x, y) in reference_spectrum[..half].iter().zip(&estimate_spectrum[..half]) {
        let d = x.norm() - y.norm();
        diff += d * d;
        norm += x.norm_sqr();
    }
    Ok(diff.sqrt() / (norm.sqrt() + EPS))
}

fn common_prefix<'a>(reference: &'a [f64], estimate: &'a [f64]) -> Result<(&'a [f64], &'a [f64])> {
    let len = reference.len().min(estimate.len());
    if len == 0 {
        return Err(SpectralError::InvalidInput(
            "metrics need non-empty reference and estimate".into(),
        ));
    }
    Ok((&reference[..len], &estimate[..len]))
}

fn energy(samples: &[f64]) -> f64 {
    samples.iter().map(|s| s * s).sum()
}

fn ratio_db(numerator: f64, denominator: f64) -> f64 {
    10.0 * ((numerator + EPS) / (denominator + EPS)).log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Vec<f64> {
        (0..512).map(|i| (i as f64 * 0.07).sin() * 0.5).collect()
    }

    #[test]
    fn test_perfect_estimate() {
        let r = reference();
        let metrics = evaluate(&r, &r).unwrap();

        assert_eq!(metrics.reconstruction_error, 0.0);
        assert!(metrics.sdr_db > 100.0);
        assert!(metrics.si_sdr_db > 100.0);
        assert!(metrics.spectral_convergence < 1e-9);
    }

    #[test]
    fn test_si_sdr_ignores_gain() {
        let r = reference();
        let scaled: Vec<f64> = r.iter().map(|s| s * 0.3).collect();

        assert!(si_sdr_db(&r, &scaled).unwrap() > 100.0);
        // Plain SDR penalizes the missing 70 %
        let sdr = sdr_db(&r, &scaled).unwrap();
        assert!((sdr - 10.0 * (1.0 / 0.49_f64).log10()).abs() < 1e-6);
    }

    #[test]
    fn test_known_error() {
        let r = vec![1.0, -1.0, 1.0, -1.0];
        let e = vec![0.5, -0.5, 0.5, -0.5];
        assert!((reconstruction_error(&r, &e).unwrap() - 0.5).abs() < 1e-12);

        // One cosine cycle: |X[1]| = 2 against 1
        let r = vec![1.0, 0.0, -1.0, 0.0];
        let e = vec![0.5, 0.0, -0.5, 0.0];
        assert!((spectral_convergence(&r, &e).unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_compares_common_prefix() {
        let r = vec![0.2; 10];
        let mut e = vec![0.2; 10];
        e.extend([5.0; 6]);

        assert_eq!(reconstruction_error(&r, &e).unwrap(), 0.0);
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(evaluate(&[], &[1.0]).is_err());
        assert!(sdr_db(&[1.0], &[]).is_err());
    }
}
