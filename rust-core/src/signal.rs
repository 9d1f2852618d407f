//! Time-domain signal container
//!
//! A `Signal` is immutable once built: every stage produces a new one.

use std::collections::BTreeMap;

use crate::error::{Result, SpectralError};

/// Real-valued samples plus their sample rate in Hz
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<f64>,
    sample_rate: u32,
}

/// Separated sources keyed by label ("vocals", "drums", ...)
///
/// Ordered so that recombination visits sources deterministically.
pub type SourceSet = BTreeMap<String, Signal>;

impl Signal {
    /// Create a signal, rejecting a zero sample rate
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(SpectralError::InvalidInput(
                "sample rate must be positive".into(),
            ));
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Sample values
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value (0.0 for an empty signal)
    pub fn peak(&self) -> f64 {
        peak_amplitude(&self.samples)
    }

    /// Consume the signal and return its samples
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

/// Largest absolute value in `samples`
pub(crate) fn peak_amplitude(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0_f64, |acc, &s| acc.max(s.abs()))
}
