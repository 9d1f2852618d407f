//! Per-source equalization and recombination into one mixture
//!
//! Each source runs forward FFT -> equalize -> inverse FFT on its own, is cut
//! back to its original length, then all sources are aligned by the length
//! policy and summed. The sum is peak-normalized when it would clip.

use log::{debug, trace, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::equalizer::{EqualizationScheme, EqualizerConfig, MirrorMode};
use crate::error::{Result, SpectralError};
use crate::signal::{peak_amplitude, Signal, SourceSet};
use crate::spectrum::fft::{forward_transform_real, inverse_transform_real};

/// How sources of different lengths are aligned before summation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthPolicy {
    /// Shorter sources are zero-padded to the longest
    #[default]
    PadToLongest,

    /// All sources are cut to the shortest
    TruncateToShortest,
}

/// Recombination configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecombineConfig {
    pub length_policy: LengthPolicy,

    pub mirror_mode: MirrorMode,

    /// Process sources on the rayon pool
    pub parallel: bool,
}

impl RecombineConfig {
    pub fn equalizer(&self) -> EqualizerConfig {
        EqualizerConfig {
            mirror_mode: self.mirror_mode,
        }
    }
}

impl Default for RecombineConfig {
    fn default() -> Self {
        Self {
            length_policy: LengthPolicy::PadToLongest,
            mirror_mode: MirrorMode::Hermitian,
            parallel: true,
        }
    }
}

/// Equalize-and-sum pipeline over a set of separated sources
#[derive(Debug, Clone, Default)]
pub struct Recombiner {
    config: RecombineConfig,
}

impl Recombiner {
    pub fn new(config: RecombineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecombineConfig {
        &self.config
    }

    /// Equalize every source with `scheme` and mix them into one signal
    pub fn recombine(
        &self,
        sources: &SourceSet,
        sample_rate: u32,
        scheme: &EqualizationScheme,
    ) -> Result<Signal> {
        if sample_rate == 0 {
            return Err(SpectralError::InvalidInput(
                "sample rate must be positive".into(),
            ));
        }
        if sources.is_empty() {
            return Err(SpectralError::InvalidInput(
                "recombination needs at least one source".into(),
            ));
        }
        for (label, signal) in sources {
            if signal.sample_rate() != sample_rate {
                return Err(SpectralError::SampleRateMismatch {
                    label: label.clone(),
                    expected: sample_rate,
                    actual: signal.sample_rate(),
                });
            }
        }

        debug!(
            "recombining {} sources at {} Hz ({:?}, parallel: {})",
            sources.len(),
            sample_rate,
            self.config.length_policy,
            self.config.parallel
        );

        let process = |(label, signal): (&String, &Signal)| {
            trace!("processing source '{}' ({} samples)", label, signal.len());
            self.process_source(signal, sample_rate, scheme)
        };
        let processed: Vec<Vec<f64>> = if self.config.parallel {
            sources.par_iter().map(process).collect::<Result<_>>()?
        } else {
            sources.iter().map(process).collect::<Result<_>>()?
        };

        Signal::new(self.mix(&processed), sample_rate)
    }

    fn process_source(
        &self,
        signal: &Signal,
        sample_rate: u32,
        scheme: &EqualizationScheme,
    ) -> Result<Vec<f64>> {
        let spectrum = forward_transform_real(signal.samples());
        let equalized = self.config.equalizer().apply(&spectrum, sample_rate, scheme)?;

        let mut samples = inverse_transform_real(&equalized);
        samples.truncate(signal.len());
        Ok(samples)
    }

    fn mix(&self, processed: &[Vec<f64>]) -> Vec<f64> {
        let lengths = processed.iter().map(Vec::len);
        let (shortest, longest) = lengths.fold((usize::MAX, 0), |(lo, hi), len| {
            (lo.min(len), hi.max(len))
        });
        if shortest != longest {
            warn!(
                "source lengths differ ({}..{} samples), applying {:?}",
                shortest, longest, self.config.length_policy
            );
        }

        let target = match self.config.length_policy {
            LengthPolicy::PadToLongest => longest,
            LengthPolicy::TruncateToShortest => shortest,
        };

        let mut mix = vec![0.0; target];
        for source in processed {
            for (m, &s) in mix.iter_mut().zip(source.iter()) {
                *m += s;
            }
        }

        normalize_peak(&mut mix);
        mix
    }
}

/// Scale `samples` down so the peak is 1.0 if it currently exceeds 1.0
///
/// Returns the pre-normalization peak. Silent or already in-range input is
/// left untouched.
pub fn normalize_peak(samples: &mut [f64]) -> f64 {
    let peak = peak_amplitude(samples);
    if peak > 1.0 {
        debug!("normalizing mixture peak {:.4}", peak);
        samples.iter_mut().for_each(|s| *s /= peak);
    }
    peak
}

/// Recombine with the default configuration
pub fn recombine(
    sources: &SourceSet,
    sample_rate: u32,
    scheme: &EqualizationScheme,
) -> Result<Signal> {
    Recombiner::default().recombine(sources, sample_rate, scheme)
}
