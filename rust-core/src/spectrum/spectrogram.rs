//! Short-time Fourier transform spectrogram
//!
//! Slides a tapered window over the signal and keeps the first
//! window_size/2 magnitude bins of each frame, in dB. The matrix is
//! frequency-major: rows are bins, columns are frames.

use log::{debug, trace};
use ndarray::Array2;
use num_complex::Complex64;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::analysis::{amplitude_to_db, bin_to_hz};
use super::fft::FftEngine;
use super::windowing::{apply_window, WindowType};
use crate::error::{Result, SpectralError};

/// Magnitude-in-dB matrix, shape (window_size / 2, num_frames)
pub type SpectrogramMatrix = Array2<f64>;

/// Spectrogram configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrogramConfig {
    /// Samples per frame
    pub window_size: usize,

    /// Fraction of each frame shared with the next, in [0, 1)
    pub overlap_ratio: f64,

    /// Taper applied to every frame
    pub window_type: WindowType,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            window_size: 1024,
            overlap_ratio: 0.5,
            window_type: WindowType::Hamming,
        }
    }
}

impl SpectrogramConfig {
    /// Samples shared by consecutive frames
    pub fn overlap(&self) -> usize {
        (self.window_size as f64 * self.overlap_ratio) as usize
    }

    /// Hop between frame starts
    pub fn step_size(&self) -> usize {
        self.window_size - self.overlap()
    }

    fn validate(&self) -> Result<()> {
        if self.window_size < 2 {
            return Err(SpectralError::InvalidInput(format!(
                "window size must be at least 2, got {}",
                self.window_size
            )));
        }
        if !(0.0..1.0).contains(&self.overlap_ratio) {
            return Err(SpectralError::InvalidInput(format!(
                "overlap ratio must be in [0, 1), got {}",
                self.overlap_ratio
            )));
        }
        if self.overlap() >= self.window_size {
            return Err(SpectralError::InvalidInput(
                "overlap leaves no hop between frames".into(),
            ));
        }
        Ok(())
    }
}

/// STFT spectrogram generator with a cached window and FFT plan
pub struct SpectrogramGenerator {
    config: SpectrogramConfig,
    window: Vec<f64>,
    engine: FftEngine,
}

impl SpectrogramGenerator {
    /// Create a generator, validating the configuration
    pub fn new(config: SpectrogramConfig) -> Result<Self> {
        config.validate()?;

        let window = config.window_type.coefficients(config.window_size);
        let engine = FftEngine::new(config.window_size);

        Ok(Self {
            config,
            window,
            engine,
        })
    }

    pub fn config(&self) -> &SpectrogramConfig {
        &self.config
    }

    /// Number of frequency rows in the output
    pub fn num_bins(&self) -> usize {
        self.config.window_size / 2
    }

    /// Number of whole frames that fit in `signal_len` samples
    ///
    /// (len - overlap) / step, saturating at zero for short signals.
    pub fn num_frames(&self, signal_len: usize) -> usize {
        signal_len.saturating_sub(self.config.overlap()) / self.config.step_size()
    }

    /// Frequency of each row in Hz
    pub fn frequency_axis(&self, sample_rate: u32) -> Vec<f64> {
        (0..self.num_bins())
            .map(|k| bin_to_hz(k, self.engine.size(), sample_rate))
            .collect()
    }

    /// Start time of each column in seconds
    pub fn frame_times(&self, signal_len: usize, sample_rate: u32) -> Vec<f64> {
        let step = self.config.step_size();
        (0..self.num_frames(signal_len))
            .map(|i| (i * step) as f64 / sample_rate as f64)
            .collect()
    }

    /// Compute the spectrogram of `signal`
    ///
    /// A signal shorter than one frame yields a matrix with zero columns.
    pub fn compute(&self, signal: &[f64]) -> SpectrogramMatrix {
        let num_bins = self.num_bins();
        let num_frames = self.num_frames(signal.len());
        let step = self.config.step_size();
        let window_size = self.config.window_size;

        debug!(
            "spectrogram: {} samples, window {}, step {}, {} frames",
            signal.len(),
            window_size,
            step,
            num_frames
        );

        let columns: Vec<Vec<f64>> = (0..num_frames)
            .into_par_iter()
            .map(|i| {
                let start = i * step;
                let end = (start + window_size).min(signal.len());
                trace!("frame {} covers [{}, {})", i, start, end);
                self.frame_magnitudes_db(&signal[start..end])
            })
            .collect();

        let mut matrix = Array2::<f64>::zeros((num_bins, num_frames));
        for (frame, column) in columns.iter().enumerate() {
            for (bin, &db) in column.iter().take(num_bins).enumerate() {
                matrix[[bin, frame]] = db;
            }
        }
        matrix
    }

    fn frame_magnitudes_db(&self, frame: &[f64]) -> Vec<f64> {
        let windowed = apply_window(frame, &self.window);

        let mut buffer: Vec<Complex64> = windowed.iter().map(|&s| Complex64::new(s, 0.0)).collect();
        buffer.resize(self.engine.size(), Complex64::new(0.0, 0.0));
        self.engine.forward(&mut buffer);

        buffer[..self.num_bins()]
            .iter()
            .map(|c| amplitude_to_db(c.norm()))
            .collect()
    }
}

/// Compute a Hamming-windowed spectrogram
///
/// # Arguments
/// * `signal` - Input samples
/// * `sample_rate` - Sample rate in Hz (validated, does not affect the values)
/// * `window_size` - Samples per frame
/// * `overlap_ratio` - Fraction of each frame shared with the next, in [0, 1)
///
/// # Returns
/// Matrix of shape (window_size / 2, num_frames) holding 20*log10(|X| + ε)
pub fn spectrogram(
    signal: &[f64],
    sample_rate: u32,
    window_size: usize,
    overlap_ratio: f64,
) -> Result<SpectrogramMatrix> {
    if sample_rate == 0 {
        return Err(SpectralError::InvalidInput(
            "sample rate must be positive".into(),
        ));
    }

    let generator = SpectrogramGenerator::new(SpectrogramConfig {
        window_size,
        overlap_ratio,
        window_type: WindowType::Hamming,
    })?;

    Ok(generator.compute(signal))
}
