//! Frequency-domain analysis: transform engine, analyzer and spectrogram

pub mod analysis;
pub mod fft;
pub mod spectrogram;
pub mod windowing;

pub use analysis::{analyze, frequency_axis, FrequencyScale, SpectrumComponents};
pub use fft::{
    forward_transform, forward_transform_real, inverse_transform, inverse_transform_real,
    padded_len, FftEngine,
};
pub use spectrogram::{spectrogram, SpectrogramConfig, SpectrogramGenerator, SpectrogramMatrix};
pub use windowing::WindowType;
