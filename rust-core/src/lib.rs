//! Spectral Equalizer - Frequency-Domain Audio Engine
//!
//! From-scratch radix-2 FFT, spectrum analysis, STFT spectrograms, band
//! equalization and multi-source recombination over whole, finite signals.
//! Every operation is a pure function of its inputs; the optional
//! [`session::SignalStore`] keeps per-signal state for a request layer.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod equalizer;
pub mod error;
pub mod evaluation;
pub mod recombine;
pub mod session;
pub mod signal;
pub mod spectrum;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use equalizer::{equalize, EqualizationScheme, EqualizerMode, FrequencyBand, MirrorMode};
pub use error::{Result, SpectralError};
pub use recombine::{recombine, LengthPolicy, RecombineConfig, Recombiner};
pub use session::{SignalId, SignalStore, StoreConfig};
pub use signal::{Signal, SourceSet};
pub use spectrum::{
    analyze, forward_transform, forward_transform_real, inverse_transform, inverse_transform_real,
    spectrogram, FftEngine, SpectrogramConfig, SpectrumComponents,
};
