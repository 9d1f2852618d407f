//! Spectral band equalizer

pub mod apply;
pub mod band;

pub use apply::{equalize, equalize_with, EqualizerConfig, MirrorMode};
pub use band::{EqualizationScheme, EqualizerMode, FrequencyBand};
