//! Error types for the spectral engine

use thiserror::Error;

/// Errors raised at the engine's validation boundaries.
///
/// Numerically degenerate input (silence, zero peaks) and out-of-range band
/// frequencies are never errors: they are floored or clamped silently.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpectralError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid frequency band [{start_hz} Hz, {end_hz} Hz) x {scale_factor}: {reason}")]
    InvalidBand {
        start_hz: f64,
        end_hz: f64,
        scale_factor: f64,
        reason: &'static str,
    },

    #[error("Sample rate mismatch for '{label}': expected {expected} Hz, got {actual} Hz")]
    SampleRateMismatch {
        label: String,
        expected: u32,
        actual: u32,
    },

    #[error("Unknown signal id: {0}")]
    UnknownSignal(String),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, SpectralError>;
