//! Python bindings for the equalizer and recombination pipeline

use std::collections::HashMap;

use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
use num_complex::Complex64;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::equalizer::{self, EqualizationScheme, EqualizerMode, FrequencyBand};
use crate::error::Result;
use crate::recombine::{LengthPolicy, RecombineConfig, Recombiner};
use crate::signal::{Signal, SourceSet};

/// Build a scheme from (start_hz, end_hz, scale_factor) tuples
fn scheme_from_tuples(bands: Vec<(f64, f64, f64)>) -> Result<EqualizationScheme> {
    let bands = bands
        .into_iter()
        .map(|(start, end, scale)| FrequencyBand::new(start, end, scale))
        .collect::<Result<Vec<_>>>()?;
    EqualizationScheme::new(bands)
}

/// Apply band gains to a two-sided spectrum
///
/// Args:
///     spectrum: Complex spectrum as numpy array
///     sample_rate: Sample rate in Hz
///     bands: List of (start_hz, end_hz, scale_factor)
#[pyfunction]
pub fn equalize<'py>(
    py: Python<'py>,
    spectrum: PyReadonlyArray1<Complex64>,
    sample_rate: u32,
    bands: Vec<(f64, f64, f64)>,
) -> PyResult<&'py PyArray1<Complex64>> {
    let scheme = scheme_from_tuples(bands)?;
    let output = equalizer::equalize(spectrum.as_slice()?, sample_rate, &scheme)?;
    Ok(output.into_pyarray(py))
}

/// Equalize each separated source and mix them into one signal
///
/// Args:
///     sources: Dict of label -> samples
///     sample_rate: Sample rate shared by all sources
///     bands: List of (start_hz, end_hz, scale_factor)
///     length_policy: "pad" (zero-pad to longest) or "truncate" (cut to shortest)
#[pyfunction]
#[pyo3(signature = (sources, sample_rate, bands, length_policy="pad"))]
pub fn recombine<'py>(
    py: Python<'py>,
    sources: HashMap<String, PyReadonlyArray1<f64>>,
    sample_rate: u32,
    bands: Vec<(f64, f64, f64)>,
    length_policy: &str,
) -> PyResult<&'py PyArray1<f64>> {
    let length_policy = match length_policy {
        "pad" => LengthPolicy::PadToLongest,
        "truncate" => LengthPolicy::TruncateToShortest,
        other => {
            return Err(PyValueError::new_err(format!(
                "unknown length policy '{}'",
                other
            )))
        }
    };
    let scheme = scheme_from_tuples(bands)?;

    let mut source_set = SourceSet::new();
    for (label, samples) in sources {
        let signal = Signal::new(samples.as_slice()?.to_vec(), sample_rate)?;
        source_set.insert(label, signal);
    }

    let recombiner = Recombiner::new(RecombineConfig {
        length_policy,
        ..RecombineConfig::default()
    });
    let mixture = py.allow_threads(move || recombiner.recombine(&source_set, sample_rate, &scheme))?;

    Ok(mixture.into_samples().into_pyarray(py))
}

/// Flat starting bands for a mode name ("generic", "musical", or custom)
///
/// Returns:
///     List of (label, start_hz, end_hz, scale_factor)
#[pyfunction]
pub fn preset_scheme(mode: &str) -> Vec<(String, f64, f64, f64)> {
    let mode: EqualizerMode = match mode.parse() {
        Ok(mode) => mode,
        Err(never) => match never {},
    };

    EqualizationScheme::preset(&mode)
        .iter()
        .map(|band| {
            (
                band.label().unwrap_or_default().to_string(),
                band.start_hz(),
                band.end_hz(),
                band.scale_factor(),
            )
        })
        .collect()
}
