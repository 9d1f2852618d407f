//! Python bindings for the transform engine, analyzer and spectrogram

use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1};
use num_complex::Complex64;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::spectrum::{self as dsp, FrequencyScale};

/// Forward FFT of a real signal
///
/// Args:
///     samples: Real samples as numpy array
///
/// Returns:
///     Complex spectrum, zero-padded to the next power of two
#[pyfunction]
pub fn forward_transform<'py>(
    py: Python<'py>,
    samples: PyReadonlyArray1<f64>,
) -> PyResult<&'py PyArray1<Complex64>> {
    let spectrum = dsp::forward_transform_real(samples.as_slice()?);
    Ok(spectrum.into_pyarray(py))
}

/// Forward FFT of a complex sequence
#[pyfunction]
pub fn forward_transform_complex<'py>(
    py: Python<'py>,
    values: PyReadonlyArray1<Complex64>,
) -> PyResult<&'py PyArray1<Complex64>> {
    let spectrum = dsp::forward_transform(values.as_slice()?);
    Ok(spectrum.into_pyarray(py))
}

/// Inverse FFT
///
/// Args:
///     spectrum: Complex spectrum as numpy array
///
/// Returns:
///     Complex time-domain sequence of the padded length
#[pyfunction]
pub fn inverse_transform<'py>(
    py: Python<'py>,
    spectrum: PyReadonlyArray1<Complex64>,
) -> PyResult<&'py PyArray1<Complex64>> {
    let signal = dsp::inverse_transform(spectrum.as_slice()?);
    Ok(signal.into_pyarray(py))
}

/// Single-sided analysis of a spectrum
///
/// Returns:
///     (frequencies, magnitudes_db, phases)
#[pyfunction]
#[allow(clippy::type_complexity)]
pub fn analyze<'py>(
    py: Python<'py>,
    spectrum: PyReadonlyArray1<Complex64>,
    sample_rate: u32,
) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>, &'py PyArray1<f64>)> {
    let components = dsp::analyze(spectrum.as_slice()?, sample_rate)?;
    Ok((
        components.frequencies.into_pyarray(py),
        components.magnitudes_db.into_pyarray(py),
        components.phases.into_pyarray(py),
    ))
}

/// Hamming-windowed STFT magnitude in dB, shape (window_size / 2, frames)
#[pyfunction]
#[pyo3(signature = (signal, sample_rate, window_size=1024, overlap_ratio=0.5))]
pub fn spectrogram<'py>(
    py: Python<'py>,
    signal: PyReadonlyArray1<f64>,
    sample_rate: u32,
    window_size: usize,
    overlap_ratio: f64,
) -> PyResult<&'py PyArray2<f64>> {
    let samples = signal.as_slice()?.to_vec();
    let matrix = py.allow_threads(move || {
        dsp::spectrogram(&samples, sample_rate, window_size, overlap_ratio)
    })?;
    Ok(matrix.into_pyarray(py))
}

/// Frequency axis for plotting: "linear" or "audiogram"
#[pyfunction]
#[pyo3(signature = (spectrum_len, sample_rate, scale="linear"))]
pub fn frequency_axis<'py>(
    py: Python<'py>,
    spectrum_len: usize,
    sample_rate: u32,
    scale: &str,
) -> PyResult<&'py PyArray1<f64>> {
    let scale = match scale {
        "linear" => FrequencyScale::Linear,
        "audiogram" => FrequencyScale::Audiogram,
        other => {
            return Err(PyValueError::new_err(format!(
                "unknown frequency scale '{}'",
                other
            )))
        }
    };
    Ok(dsp::frequency_axis(scale, spectrum_len, sample_rate).into_pyarray(py))
}
