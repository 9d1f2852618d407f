//! PyO3 bindings for the Python backend

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::SpectralError;

mod equalizer_bindings;
mod spectrum_bindings;

impl From<SpectralError> for PyErr {
    fn from(err: SpectralError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Python module definition
#[pymodule]
fn spectral_equalizer(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(spectrum_bindings::forward_transform, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::forward_transform_complex, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::inverse_transform, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::analyze, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::spectrogram, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::frequency_axis, m)?)?;

    m.add_function(wrap_pyfunction!(equalizer_bindings::equalize, m)?)?;
    m.add_function(wrap_pyfunction!(equalizer_bindings::recombine, m)?)?;
    m.add_function(wrap_pyfunction!(equalizer_bindings::preset_scheme, m)?)?;

    Ok(())
}
