//! PyO3 bindings for the PyQt front end

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

mod gabor_bindings;
mod pulse_bindings;
mod signal_bindings;
mod spectrum_bindings;

use crate::error::CoreError;

/// Validation and precondition failures become ValueError, everything that
/// happens past the boundary becomes RuntimeError.
pub(crate) fn to_py_err(err: CoreError) -> PyErr {
    match err {
        CoreError::InvalidInput(_) | CoreError::Precondition(_) => {
            PyValueError::new_err(err.to_string())
        }
        CoreError::Computation(_) | CoreError::Cancelled => {
            PyRuntimeError::new_err(err.to_string())
        }
    }
}

/// Python module definition
#[pymodule]
fn attoscience_core(_py: Python, m: &PyModule) -> PyResult<()> {
    // honor RUST_LOG when the extension is imported
    let _ = env_logger::try_init();

    m.add_class::<signal_bindings::PyTimeSeries>()?;
    m.add_class::<spectrum_bindings::PyHarmonicSpectrum>()?;
    m.add_class::<pulse_bindings::PyPulseProfile>()?;
    m.add_class::<pulse_bindings::PyMpwSearch>()?;
    m.add_class::<gabor_bindings::PyTimeFrequencyMap>()?;

    Ok(())
}
