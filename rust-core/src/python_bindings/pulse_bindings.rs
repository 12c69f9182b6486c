//! Python bindings for pulse reconstruction and the pulse-width search

use std::sync::Arc;

use numpy::PyArray1;
use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;

use super::signal_bindings::{parse_filter, PyTimeSeries};
use super::to_py_err;
use crate::pulse::{
    reconstruct, spawn, FwhmMeasurement, MpwEvent, MpwHandle, MpwParams, PulseProfile,
    ReconstructionMethod, DEFAULT_POOL_WIDTH,
};

fn fwhm_tuple(m: FwhmMeasurement) -> (f64, f64, f64, f64, f64, f64) {
    (
        m.peak_time,
        m.peak_intensity,
        m.width_optical_cycles,
        m.width_attoseconds,
        m.left_optical_cycle,
        m.right_optical_cycle,
    )
}

/// Reconstructed attosecond pulse exposed to Python
#[pyclass(name = "PulseProfile")]
pub struct PyPulseProfile {
    profile: PulseProfile,
}

#[pymethods]
impl PyPulseProfile {
    /// Reconstruct the pulse carried by a harmonic band
    ///
    /// Args:
    ///     series: Input current
    ///     lambda0_nm: Driving wavelength [nm]
    ///     qstart: Lowest harmonic order
    ///     qend: Highest harmonic order
    ///     reconstruction_method: 1 (current) or 2 (acceleration)
    ///     method: Filter method label
    ///     eop: Fraction of the window left untouched
    ///     parameter: Method-specific filter parameter
    #[new]
    #[pyo3(signature = (
        series, lambda0_nm, qstart, qend,
        reconstruction_method=2, method="None", eop=1.0, parameter=0.0
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        series: &PyTimeSeries,
        lambda0_nm: f64,
        qstart: f64,
        qend: f64,
        reconstruction_method: u32,
        method: &str,
        eop: f64,
        parameter: f64,
    ) -> PyResult<Self> {
        let filter = parse_filter(method, eop, parameter)?;
        let reconstruction =
            ReconstructionMethod::from_index(reconstruction_method).map_err(to_py_err)?;
        let profile = reconstruct(
            &series.series,
            &filter,
            lambda0_nm,
            qstart,
            qend,
            reconstruction,
        )
        .map_err(to_py_err)?;
        Ok(Self { profile })
    }

    /// Time samples [a.u.]
    fn t<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, self.profile.t())
    }

    /// Time axis in optical cycles
    fn optical_cycles<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_vec(py, self.profile.optical_cycles())
    }

    /// Optical period [a.u.]
    fn period(&self) -> f64 {
        self.profile.period()
    }

    fn intensity_x<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, self.profile.intensity_x())
    }

    fn intensity_y<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, self.profile.intensity_y())
    }

    /// Combined intensity
    fn intensity<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, self.profile.intensity())
    }

    /// FWHM of one component ("x", "y" or "total")
    ///
    /// Returns:
    ///     (peak_time, peak_intensity, width_oc, width_as, left_oc, right_oc)
    #[pyo3(signature = (component="total"))]
    fn fwhm(&self, component: &str) -> PyResult<(f64, f64, f64, f64, f64, f64)> {
        let measure = match component {
            "x" => self.profile.fwhm_x(),
            "y" => self.profile.fwhm_y(),
            "total" => self.profile.fwhm_total(),
            other => {
                return Err(pyo3::exceptions::PyValueError::new_err(format!(
                    "unknown component {other:?}"
                )))
            }
        };
        Ok(fwhm_tuple(measure))
    }
}

/// In-flight minimum-pulse-width search exposed to Python
///
/// The search starts on construction; the GUI polls for the terminal event
/// or blocks on `wait`. Cancellation is cooperative and idempotent.
#[pyclass(name = "MpwSearch")]
pub struct PyMpwSearch {
    handle: MpwHandle,
    outcome: Option<MpwEvent>,
}

type MpwTuple = (u32, u32, f64, f64, f64, f64);

fn result_tuple(event: &MpwEvent) -> PyResult<MpwTuple> {
    match event {
        MpwEvent::Completed(r) => Ok((
            r.qstart,
            r.qmax,
            r.fwhm_attoseconds,
            r.peak_optical_cycle,
            r.last_optical_cycle,
            r.max_optical_cycle,
        )),
        MpwEvent::Failed(err) => Err(PyRuntimeError::new_err(err.to_string())),
        MpwEvent::Cancelled => Err(PyRuntimeError::new_err("search cancelled")),
    }
}

#[pymethods]
impl PyMpwSearch {
    /// Launch a search over all integer bands in [qstart, qmax]
    ///
    /// Args:
    ///     series: Input current
    ///     lambda0_nm: Driving wavelength [nm]
    ///     qstart: Lowest harmonic order
    ///     qmax: Highest harmonic order
    ///     pool_width: Worker pool size
    #[new]
    #[pyo3(signature = (series, lambda0_nm, qstart, qmax, pool_width=DEFAULT_POOL_WIDTH))]
    fn new(
        series: &PyTimeSeries,
        lambda0_nm: f64,
        qstart: u32,
        qmax: u32,
        pool_width: usize,
    ) -> PyResult<Self> {
        let mut params = MpwParams::new(lambda0_nm, qstart, qmax);
        params.pool_width = pool_width;
        let handle = spawn(Arc::clone(&series.series), params).map_err(to_py_err)?;
        Ok(Self {
            handle,
            outcome: None,
        })
    }

    /// Non-blocking poll
    ///
    /// Returns:
    ///     None while running, otherwise
    ///     (qstart, qmax, fwhm_as, peak_oc, last_oc, max_oc)
    ///
    /// Raises:
    ///     RuntimeError: on worker failure or after cancellation
    fn poll(&mut self) -> PyResult<Option<MpwTuple>> {
        if self.outcome.is_none() {
            self.outcome = self.handle.try_recv();
        }
        self.outcome.as_ref().map(result_tuple).transpose()
    }

    /// Block until the search finishes and return the result tuple
    fn wait(&mut self, py: Python<'_>) -> PyResult<MpwTuple> {
        if self.outcome.is_none() {
            let event = py.allow_threads(|| self.handle.recv());
            self.outcome = Some(event);
        }
        match &self.outcome {
            Some(event) => result_tuple(event),
            None => Err(PyRuntimeError::new_err("search reported no outcome")),
        }
    }

    /// Cooperatively stop the search; repeated calls are no-ops
    fn cancel(&mut self, py: Python<'_>) {
        py.allow_threads(|| self.handle.cancel());
    }

    /// True once the background thread has finished
    fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
