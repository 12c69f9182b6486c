//! Python bindings for loading and windowing the current

use std::path::Path;
use std::sync::Arc;

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use super::to_py_err;
use crate::io;
use crate::signal::{apply, FilterConfig, FilterMethod, TimeSeries};

/// Map the front end's filter selector onto a validated configuration.
///
/// The method labels are the combo-box strings the dialogs use.
pub(crate) fn parse_filter(method: &str, eop: f64, parameter: f64) -> PyResult<FilterConfig> {
    let method = match method {
        "None" => FilterMethod::None,
        "cosine" => FilterMethod::Cosine { exponent: parameter },
        "Gaussian" => FilterMethod::Gaussian { sigma: parameter },
        "Exponential Decay" => FilterMethod::ExponentialDecay { rate: parameter },
        "Hanning" => FilterMethod::Hanning,
        "Welch" => FilterMethod::Welch,
        "Bartlett" => FilterMethod::Bartlett,
        other => {
            return Err(PyValueError::new_err(format!(
                "unknown filter method {other:?}"
            )))
        }
    };
    FilterConfig::new(method, eop).map_err(to_py_err)
}

/// Validated total_current data exposed to Python
#[pyclass(name = "TimeSeries")]
pub struct PyTimeSeries {
    pub(crate) series: Arc<TimeSeries>,
}

#[pymethods]
impl PyTimeSeries {
    /// Build a series from raw columns
    ///
    /// Args:
    ///     t: Time samples [a.u.]
    ///     jx: x current component
    ///     jy: y current component
    #[new]
    fn new(
        t: PyReadonlyArray1<f64>,
        jx: PyReadonlyArray1<f64>,
        jy: PyReadonlyArray1<f64>,
    ) -> PyResult<Self> {
        let series = TimeSeries::new(
            t.as_slice()?.to_vec(),
            jx.as_slice()?.to_vec(),
            jy.as_slice()?.to_vec(),
        )
        .map_err(to_py_err)?;
        Ok(Self {
            series: Arc::new(series),
        })
    }

    /// Load a total_current file
    #[staticmethod]
    fn load(path: &str) -> PyResult<Self> {
        let series = io::load_total_current(Path::new(path)).map_err(to_py_err)?;
        Ok(Self {
            series: Arc::new(series),
        })
    }

    /// Load every stride-th row of a total_current file
    #[staticmethod]
    #[pyo3(signature = (path, stride=3))]
    fn load_decimated(path: &str, stride: usize) -> PyResult<Self> {
        let series = io::load_decimated(Path::new(path), stride).map_err(to_py_err)?;
        Ok(Self {
            series: Arc::new(series),
        })
    }

    /// Time samples [a.u.]
    fn t<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, self.series.t())
    }

    /// x current, baseline-subtracted
    fn jx<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, self.series.jx())
    }

    /// y current, baseline-subtracted
    fn jy<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, self.series.jy())
    }

    /// Time step [a.u.]
    fn dt(&self) -> f64 {
        self.series.dt()
    }

    fn __len__(&self) -> usize {
        self.series.len()
    }

    /// Apply an end-of-pulse window and return the conditioned currents
    ///
    /// Args:
    ///     method: Filter method label
    ///     eop: Fraction of the window left untouched
    ///     parameter: Method-specific parameter (exponent, sigma or rate)
    #[pyo3(signature = (method="None", eop=1.0, parameter=0.0))]
    fn windowed<'py>(
        &self,
        py: Python<'py>,
        method: &str,
        eop: f64,
        parameter: f64,
    ) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
        let config = parse_filter(method, eop, parameter)?;
        let (hx, hy) = apply(self.series.t(), self.series.jx(), self.series.jy(), &config);
        Ok((PyArray1::from_vec(py, hx), PyArray1::from_vec(py, hy)))
    }
}
