//! Python bindings for the time-frequency map

use numpy::{PyArray1, PyArray2};
use pyo3::prelude::*;

use super::signal_bindings::{parse_filter, PyTimeSeries};
use super::to_py_err;
use crate::gabor::{time_frequency_map, GaborConfig, TimeFrequencyMap};

/// Gabor map exposed to Python
#[pyclass(name = "TimeFrequencyMap")]
pub struct PyTimeFrequencyMap {
    map: TimeFrequencyMap,
}

#[pymethods]
impl PyTimeFrequencyMap {
    /// Compute the Gabor map of the windowed current
    ///
    /// Args:
    ///     series: Input current
    ///     lambda0_nm: Driving wavelength [nm]
    ///     qstart: Lowest harmonic order
    ///     qend: Highest harmonic order
    ///     g_factor: Window-width divisor, sigma = T0 / g_factor
    ///     method: Filter method label
    ///     eop: Fraction of the window left untouched
    ///     parameter: Method-specific filter parameter
    #[new]
    #[pyo3(signature = (
        series, lambda0_nm, qstart, qend, g_factor=3.0,
        method="None", eop=1.0, parameter=0.0
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        series: &PyTimeSeries,
        lambda0_nm: f64,
        qstart: f64,
        qend: f64,
        g_factor: f64,
        method: &str,
        eop: f64,
        parameter: f64,
    ) -> PyResult<Self> {
        let filter = parse_filter(method, eop, parameter)?;
        let config = GaborConfig {
            lambda0_nm,
            qstart,
            qend,
            g_factor,
        };
        let map = time_frequency_map(&series.series, &filter, &config).map_err(to_py_err)?;
        Ok(Self { map })
    }

    /// Time samples [a.u.]
    fn t<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, self.map.t())
    }

    /// Grid frequencies [a.u.]
    fn omegas<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, self.map.omegas())
    }

    /// Grid frequencies as harmonic orders
    fn harmonic_orders<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_vec(py, self.map.harmonic_orders())
    }

    /// Gaussian window width [a.u.]
    fn sigma(&self) -> f64 {
        self.map.sigma()
    }

    /// Optical period [a.u.]
    fn period(&self) -> f64 {
        self.map.period()
    }

    /// log10 |Ax|, (time, frequency) indexed
    fn log_x<'py>(&self, py: Python<'py>) -> &'py PyArray2<f64> {
        PyArray2::from_array(py, self.map.log_x())
    }

    /// log10 |Ay|, (time, frequency) indexed
    fn log_y<'py>(&self, py: Python<'py>) -> &'py PyArray2<f64> {
        PyArray2::from_array(py, self.map.log_y())
    }

    /// log10 of the combined magnitude, (time, frequency) indexed
    fn log_total<'py>(&self, py: Python<'py>) -> &'py PyArray2<f64> {
        PyArray2::from_array(py, self.map.log_total())
    }
}
