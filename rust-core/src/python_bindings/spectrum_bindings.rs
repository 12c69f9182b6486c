//! Python bindings for harmonic spectrum analysis

use numpy::PyArray1;
use pyo3::prelude::*;

use super::signal_bindings::{parse_filter, PyTimeSeries};
use super::to_py_err;
use crate::constants::ATOMIC_TIME_SECONDS;
use crate::signal::apply;
use crate::spectrum::{band_yield, ellipticity, phase, FrequencyGrid, SpectralAmplitude};

/// Harmonic spectrum of a current exposed to Python
#[pyclass(name = "HarmonicSpectrum")]
pub struct PyHarmonicSpectrum {
    amplitude: SpectralAmplitude,
}

#[pymethods]
impl PyHarmonicSpectrum {
    /// Window the current and transform it onto a harmonic-order grid
    ///
    /// Args:
    ///     series: Input current
    ///     lambda0_nm: Driving wavelength [nm]
    ///     qstart: Lowest harmonic order
    ///     qend: Highest harmonic order
    ///     d_omega: Grid step [a.u.]
    ///     derivative: Transform the time derivative (acceleration form)
    ///     method: Filter method label
    ///     eop: Fraction of the window left untouched
    ///     parameter: Method-specific filter parameter
    #[new]
    #[pyo3(signature = (
        series, lambda0_nm, qstart, qend,
        d_omega=0.001, derivative=false, method="None", eop=1.0, parameter=0.0
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        series: &PyTimeSeries,
        lambda0_nm: f64,
        qstart: f64,
        qend: f64,
        d_omega: f64,
        derivative: bool,
        method: &str,
        eop: f64,
        parameter: f64,
    ) -> PyResult<Self> {
        let config = parse_filter(method, eop, parameter)?;
        let grid = FrequencyGrid::from_wavelength(lambda0_nm, qstart, qend, d_omega)
            .map_err(to_py_err)?;
        let inner = &series.series;
        let (hx, hy) = apply(inner.t(), inner.jx(), inner.jy(), &config);
        let amplitude = SpectralAmplitude::compute(inner.t(), &hx, &hy, grid, derivative);
        Ok(Self { amplitude })
    }

    /// Grid frequencies [a.u.]
    fn omegas<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, self.amplitude.grid().values())
    }

    /// Grid frequencies as harmonic orders
    fn harmonic_orders<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_vec(py, self.amplitude.grid().harmonic_orders())
    }

    /// Fundamental frequency [a.u.]
    fn omega0(&self) -> f64 {
        self.amplitude.grid().omega0()
    }

    /// Optical period [a.u.]
    fn period(&self) -> f64 {
        self.amplitude.grid().period()
    }

    /// Optical period [s]
    fn period_seconds(&self) -> f64 {
        self.amplitude.grid().period() * ATOMIC_TIME_SECONDS
    }

    /// Log spectra (Sx, Sy, S)
    fn log_spectra<'py>(
        &self,
        py: Python<'py>,
    ) -> (
        &'py PyArray1<f64>,
        &'py PyArray1<f64>,
        &'py PyArray1<f64>,
    ) {
        let spectra = self.amplitude.log_spectra();
        (
            PyArray1::from_vec(py, spectra.x),
            PyArray1::from_vec(py, spectra.y),
            PyArray1::from_vec(py, spectra.total),
        )
    }

    /// Integrated yield over a harmonic sub-band, (x, y, total)
    fn band_yield(&self, q_lo: f64, q_hi: f64) -> PyResult<(f64, f64, f64)> {
        let result = band_yield(&self.amplitude, q_lo, q_hi).map_err(to_py_err)?;
        Ok((result.x, result.y, result.total))
    }

    /// Polarization ellipticity over a harmonic sub-band
    fn ellipticity<'py>(
        &self,
        py: Python<'py>,
        q_lo: f64,
        q_hi: f64,
    ) -> PyResult<&'py PyArray1<f64>> {
        let eps = ellipticity(&self.amplitude, q_lo, q_hi).map_err(to_py_err)?;
        Ok(PyArray1::from_vec(py, eps))
    }

    /// Spectral phases over a harmonic sub-band
    ///
    /// Returns:
    ///     (x_rad, y_rad, total_rad, x_deg, y_deg, total_deg, intensity)
    #[allow(clippy::type_complexity)]
    fn phase<'py>(
        &self,
        py: Python<'py>,
        q_lo: f64,
        q_hi: f64,
    ) -> PyResult<(
        &'py PyArray1<f64>,
        &'py PyArray1<f64>,
        &'py PyArray1<f64>,
        &'py PyArray1<f64>,
        &'py PyArray1<f64>,
        &'py PyArray1<f64>,
        &'py PyArray1<f64>,
    )> {
        let spectra = phase(&self.amplitude, q_lo, q_hi).map_err(to_py_err)?;
        Ok((
            PyArray1::from_vec(py, spectra.x_rad),
            PyArray1::from_vec(py, spectra.y_rad),
            PyArray1::from_vec(py, spectra.total_rad),
            PyArray1::from_vec(py, spectra.x_deg),
            PyArray1::from_vec(py, spectra.y_deg),
            PyArray1::from_vec(py, spectra.total_deg),
            PyArray1::from_vec(py, spectra.intensity),
        ))
    }
}
