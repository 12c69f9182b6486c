//! Time-frequency (Gabor) analysis of the conditioned current
//!
//! For every grid frequency the signal is demodulated by `e^{-i w t}` and
//! convolved with a truncated Gaussian, producing a joint map of harmonic
//! emission over time. Here the full 2D grid is needed, so the convolution
//! runs through the FFT instead of direct quadrature.

pub mod convolve;

use ndarray::Array2;
use rustfft::num_complex::Complex;

use crate::error::CoreError;
use crate::signal::{apply, FilterConfig, TimeSeries};
use crate::spectrum::grid::FrequencyGrid;
use convolve::KernelConvolver;

/// The Gaussian kernel is truncated at this many standard deviations.
pub const KERNEL_HALF_WIDTHS: f64 = 6.0;

/// `g_factor` values from here on trade away so much frequency resolution
/// that the map becomes unstable; flagged, not rejected.
pub const UNSTABLE_G_FACTOR: f64 = 15.0;

/// Gabor analysis parameters.
#[derive(Debug, Clone, Copy)]
pub struct GaborConfig {
    pub lambda0_nm: f64,
    pub qstart: f64,
    pub qend: f64,
    /// Window-width divisor: `sigma = T0 / g_factor`.
    pub g_factor: f64,
}

/// Joint time-frequency map, `(time sample, frequency bin)` indexed.
#[derive(Debug, Clone)]
pub struct TimeFrequencyMap {
    t: Vec<f64>,
    omegas: Vec<f64>,
    omega0: f64,
    period: f64,
    sigma: f64,
    log_x: Array2<f64>,
    log_y: Array2<f64>,
    log_total: Array2<f64>,
}

impl TimeFrequencyMap {
    pub fn t(&self) -> &[f64] {
        &self.t
    }

    pub fn omegas(&self) -> &[f64] {
        &self.omegas
    }

    pub fn harmonic_orders(&self) -> Vec<f64> {
        self.omegas.iter().map(|&w| w / self.omega0).collect()
    }

    pub fn omega0(&self) -> f64 {
        self.omega0
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    /// Gaussian window width [a.u.].
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// `log10 |Ax|`.
    pub fn log_x(&self) -> &Array2<f64> {
        &self.log_x
    }

    /// `log10 |Ay|`.
    pub fn log_y(&self) -> &Array2<f64> {
        &self.log_y
    }

    /// `log10 sqrt(|Ax|^2 + |Ay|^2)`.
    pub fn log_total(&self) -> &Array2<f64> {
        &self.log_total
    }
}

/// Compute the Gabor map of the windowed current.
///
/// # Errors
/// `Precondition` - non-positive `g_factor`, or invalid wavelength /
/// harmonic bounds
pub fn time_frequency_map(
    series: &TimeSeries,
    filter: &FilterConfig,
    config: &GaborConfig,
) -> Result<TimeFrequencyMap, CoreError> {
    if !(config.g_factor > 0.0) {
        return Err(CoreError::Precondition(format!(
            "g_factor must be positive, got {}",
            config.g_factor
        )));
    }
    if config.g_factor >= UNSTABLE_G_FACTOR {
        log::warn!(
            "g_factor {} >= {UNSTABLE_G_FACTOR}: time window much narrower than the optical \
             period, the map is likely unstable",
            config.g_factor
        );
    }

    let omega0_step = crate::constants::OMEGA_AU_NM / config.lambda0_nm / 2.0;
    let grid = FrequencyGrid::from_wavelength(
        config.lambda0_nm,
        config.qstart,
        config.qend,
        omega0_step,
    )?;
    let period = grid.period();
    let sigma = period / config.g_factor;

    let t = series.t();
    let dt = series.dt();
    let (hx, hy) = apply(t, series.jx(), series.jy(), filter);

    // Gaussian kernel truncated at +-6 sigma
    let half_kernel = (KERNEL_HALF_WIDTHS * sigma / dt).ceil() as i64;
    let kernel: Vec<f64> = (-half_kernel..=half_kernel)
        .map(|k| {
            let tau = k as f64 * dt;
            (-0.5 * tau * tau / (sigma * sigma)).exp()
        })
        .collect();

    let n_t = t.len();
    let n_w = grid.len();
    log::debug!(
        "Gabor map: {n_t} samples x {n_w} frequencies, kernel length {}",
        kernel.len()
    );

    let mut convolver = KernelConvolver::new(n_t, &kernel);
    let mut log_x = Array2::zeros((n_t, n_w));
    let mut log_y = Array2::zeros((n_t, n_w));
    let mut log_total = Array2::zeros((n_t, n_w));

    let mut modulated = vec![Complex::new(0.0, 0.0); n_t];
    for (iw, &w) in grid.values().iter().enumerate() {
        for (i, &ti) in t.iter().enumerate() {
            modulated[i] = hx[i] * Complex::cis(-w * ti);
        }
        let ax = convolver.convolve(&modulated);

        for (i, &ti) in t.iter().enumerate() {
            modulated[i] = hy[i] * Complex::cis(-w * ti);
        }
        let ay = convolver.convolve(&modulated);

        for i in 0..n_t {
            let ax_abs = ax[i].norm() * dt;
            let ay_abs = ay[i].norm() * dt;
            log_x[(i, iw)] = ax_abs.log10();
            log_y[(i, iw)] = ay_abs.log10();
            log_total[(i, iw)] = (ax_abs * ax_abs + ay_abs * ay_abs).sqrt().log10();
        }
    }

    Ok(TimeFrequencyMap {
        t: t.to_vec(),
        omegas: grid.values().to_vec(),
        omega0: grid.omega0(),
        period,
        sigma,
        log_x,
        log_y,
        log_total,
    })
}
