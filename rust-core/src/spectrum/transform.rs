//! Direct quadrature transform of time-domain signals
//!
//! The forward transform is evaluated as a trapezoidal sum of
//! `s(t) e^{+-i w t}` for every grid frequency, not as an FFT. That costs
//! `O(N_t * N_w)` but allows a fractional, harmonic-order-aligned grid that
//! is completely independent of the sample count.

use num_complex::Complex64;

use crate::constants::SPECTRAL_FLOOR;
use crate::signal::gradient;
use crate::spectrum::grid::FrequencyGrid;

/// Sign of the exponent in the quadrature kernel `e^{sign * i w t}`.
///
/// The harmonic-spectrum path uses the positive kernel, the
/// pulse-reconstruction forward transform the negative one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelSign {
    Positive,
    Negative,
}

impl KernelSign {
    fn factor(self) -> f64 {
        match self {
            KernelSign::Positive => 1.0,
            KernelSign::Negative => -1.0,
        }
    }
}

/// Trapezoidal integral of `y` over `x`.
pub fn trapz(y: &[f64], x: &[f64]) -> f64 {
    let mut acc = 0.0;
    for i in 1..x.len() {
        acc += 0.5 * (y[i] + y[i - 1]) * (x[i] - x[i - 1]);
    }
    acc
}

/// `D(w_l) = integral of s(t) e^{sign * i w_l t} dt` for every `w_l`.
pub fn direct_transform(
    t: &[f64],
    signal: &[f64],
    omegas: &[f64],
    sign: KernelSign,
) -> Vec<Complex64> {
    let s = sign.factor();
    omegas
        .iter()
        .map(|&w| {
            let mut acc = Complex64::new(0.0, 0.0);
            let mut prev = signal[0] * Complex64::cis(s * w * t[0]);
            for i in 1..t.len() {
                let cur = signal[i] * Complex64::cis(s * w * t[i]);
                acc += (prev + cur) * (0.5 * (t[i] - t[i - 1]));
                prev = cur;
            }
            acc
        })
        .collect()
}

/// Second quadrature back onto the time axis:
/// `I(t_j) = integral of a(w) e^{+i w t_j} dw` for every `t_j`.
pub fn inverse_transform(omegas: &[f64], amplitude: &[Complex64], t: &[f64]) -> Vec<Complex64> {
    t.iter()
        .map(|&tj| {
            let mut acc = Complex64::new(0.0, 0.0);
            let mut prev = amplitude[0] * Complex64::cis(omegas[0] * tj);
            for l in 1..omegas.len() {
                let cur = amplitude[l] * Complex64::cis(omegas[l] * tj);
                acc += (prev + cur) * (0.5 * (omegas[l] - omegas[l - 1]));
                prev = cur;
            }
            acc
        })
        .collect()
}

/// Complex spectral amplitudes of both current components over a grid.
#[derive(Debug, Clone)]
pub struct SpectralAmplitude {
    grid: FrequencyGrid,
    dx: Vec<Complex64>,
    dy: Vec<Complex64>,
}

/// Real spectra derived from the amplitudes, per axis and combined.
#[derive(Debug, Clone)]
pub struct Spectra {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub total: Vec<f64>,
}

impl SpectralAmplitude {
    /// Forward-transform both components onto the grid with the positive
    /// kernel, the harmonic-spectrum convention.
    ///
    /// In derivative (acceleration) mode a centered finite difference of
    /// each signal is transformed instead of the signal itself.
    pub fn compute(
        t: &[f64],
        sx: &[f64],
        sy: &[f64],
        grid: FrequencyGrid,
        derivative: bool,
    ) -> Self {
        let omegas = grid.values();
        let (dx, dy) = if derivative {
            let dt = t[1] - t[0];
            let gx = gradient(sx, dt);
            let gy = gradient(sy, dt);
            (
                direct_transform(t, &gx, omegas, KernelSign::Positive),
                direct_transform(t, &gy, omegas, KernelSign::Positive),
            )
        } else {
            (
                direct_transform(t, sx, omegas, KernelSign::Positive),
                direct_transform(t, sy, omegas, KernelSign::Positive),
            )
        };
        Self { grid, dx, dy }
    }

    pub fn grid(&self) -> &FrequencyGrid {
        &self.grid
    }

    pub fn dx(&self) -> &[Complex64] {
        &self.dx
    }

    pub fn dy(&self) -> &[Complex64] {
        &self.dy
    }

    pub fn len(&self) -> usize {
        self.dx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dx.is_empty()
    }

    /// Linear spectra `max(w^2 |D|^2, floor)`.
    pub fn linear_spectra(&self) -> Spectra {
        let w = self.grid.values();
        let floor = |v: f64| v.max(SPECTRAL_FLOOR);
        let x = self
            .dx
            .iter()
            .zip(w)
            .map(|(d, &wi)| floor(wi * wi * d.norm_sqr()))
            .collect();
        let y = self
            .dy
            .iter()
            .zip(w)
            .map(|(d, &wi)| floor(wi * wi * d.norm_sqr()))
            .collect();
        let total = self
            .dx
            .iter()
            .zip(&self.dy)
            .zip(w)
            .map(|((dx, dy), &wi)| floor(wi * wi * (dx + dy).norm_sqr()))
            .collect();
        Spectra { x, y, total }
    }

    /// Log spectra `log10(max(w^2 |D|^2, floor))`.
    pub fn log_spectra(&self) -> Spectra {
        let linear = self.linear_spectra();
        Spectra {
            x: linear.x.iter().map(|v| v.log10()).collect(),
            y: linear.y.iter().map(|v| v.log10()).collect(),
            total: linear.total.iter().map(|v| v.log10()).collect(),
        }
    }
}
