//! Harmonic-order-aligned frequency grid
//!
//! The grid is anchored to the driving field, not to the sample count: it
//! spans `[qstart*w0, qend*w0]` at an arbitrary step, so spectra can be
//! evaluated at fractional harmonic orders.

use crate::constants::{ATOMIC_TIME_SECONDS, OMEGA_AU_NM};
use crate::error::CoreError;

/// Frequency grid derived from the driving wavelength.
#[derive(Debug, Clone)]
pub struct FrequencyGrid {
    omega0: f64,
    period: f64,
    values: Vec<f64>,
}

impl FrequencyGrid {
    /// Build a grid over harmonic orders `[qstart, qend]` with step `d_omega`
    /// (in atomic units).
    ///
    /// The values follow half-open range semantics anchored at
    /// `qstart * w0`: `w_k = qstart*w0 + k*d_omega` for every
    /// `w_k < qend*w0 + d_omega`, so the last element may fall short of
    /// `qend * w0`.
    ///
    /// # Errors
    /// `Precondition` - wavelength outside `(0, 10000]` nm, harmonic bounds
    /// not satisfying `qend > qstart > 0`, or a non-positive step
    pub fn from_wavelength(
        lambda0_nm: f64,
        qstart: f64,
        qend: f64,
        d_omega: f64,
    ) -> Result<Self, CoreError> {
        if !(lambda0_nm > 0.0 && lambda0_nm <= 10_000.0) {
            return Err(CoreError::Precondition(format!(
                "driving wavelength must lie in (0, 10000] nm, got {lambda0_nm}"
            )));
        }
        if !(qstart > 0.0) || qend <= qstart {
            return Err(CoreError::Precondition(format!(
                "harmonic bounds must satisfy qend > qstart > 0, got [{qstart}, {qend}]"
            )));
        }
        if !(d_omega > 0.0) {
            return Err(CoreError::Precondition(format!(
                "frequency step must be positive, got {d_omega}"
            )));
        }

        let omega0 = OMEGA_AU_NM / lambda0_nm;
        let period = 2.0 * std::f64::consts::PI / omega0;
        let wmin = qstart * omega0;
        let wmax = qend * omega0;
        let count = ((wmax + d_omega - wmin) / d_omega).ceil() as usize;
        let values = (0..count).map(|k| wmin + k as f64 * d_omega).collect();

        Ok(Self {
            omega0,
            period,
            values,
        })
    }

    /// Fundamental frequency `w0` [a.u.].
    pub fn omega0(&self) -> f64 {
        self.omega0
    }

    /// Optical period `T = 2 pi / w0` [a.u.].
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Optical period in seconds.
    pub fn period_seconds(&self) -> f64 {
        self.period * ATOMIC_TIME_SECONDS
    }

    /// Grid frequencies [a.u.].
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Grid frequencies expressed as harmonic orders `w / w0`.
    pub fn harmonic_orders(&self) -> Vec<f64> {
        self.values.iter().map(|&w| w / self.omega0).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_grid_spans_requested_band() {
        let grid = FrequencyGrid::from_wavelength(800.0, 1.0, 5.0, 0.01 * OMEGA_AU_NM / 800.0)
            .unwrap();
        let w0 = OMEGA_AU_NM / 800.0;
        assert_relative_eq!(grid.values()[0], w0, epsilon = 1e-12);
        let last = *grid.values().last().unwrap();
        assert!(last >= 5.0 * w0 - 1e-9);
        assert!(last < 5.0 * w0 + 0.011 * w0);
    }

    #[test]
    fn test_grid_is_monotone_with_uniform_step() {
        let grid = FrequencyGrid::from_wavelength(2000.0, 2.0, 9.0, 0.003).unwrap();
        let values = grid.values();
        for pair in values.windows(2) {
            assert_relative_eq!(pair[1] - pair[0], 0.003, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_period_matches_frequency() {
        let grid = FrequencyGrid::from_wavelength(800.0, 1.0, 2.0, 0.01).unwrap();
        assert_relative_eq!(grid.omega0() * grid.period(), 2.0 * std::f64::consts::PI);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        assert!(FrequencyGrid::from_wavelength(0.0, 1.0, 5.0, 0.01).is_err());
        assert!(FrequencyGrid::from_wavelength(10_001.0, 1.0, 5.0, 0.01).is_err());
        assert!(FrequencyGrid::from_wavelength(800.0, 0.0, 5.0, 0.01).is_err());
        assert!(FrequencyGrid::from_wavelength(800.0, 5.0, 5.0, 0.01).is_err());
        assert!(FrequencyGrid::from_wavelength(800.0, 1.0, 5.0, 0.0).is_err());
    }

    #[test]
    fn test_harmonic_orders_normalized() {
        let grid = FrequencyGrid::from_wavelength(800.0, 1.0, 3.0, 0.005).unwrap();
        let orders = grid.harmonic_orders();
        assert_relative_eq!(orders[0], 1.0, epsilon = 1e-12);
        assert!(*orders.last().unwrap() >= 3.0 - 1e-9);
    }
}
