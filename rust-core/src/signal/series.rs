//! Time-domain current samples
//!
//! Immutable once constructed; safe to share read-only across worker threads.

use crate::error::CoreError;

/// Uniformly sampled `(t, jx, jy)` current from a simulation run.
///
/// Baseline subtraction (`j - j[0]`) is applied at construction, matching the
/// convention used on every analysis path.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    t: Vec<f64>,
    jx: Vec<f64>,
    jy: Vec<f64>,
    dt: f64,
}

impl TimeSeries {
    /// Validate and build a series from raw columns.
    ///
    /// # Errors
    /// * `InvalidInput` - fewer than 2 samples, mismatched column lengths, or
    ///   both current components identically zero after baseline subtraction
    /// * `Precondition` - non-positive time step
    pub fn new(t: Vec<f64>, jx: Vec<f64>, jy: Vec<f64>) -> Result<Self, CoreError> {
        if t.len() < 2 {
            return Err(CoreError::InvalidInput(format!(
                "at least 2 samples required, got {}",
                t.len()
            )));
        }
        if jx.len() != t.len() || jy.len() != t.len() {
            return Err(CoreError::InvalidInput(format!(
                "column lengths differ: t={}, jx={}, jy={}",
                t.len(),
                jx.len(),
                jy.len()
            )));
        }

        let dt = t[1] - t[0];
        if !(dt > 0.0) {
            return Err(CoreError::Precondition(format!(
                "time step must be positive, got {dt}"
            )));
        }

        let jx0 = jx[0];
        let jy0 = jy[0];
        let jx: Vec<f64> = jx.iter().map(|&v| v - jx0).collect();
        let jy: Vec<f64> = jy.iter().map(|&v| v - jy0).collect();

        if jx.iter().all(|&v| v == 0.0) && jy.iter().all(|&v| v == 0.0) {
            return Err(CoreError::InvalidInput(
                "both jx and jy values are zero".into(),
            ));
        }

        Ok(Self { t, jx, jy, dt })
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn t(&self) -> &[f64] {
        &self.t
    }

    pub fn jx(&self) -> &[f64] {
        &self.jx
    }

    pub fn jy(&self) -> &[f64] {
        &self.jy
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Time derivatives of both components, baseline-subtracted like the
    /// currents themselves.
    pub fn derivatives(&self) -> (Vec<f64>, Vec<f64>) {
        let mut djx = gradient(&self.jx, self.dt);
        let mut djy = gradient(&self.jy, self.dt);
        let djx0 = djx[0];
        let djy0 = djy[0];
        for v in djx.iter_mut() {
            *v -= djx0;
        }
        for v in djy.iter_mut() {
            *v -= djy0;
        }
        (djx, djy)
    }
}

/// Finite-difference derivative: centered in the interior, one-sided at the
/// boundaries.
pub fn gradient(y: &[f64], dt: f64) -> Vec<f64> {
    let n = y.len();
    let mut g = vec![0.0; n];
    if n < 2 {
        return g;
    }
    g[0] = (y[1] - y[0]) / dt;
    g[n - 1] = (y[n - 1] - y[n - 2]) / dt;
    for i in 1..n - 1 {
        g[i] = (y[i + 1] - y[i - 1]) / (2.0 * dt);
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(n: usize, dt: f64) -> Vec<f64> {
        (0..n).map(|i| i as f64 * dt).collect()
    }

    #[test]
    fn test_baseline_subtraction() {
        let t = ramp(4, 0.5);
        let series = TimeSeries::new(t, vec![2.0, 3.0, 4.0, 5.0], vec![0.0; 4]).unwrap();
        assert_eq!(series.jx(), &[0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_rejects_short_series() {
        let err = TimeSeries::new(vec![0.0], vec![1.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_zero_currents() {
        // Constant columns collapse to zero after baseline subtraction
        let t = ramp(5, 0.1);
        let err = TimeSeries::new(t, vec![7.0; 5], vec![-1.0; 5]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_nonpositive_step() {
        let err =
            TimeSeries::new(vec![1.0, 1.0, 1.0], vec![0.0, 1.0, 2.0], vec![0.0; 3]).unwrap_err();
        assert!(matches!(err, CoreError::Precondition(_)));
    }

    #[test]
    fn test_gradient_of_parabola() {
        // y = t^2 has exact centered differences 2t in the interior
        let dt = 0.1;
        let t = ramp(11, dt);
        let y: Vec<f64> = t.iter().map(|&ti| ti * ti).collect();
        let g = gradient(&y, dt);
        for i in 1..10 {
            assert_relative_eq!(g[i], 2.0 * t[i], epsilon = 1e-12);
        }
        // one-sided at the ends
        assert_relative_eq!(g[0], (y[1] - y[0]) / dt, epsilon = 1e-15);
        assert_relative_eq!(g[10], (y[10] - y[9]) / dt, epsilon = 1e-15);
    }

    #[test]
    fn test_derivatives_start_at_zero() {
        let t = ramp(50, 0.1);
        let jx: Vec<f64> = t.iter().map(|&ti| (2.0 * ti).sin()).collect();
        let series = TimeSeries::new(t, jx, vec![0.0; 50]).unwrap();
        let (djx, djy) = series.derivatives();
        assert_eq!(djx[0], 0.0);
        assert_eq!(djy[0], 0.0);
    }
}
