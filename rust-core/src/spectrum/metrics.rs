//! Scalar metrics derived from a computed spectrum
//!
//! Pure functions over a `SpectralAmplitude`; every metric takes the
//! requested harmonic sub-band and fails fast when it falls outside the
//! computed grid.

use num_complex::Complex64;

use crate::error::CoreError;
use crate::spectrum::transform::{trapz, SpectralAmplitude};

/// Harmonic yield integrated over a sub-band, per axis and combined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandYield {
    pub x: f64,
    pub y: f64,
    pub total: f64,
}

/// Spectral phases in radians and degrees plus the combined intensity used
/// for visualization weighting.
#[derive(Debug, Clone)]
pub struct PhaseSpectra {
    pub x_rad: Vec<f64>,
    pub y_rad: Vec<f64>,
    pub total_rad: Vec<f64>,
    pub x_deg: Vec<f64>,
    pub y_deg: Vec<f64>,
    pub total_deg: Vec<f64>,
    pub intensity: Vec<f64>,
}

const BAND_TOLERANCE: f64 = 1e-9;

/// Index range of the grid points whose harmonic order lies in `[q_lo, q_hi]`.
fn band_range(
    amplitude: &SpectralAmplitude,
    q_lo: f64,
    q_hi: f64,
) -> Result<std::ops::Range<usize>, CoreError> {
    if q_hi <= q_lo {
        return Err(CoreError::Precondition(format!(
            "sub-band bounds must satisfy q_hi > q_lo, got [{q_lo}, {q_hi}]"
        )));
    }
    let orders = amplitude.grid().harmonic_orders();
    let first = orders[0];
    let last = orders[orders.len() - 1];
    if q_lo < first - BAND_TOLERANCE || q_hi > last + BAND_TOLERANCE {
        return Err(CoreError::Precondition(format!(
            "requested sub-band [{q_lo}, {q_hi}] exceeds computed grid [{first}, {last}]"
        )));
    }

    let start = orders
        .iter()
        .position(|&q| q >= q_lo - BAND_TOLERANCE)
        .unwrap_or(orders.len());
    let end = orders
        .iter()
        .rposition(|&q| q <= q_hi + BAND_TOLERANCE)
        .map(|i| i + 1)
        .unwrap_or(0);
    if end.saturating_sub(start) < 2 {
        return Err(CoreError::Precondition(format!(
            "sub-band [{q_lo}, {q_hi}] covers fewer than 2 grid points"
        )));
    }
    Ok(start..end)
}

/// Trapezoidal integral of the linear spectra `w^2 |D|^2` over the
/// harmonic-order axis, restricted to `[q_lo, q_hi]`.
pub fn band_yield(
    amplitude: &SpectralAmplitude,
    q_lo: f64,
    q_hi: f64,
) -> Result<BandYield, CoreError> {
    let range = band_range(amplitude, q_lo, q_hi)?;
    let orders = amplitude.grid().harmonic_orders();
    let linear = amplitude.linear_spectra();
    let axis = &orders[range.clone()];
    Ok(BandYield {
        x: trapz(&linear.x[range.clone()], axis),
        y: trapz(&linear.y[range.clone()], axis),
        total: trapz(&linear.total[range], axis),
    })
}

/// Polarization ellipticity per grid point:
/// `eps = (|D+| - |D-|) / (|D+| + |D-|)` with `D+- = (Dx +- i Dy)/sqrt(2)`.
pub fn ellipticity(
    amplitude: &SpectralAmplitude,
    q_lo: f64,
    q_hi: f64,
) -> Result<Vec<f64>, CoreError> {
    let range = band_range(amplitude, q_lo, q_hi)?;
    let inv_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
    Ok(amplitude.dx()[range.clone()]
        .iter()
        .zip(&amplitude.dy()[range])
        .map(|(dx, dy)| {
            let i_dy = Complex64::new(0.0, 1.0) * dy;
            let right = ((dx + i_dy) * inv_sqrt2).norm();
            let left = ((dx - i_dy) * inv_sqrt2).norm();
            (right - left) / (right + left)
        })
        .collect())
}

/// Spectral phases of `Dx`, `Dy` and `Dx + Dy` over the sub-band.
pub fn phase(
    amplitude: &SpectralAmplitude,
    q_lo: f64,
    q_hi: f64,
) -> Result<PhaseSpectra, CoreError> {
    let range = band_range(amplitude, q_lo, q_hi)?;
    let dx = &amplitude.dx()[range.clone()];
    let dy = &amplitude.dy()[range];

    let x_rad: Vec<f64> = dx.iter().map(|d| d.arg()).collect();
    let y_rad: Vec<f64> = dy.iter().map(|d| d.arg()).collect();
    let total_rad: Vec<f64> = dx.iter().zip(dy).map(|(a, b)| (a + b).arg()).collect();
    let intensity = dx.iter().zip(dy).map(|(a, b)| (a + b).norm()).collect();

    let to_deg = |v: &[f64]| v.iter().map(|r| r.to_degrees()).collect();
    Ok(PhaseSpectra {
        x_deg: to_deg(&x_rad),
        y_deg: to_deg(&y_rad),
        total_deg: to_deg(&total_rad),
        x_rad,
        y_rad,
        total_rad,
        intensity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::grid::FrequencyGrid;
    use approx::assert_relative_eq;

    const LAMBDA: f64 = 45.5633; // w0 = 1.0 a.u.

    fn time_axis(n: usize, dt: f64) -> Vec<f64> {
        (0..n).map(|i| i as f64 * dt).collect()
    }

    fn carrier_amplitude(jy_sign: f64) -> SpectralAmplitude {
        // ~20 cycles of a circularly polarized carrier at w = 1
        let t = time_axis(1257, 0.1);
        let jx: Vec<f64> = t.iter().map(|&ti| ti.cos()).collect();
        let jy: Vec<f64> = t.iter().map(|&ti| jy_sign * ti.sin()).collect();
        let grid = FrequencyGrid::from_wavelength(LAMBDA, 0.9, 1.1, 0.01).unwrap();
        SpectralAmplitude::compute(&t, &jx, &jy, grid, false)
    }

    #[test]
    fn test_band_yield_matches_manual_integral() {
        let t = time_axis(400, 0.1);
        let jx: Vec<f64> = t.iter().map(|&ti| (1.0 * ti).sin()).collect();
        let jy: Vec<f64> = t.iter().map(|&ti| (2.0 * ti).sin() * 0.5).collect();
        let grid = FrequencyGrid::from_wavelength(LAMBDA, 0.5, 3.0, 0.05).unwrap();
        let amp = SpectralAmplitude::compute(&t, &jx, &jy, grid, false);

        let orders = amp.grid().harmonic_orders();
        let full = band_yield(&amp, orders[0], *orders.last().unwrap()).unwrap();
        let linear = amp.linear_spectra();
        assert_relative_eq!(full.x, trapz(&linear.x, &orders), epsilon = 1e-12);
        assert_relative_eq!(full.y, trapz(&linear.y, &orders), epsilon = 1e-12);
        assert_relative_eq!(full.total, trapz(&linear.total, &orders), epsilon = 1e-12);

        // a narrower band integrates strictly less of the x spectrum
        let narrow = band_yield(&amp, 0.9, 1.1).unwrap();
        assert!(narrow.x < full.x);
        assert!(narrow.x > 0.0);
    }

    #[test]
    fn test_band_outside_grid_rejected() {
        let amp = carrier_amplitude(1.0);
        assert!(matches!(
            band_yield(&amp, 0.5, 1.0),
            Err(CoreError::Precondition(_))
        ));
        assert!(matches!(
            ellipticity(&amp, 1.0, 2.0),
            Err(CoreError::Precondition(_))
        ));
        assert!(matches!(
            phase(&amp, 2.0, 1.0),
            Err(CoreError::Precondition(_))
        ));
    }

    #[test]
    fn test_circular_polarization_ellipticity() {
        // jx = cos, jy = sin at the carrier: D+ cancels, eps -> -1;
        // flipping jy flips the sign.
        let amp = carrier_amplitude(1.0);
        let eps = ellipticity(&amp, 0.95, 1.05).unwrap();
        let mid = eps.len() / 2;
        assert!(eps[mid] < -0.9, "eps = {}", eps[mid]);

        let amp = carrier_amplitude(-1.0);
        let eps = ellipticity(&amp, 0.95, 1.05).unwrap();
        assert!(eps[mid] > 0.9, "eps = {}", eps[mid]);
    }

    #[test]
    fn test_phase_of_pure_cosine() {
        // With the positive kernel, D_x(w) of cos(wt) is dominated by the
        // real part; the phase at the carrier stays near zero.
        let t = time_axis(1257, 0.1);
        let jx: Vec<f64> = t.iter().map(|&ti| ti.cos()).collect();
        let jy = vec![0.0; t.len()];
        let grid = FrequencyGrid::from_wavelength(LAMBDA, 0.99, 1.01, 0.001).unwrap();
        let amp = SpectralAmplitude::compute(&t, &jx, &jy, grid, false);

        let spectra = phase(&amp, 0.99, 1.01).unwrap();
        let mid = spectra.x_rad.len() / 2;
        assert!(spectra.x_rad[mid].abs() < 0.1, "phase = {}", spectra.x_rad[mid]);
        assert_relative_eq!(
            spectra.x_deg[mid],
            spectra.x_rad[mid].to_degrees(),
            epsilon = 1e-12
        );
        assert!(spectra.intensity[mid] > 0.0);
    }
}
