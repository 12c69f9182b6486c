//! Physical constants and unit conversions
//!
//! Single home for the literals shared by every transform; values follow the
//! CODATA figures used when the reference outputs were produced.

/// Speed of light [m/s].
pub const C_LIGHT: f64 = 299_792_458.0;

/// Reduced Planck constant [J s].
pub const HBAR: f64 = 1.054_571_8e-34;

/// Electron rest mass [kg].
pub const ELECTRON_MASS: f64 = 9.109_383_56e-31;

/// Inverse fine-structure constant.
pub const INVERSE_FINE_STRUCTURE: f64 = 137.035_999_139;

/// Fine-structure constant.
pub const FINE_STRUCTURE: f64 = 1.0 / INVERSE_FINE_STRUCTURE;

/// Bohr radius [m].
pub const BOHR_RADIUS: f64 = HBAR * INVERSE_FINE_STRUCTURE / (C_LIGHT * ELECTRON_MASS);

/// One atomic unit of time [s].
pub const ATOMIC_TIME_SECONDS: f64 = 2.418_884_326_509e-17;

/// Wavelength-to-frequency conversion: `w0 [a.u.] = OMEGA_AU_NM / lambda0 [nm]`.
pub const OMEGA_AU_NM: f64 = 45.5633;

/// Floor applied to the linear spectra `w^2 |D|^2` before taking log10.
pub const SPECTRAL_FLOOR: f64 = 1e-16;

/// Seconds to attoseconds.
pub const ATTOSECONDS_PER_SECOND: f64 = 1e18;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_constants() {
        // Bohr radius ~ 0.529 angstrom
        assert!((BOHR_RADIUS - 5.29e-11).abs() < 0.01e-11);
        assert!((FINE_STRUCTURE - 7.297e-3).abs() < 0.001e-3);
    }

    #[test]
    fn test_wavelength_conversion() {
        // 800 nm Ti:sapphire line: w0 ~ 0.057 a.u.
        let w0 = OMEGA_AU_NM / 800.0;
        assert!((w0 - 0.05695).abs() < 1e-4);
    }
}
