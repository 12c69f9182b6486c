//! Spectral analysis over a physically anchored frequency grid

pub mod grid;
pub mod metrics;
pub mod transform;

pub use grid::FrequencyGrid;
pub use metrics::{band_yield, ellipticity, phase, BandYield, PhaseSpectra};
pub use transform::{
    direct_transform, inverse_transform, trapz, KernelSign, Spectra, SpectralAmplitude,
};
