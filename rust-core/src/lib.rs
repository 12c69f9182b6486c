//! Attoscience Studio - Spectral Analysis Core
//!
//! Harmonic spectra, attosecond pulse reconstruction, time-frequency maps
//! and the minimum-pulse-width search over simulated driving-field currents,
//! with Python bindings for the desktop front end.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod constants;
pub mod error;
pub mod gabor;
pub mod io;
pub mod pulse;
pub mod python_bindings;
pub mod signal;
pub mod spectrum;

pub use error::CoreError;
pub use gabor::{GaborConfig, TimeFrequencyMap};
pub use pulse::{MpwEvent, MpwHandle, MpwParams, OptimizationResult, PulseProfile, ReconstructionMethod};
pub use signal::{FilterConfig, FilterMethod, TimeSeries};
pub use spectrum::{FrequencyGrid, SpectralAmplitude};
