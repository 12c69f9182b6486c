//! Attosecond pulse reconstruction and minimum-pulse-width search

pub mod mpw;
pub mod reconstruct;

pub use mpw::{
    evaluate_band, spawn, BandEvaluation, MpwEvent, MpwHandle, MpwParams, OptimizationResult,
    DEFAULT_POOL_WIDTH,
};
pub use reconstruct::{fwhm, reconstruct, FwhmMeasurement, PulseProfile, ReconstructionMethod};
