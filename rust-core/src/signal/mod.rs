//! Time-domain signal handling: current samples and end-of-pulse windows

pub mod series;
pub mod window;

pub use series::{gradient, TimeSeries};
pub use window::{apply, apply_with_derivative, FilterConfig, FilterMethod};
