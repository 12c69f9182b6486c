//! File input for simulation output

pub mod loader;

pub use loader::{load_decimated, load_total_current};
