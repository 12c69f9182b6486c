//! End-of-pulse window filters for the total current
//!
//! Suppresses the truncation artifact at the end of the simulated window
//! without disturbing the early transient: only samples past
//! `ii = floor(eop * N)` are tapered, earlier samples are untouched.

use std::f64::consts::PI;

use crate::error::CoreError;

/// Window method together with its method-specific parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterMethod {
    /// Pass the signal through unchanged.
    None,
    /// Cosine-power taper `cos(0.5*pi*(t - t_ii)/(t_end - t_ii))^exponent`.
    Cosine { exponent: f64 },
    /// Gaussian decay `exp(-(t - t_ii)^2 / (2 sigma^2))`.
    Gaussian { sigma: f64 },
    /// Exponential decay `exp(-rate * (t - t_ii))`.
    ExponentialDecay { rate: f64 },
    /// Hanning window over the tail.
    Hanning,
    /// Welch (parabolic) window over the tail.
    Welch,
    /// Bartlett (triangular) window over the tail.
    Bartlett,
}

/// Filter settings: the window method plus the End-of-Pulse fraction, the
/// share of the time window left untouched before tapering begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    method: FilterMethod,
    eop: f64,
}

impl FilterConfig {
    /// Validate and build a filter configuration.
    ///
    /// # Errors
    /// `Precondition` - `eop` outside `[0, 1]` or a non-finite / non-positive
    /// method parameter
    pub fn new(method: FilterMethod, eop: f64) -> Result<Self, CoreError> {
        if !(0.0..=1.0).contains(&eop) {
            return Err(CoreError::Precondition(format!(
                "EoP must lie in [0, 1], got {eop}"
            )));
        }
        match method {
            FilterMethod::Cosine { exponent } if !exponent.is_finite() || exponent < 0.0 => {
                return Err(CoreError::Precondition(format!(
                    "cosine exponent must be finite and non-negative, got {exponent}"
                )));
            }
            FilterMethod::Gaussian { sigma } if !(sigma > 0.0) || !sigma.is_finite() => {
                return Err(CoreError::Precondition(format!(
                    "Gaussian sigma must be positive, got {sigma}"
                )));
            }
            FilterMethod::ExponentialDecay { rate } if !rate.is_finite() || rate < 0.0 => {
                return Err(CoreError::Precondition(format!(
                    "decay rate must be finite and non-negative, got {rate}"
                )));
            }
            _ => {}
        }
        Ok(Self { method, eop })
    }

    /// Pass-through configuration.
    pub fn none() -> Self {
        Self {
            method: FilterMethod::None,
            eop: 1.0,
        }
    }

    pub fn method(&self) -> FilterMethod {
        self.method
    }

    pub fn eop(&self) -> f64 {
        self.eop
    }

    /// Index of the first tapered sample.
    fn taper_start(&self, n: usize) -> usize {
        (self.eop * n as f64) as usize
    }
}

/// Apply the configured window to both current components.
pub fn apply(t: &[f64], jx: &[f64], jy: &[f64], config: &FilterConfig) -> (Vec<f64>, Vec<f64>) {
    let mut hx = jx.to_vec();
    let mut hy = jy.to_vec();
    taper(t, config, &mut [&mut hx, &mut hy]);
    (hx, hy)
}

/// Apply the configured window to the currents and their derivatives.
///
/// The derivative arrays receive the *same* multiplier as the currents, not
/// the window of the differentiated signal. This is the convention the
/// reference outputs were produced with.
pub fn apply_with_derivative(
    t: &[f64],
    jx: &[f64],
    jy: &[f64],
    djx: &[f64],
    djy: &[f64],
    config: &FilterConfig,
) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut hx = jx.to_vec();
    let mut hy = jy.to_vec();
    let mut dhx = djx.to_vec();
    let mut dhy = djy.to_vec();
    taper(t, config, &mut [&mut hx, &mut hy, &mut dhx, &mut dhy]);
    (hx, hy, dhx, dhy)
}

fn taper(t: &[f64], config: &FilterConfig, signals: &mut [&mut Vec<f64>]) {
    if config.method == FilterMethod::None {
        return;
    }
    let n = t.len();
    let ii = config.taper_start(n);
    if ii >= n {
        return;
    }
    let window = tail_window(t, ii, config.method);
    for signal in signals.iter_mut() {
        for (k, w) in window.iter().enumerate() {
            signal[ii + k] *= w;
        }
    }
}

/// Window multipliers for the tail `t[ii..]`.
fn tail_window(t: &[f64], ii: usize, method: FilterMethod) -> Vec<f64> {
    let n = t.len();
    let tail = (n - ii) as f64;
    let t_ii = t[ii];
    let t_end = t[n - 1];

    (0..n - ii)
        .map(|k| {
            let ti = t[ii + k];
            let kf = k as f64;
            match method {
                FilterMethod::None => 1.0,
                FilterMethod::Cosine { exponent } => {
                    (0.5 * PI * (ti - t_ii) / (t_end - t_ii)).cos().powf(exponent)
                }
                FilterMethod::Gaussian { sigma } => {
                    (-(ti - t_ii).powi(2) / (2.0 * sigma * sigma)).exp()
                }
                FilterMethod::ExponentialDecay { rate } => (-rate * (ti - t_ii)).exp(),
                FilterMethod::Hanning => 0.5 * (1.0 - (2.0 * PI * kf / tail).cos()),
                FilterMethod::Welch => {
                    let half = (tail - 1.0) / 2.0;
                    1.0 - ((kf - half) / half).powi(2)
                }
                FilterMethod::Bartlett => 1.0 - ((kf - 0.5 * tail) / (0.5 * tail)).abs(),
            }
        })
        .collect()
}
