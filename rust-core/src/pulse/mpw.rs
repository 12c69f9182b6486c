//! Minimum pulse width search over harmonic sub-bands
//!
//! Brute-force enumeration of every integer band `[a, b]` with
//! `qstart <= a < b <= qmax`, each evaluated by the acceleration-form
//! reconstruction restricted to that band. The enumeration is embarrassingly
//! parallel: a fresh worker pool is created per invocation and driven from a
//! dedicated background thread, so the caller is never blocked and receives
//! exactly one terminal event on a channel.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Receiver};
use rayon::prelude::*;

use crate::constants::OMEGA_AU_NM;
use crate::error::CoreError;
use crate::pulse::reconstruct::fwhm;
use crate::signal::TimeSeries;
use crate::spectrum::grid::FrequencyGrid;
use crate::spectrum::transform::{direct_transform, inverse_transform, KernelSign};

/// Harmonic-order step of the search evaluator grid.
pub const SEARCH_GRID_STEP: f64 = 0.1;

/// Default worker pool width.
pub const DEFAULT_POOL_WIDTH: usize = 4;

/// Search parameters over the triangular `(a, b)` space.
#[derive(Debug, Clone)]
pub struct MpwParams {
    pub lambda0_nm: f64,
    pub qstart: u32,
    pub qmax: u32,
    pub pool_width: usize,
}

impl MpwParams {
    pub fn new(lambda0_nm: f64, qstart: u32, qmax: u32) -> Self {
        Self {
            lambda0_nm,
            qstart,
            qmax,
            pool_width: DEFAULT_POOL_WIDTH,
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        if !(self.lambda0_nm > 0.0 && self.lambda0_nm <= 10_000.0) {
            return Err(CoreError::Precondition(format!(
                "driving wavelength must lie in (0, 10000] nm, got {}",
                self.lambda0_nm
            )));
        }
        if self.qstart == 0 || self.qmax <= self.qstart {
            return Err(CoreError::Precondition(format!(
                "harmonic bounds must satisfy qmax > qstart > 0, got [{}, {}]",
                self.qstart, self.qmax
            )));
        }
        if self.pool_width == 0 {
            return Err(CoreError::Precondition(
                "worker pool width must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// One scalar evaluation of the search objective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandEvaluation {
    pub fwhm_attoseconds: f64,
    pub peak_optical_cycle: f64,
}

/// Argmin over the sub-band search space.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    pub qstart: u32,
    pub qmax: u32,
    pub fwhm_attoseconds: f64,
    pub peak_optical_cycle: f64,
    pub last_optical_cycle: f64,
    pub max_optical_cycle: f64,
}

/// Terminal event of one search invocation.
#[derive(Debug)]
pub enum MpwEvent {
    Completed(OptimizationResult),
    Failed(CoreError),
    Cancelled,
}

/// Handle to an in-flight search.
///
/// Dropping the handle cancels the search and joins the background thread.
pub struct MpwHandle {
    events: Receiver<MpwEvent>,
    cancel: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl MpwHandle {
    /// Non-blocking poll for the terminal event.
    pub fn try_recv(&self) -> Option<MpwEvent> {
        self.events.try_recv().ok()
    }

    /// Block until the terminal event arrives.
    pub fn recv(&self) -> MpwEvent {
        self.events.recv().unwrap_or_else(|_| {
            MpwEvent::Failed(CoreError::Computation(
                "search thread exited without reporting".into(),
            ))
        })
    }

    /// Cooperatively stop the search and tear down the pool and thread.
    ///
    /// Workers observe the flag before each evaluation; no partial result is
    /// reported. Repeated calls are no-ops.
    pub fn cancel(&mut self) {
        self.cancel.store(true, Ordering::SeqCst);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }

    /// True once the background thread has finished.
    pub fn is_finished(&self) -> bool {
        self.thread
            .as_ref()
            .map(|h| h.is_finished())
            .unwrap_or(true)
    }
}

impl Drop for MpwHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// FWHM and peak position of the pulse carried by the band `[q_lo, q_hi]`.
///
/// The evaluator is the acceleration-form reconstruction restricted to the
/// band: frequency-weighted forward transform of the raw current, inverse
/// quadrature onto the original samples, doubled-squared combined intensity.
pub fn evaluate_band(
    series: &TimeSeries,
    lambda0_nm: f64,
    q_lo: f64,
    q_hi: f64,
) -> Result<BandEvaluation, CoreError> {
    let omega0 = OMEGA_AU_NM / lambda0_nm;
    let grid =
        FrequencyGrid::from_wavelength(lambda0_nm, q_lo, q_hi, SEARCH_GRID_STEP * omega0)?;
    let t = series.t();
    let omegas = grid.values();

    let mut ax = direct_transform(t, series.jx(), omegas, KernelSign::Negative);
    let mut ay = direct_transform(t, series.jy(), omegas, KernelSign::Negative);
    for (l, &w) in omegas.iter().enumerate() {
        ax[l] *= w;
        ay[l] *= w;
    }

    let ix = inverse_transform(omegas, &ax, t);
    let iy = inverse_transform(omegas, &ay, t);
    let intensity: Vec<f64> = ix
        .iter()
        .zip(&iy)
        .map(|(x, y)| {
            let sum = x.norm_sqr() + y.norm_sqr();
            sum * sum
        })
        .collect();

    let measure = fwhm(&intensity, t, grid.period());
    Ok(BandEvaluation {
        fwhm_attoseconds: measure.width_attoseconds,
        peak_optical_cycle: measure.peak_optical_cycle,
    })
}

/// Launch the search on a fresh background thread.
///
/// Validation happens synchronously before anything is spawned; everything
/// after that is reported through the handle's event channel.
pub fn spawn(series: Arc<TimeSeries>, params: MpwParams) -> Result<MpwHandle, CoreError> {
    params.validate()?;

    let (tx, rx) = bounded(1);
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);

    let thread = std::thread::Builder::new()
        .name("mpw-search".into())
        .spawn(move || {
            let outcome =
                catch_unwind(AssertUnwindSafe(|| run_search(&series, &params, &flag)));
            let event = match outcome {
                Ok(Ok(result)) => MpwEvent::Completed(result),
                Ok(Err(CoreError::Cancelled)) => MpwEvent::Cancelled,
                Ok(Err(err)) => MpwEvent::Failed(err),
                Err(panic) => {
                    MpwEvent::Failed(CoreError::Computation(panic_message(panic.as_ref())))
                }
            };
            let _ = tx.send(event);
        })
        .map_err(|e| CoreError::Computation(format!("failed to spawn search thread: {e}")))?;

    Ok(MpwHandle {
        events: rx,
        cancel,
        thread: Some(thread),
    })
}

fn run_search(
    series: &TimeSeries,
    params: &MpwParams,
    cancel: &AtomicBool,
) -> Result<OptimizationResult, CoreError> {
    let pairs = enumerate_pairs(params.qstart, params.qmax);
    log::info!(
        "minimum pulse width search: {} candidate bands in [{}, {}], pool width {}",
        pairs.len(),
        params.qstart,
        params.qmax,
        params.pool_width
    );

    let (best, evaluation) = search_with(&pairs, params.pool_width, cancel, |a, b| {
        evaluate_band(series, params.lambda0_nm, f64::from(a), f64::from(b))
    })?;

    let omega0 = OMEGA_AU_NM / params.lambda0_nm;
    let period = 2.0 * std::f64::consts::PI / omega0;
    let max_optical_cycle = series.t()[series.len() - 1] / period;
    let (qstart, qmax) = pairs[best];

    log::info!(
        "minimum pulse width {:.2} as in band [{qstart}, {qmax}]",
        evaluation.fwhm_attoseconds
    );

    Ok(OptimizationResult {
        qstart,
        qmax,
        fwhm_attoseconds: evaluation.fwhm_attoseconds,
        peak_optical_cycle: evaluation.peak_optical_cycle,
        last_optical_cycle: max_optical_cycle - 1.0,
        max_optical_cycle,
    })
}

/// Every integer band `(a, b)` with `qstart <= a < b <= qmax`, in
/// lexicographic order.
fn enumerate_pairs(qstart: u32, qmax: u32) -> Vec<(u32, u32)> {
    let mut pairs = Vec::new();
    for a in qstart..qmax {
        for b in a + 1..=qmax {
            pairs.push((a, b));
        }
    }
    pairs
}

/// Evaluate all pairs on a dedicated pool and reduce by minimum FWHM.
///
/// Results are collected in enumeration order and reduced sequentially with
/// a strict comparison, so ties resolve to the lexicographically smallest
/// pair regardless of pool width or completion order.
fn search_with<F>(
    pairs: &[(u32, u32)],
    pool_width: usize,
    cancel: &AtomicBool,
    eval: F,
) -> Result<(usize, BandEvaluation), CoreError>
where
    F: Fn(u32, u32) -> Result<BandEvaluation, CoreError> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(pool_width)
        .build()
        .map_err(|e| CoreError::Computation(format!("failed to build worker pool: {e}")))?;

    let outcomes: Vec<Result<BandEvaluation, CoreError>> = pool.install(|| {
        pairs
            .par_iter()
            .map(|&(a, b)| {
                if cancel.load(Ordering::SeqCst) {
                    return Err(CoreError::Cancelled);
                }
                eval(a, b)
            })
            .collect()
    });

    if cancel.load(Ordering::SeqCst) {
        return Err(CoreError::Cancelled);
    }
    let evaluations: Vec<BandEvaluation> = outcomes.into_iter().collect::<Result<_, _>>()?;

    let mut best = 0;
    for (i, e) in evaluations.iter().enumerate() {
        if e.fwhm_attoseconds < evaluations[best].fwhm_attoseconds {
            best = i;
        }
    }
    Ok((best, evaluations[best]))
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("worker panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("worker panicked: {s}")
    } else {
        "worker panicked".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const LAMBDA: f64 = 45.5633; // w0 = 1.0 a.u.

    fn pulse_series() -> TimeSeries {
        let t: Vec<f64> = (0..401).map(|i| i as f64 * 0.1).collect();
        let jx: Vec<f64> = t
            .iter()
            .map(|&ti| (4.5 * ti).cos() * (-(ti - 20.0).powi(2) / 8.0).exp())
            .collect();
        let jy = vec![0.0; t.len()];
        TimeSeries::new(t, jx, jy).unwrap()
    }

    #[test]
    fn test_trivial_search_returns_single_pair() {
        // qmax = qstart + 1 leaves exactly one candidate band; the result
        // must equal a direct evaluation of that band.
        let series = Arc::new(pulse_series());
        let direct = evaluate_band(&series, LAMBDA, 4.0, 5.0).unwrap();

        let handle = spawn(Arc::clone(&series), MpwParams::new(LAMBDA, 4, 5)).unwrap();
        match handle.recv() {
            MpwEvent::Completed(result) => {
                assert_eq!((result.qstart, result.qmax), (4, 5));
                assert_relative_eq!(
                    result.fwhm_attoseconds,
                    direct.fwhm_attoseconds,
                    epsilon = 1e-12
                );
                assert_relative_eq!(
                    result.peak_optical_cycle,
                    direct.peak_optical_cycle,
                    epsilon = 1e-12
                );
                let period = 2.0 * std::f64::consts::PI;
                assert_relative_eq!(result.max_optical_cycle, 40.0 / period, epsilon = 1e-12);
                assert_relative_eq!(
                    result.last_optical_cycle,
                    result.max_optical_cycle - 1.0,
                    epsilon = 1e-12
                );
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn test_reduction_invariant_under_pool_width() {
        // Mocked evaluator with a duplicated minimum: the argmin must be the
        // lexicographically smallest pair for every pool width.
        let pairs = enumerate_pairs(1, 6);
        let table = |a: u32, b: u32| -> f64 {
            match (a, b) {
                (1, 4) => 10.0,
                (2, 3) => 10.0,
                _ => 50.0 + (a * 7 + b) as f64,
            }
        };
        let cancel = AtomicBool::new(false);

        let mut winners = Vec::new();
        for width in [1, 4, 16] {
            let (best, evaluation) = search_with(&pairs, width, &cancel, |a, b| {
                Ok(BandEvaluation {
                    fwhm_attoseconds: table(a, b),
                    peak_optical_cycle: 0.0,
                })
            })
            .unwrap();
            assert_eq!(evaluation.fwhm_attoseconds, 10.0);
            winners.push(pairs[best]);
        }
        assert_eq!(winners, vec![(1, 4); 3]);
    }

    #[test]
    fn test_enumeration_covers_triangle() {
        let pairs = enumerate_pairs(2, 5);
        assert_eq!(pairs, vec![(2, 3), (2, 4), (2, 5), (3, 4), (3, 5), (4, 5)]);
    }

    #[test]
    fn test_worker_error_aggregates() {
        let pairs = enumerate_pairs(1, 4);
        let cancel = AtomicBool::new(false);
        let result = search_with(&pairs, 4, &cancel, |a, b| {
            if (a, b) == (2, 3) {
                Err(CoreError::Computation("bad band".into()))
            } else {
                Ok(BandEvaluation {
                    fwhm_attoseconds: 1.0,
                    peak_optical_cycle: 0.0,
                })
            }
        });
        assert!(matches!(result, Err(CoreError::Computation(_))));
    }

    #[test]
    fn test_pre_cancelled_search_reports_cancellation() {
        let pairs = enumerate_pairs(1, 4);
        let cancel = AtomicBool::new(true);
        let result = search_with(&pairs, 2, &cancel, |_, _| {
            Ok(BandEvaluation {
                fwhm_attoseconds: 1.0,
                peak_optical_cycle: 0.0,
            })
        });
        assert!(matches!(result, Err(CoreError::Cancelled)));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let series = Arc::new(pulse_series());
        let mut handle = spawn(Arc::clone(&series), MpwParams::new(LAMBDA, 1, 10)).unwrap();
        handle.cancel();
        handle.cancel();
        assert!(handle.is_finished());
        // the terminal event is either a cancellation or, if the search won
        // the race, a completion; never silence
        match handle.recv() {
            MpwEvent::Cancelled | MpwEvent::Completed(_) => {}
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_invalid_params_fail_fast() {
        let series = Arc::new(pulse_series());
        assert!(spawn(Arc::clone(&series), MpwParams::new(LAMBDA, 5, 5)).is_err());
        assert!(spawn(Arc::clone(&series), MpwParams::new(LAMBDA, 0, 5)).is_err());
        assert!(spawn(Arc::clone(&series), MpwParams::new(-1.0, 1, 5)).is_err());
        let mut params = MpwParams::new(LAMBDA, 1, 5);
        params.pool_width = 0;
        assert!(spawn(series, params).is_err());
    }
}
