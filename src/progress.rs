//! Simulated progress feedback for in-flight analysis requests
//!
//! The remote classifier exposes no real progress, so the client animates
//! one: a periodic ticker raises the displayed value by a random step and
//! clamps it below the cap until the response actually arrives. The caller
//! owns the returned handle and must stop it on both terminal paths; the
//! handle also aborts the ticker on drop so it cannot leak.

use std::time::Duration;
use tokio::task::JoinHandle;

/// Default tick period
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(300);

/// Ceiling for simulated progress; only a real success may reach 100
pub const PROGRESS_CAP: f64 = 90.0;

/// Upper bound (exclusive) of the random per-tick increment
pub const DEFAULT_MAX_STEP: f64 = 15.0;

/// Human-readable label for a progress value
///
/// Purely cosmetic: the thresholds carry no contract with the backend's
/// actual pipeline stages.
pub fn phase_label(progress: f64) -> &'static str {
    if progress < 30.0 {
        "Extracting audio features..."
    } else if progress < 60.0 {
        "Computing MFCC coefficients..."
    } else if progress < 90.0 {
        "Running neural network analysis..."
    } else {
        "Finalizing results..."
    }
}

// xorshift64*; good enough for animation steps and reproducible in tests.
#[derive(Debug, Clone)]
struct StepRng {
    state: u64,
}

impl StepRng {
    fn new(seed: u64) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    fn from_entropy() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos() as u64 | 1)
            .unwrap_or(0x9e37_79b9);
        Self::new(nanos)
    }

    /// Uniform value in `[0, bound)`
    fn next_in(&mut self, bound: f64) -> f64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        let unit = (x >> 11) as f64 / (1u64 << 53) as f64;
        unit * bound
    }
}

/// Configuration and factory for progress tickers
#[derive(Debug, Clone)]
pub struct ProgressSimulator {
    period: Duration,
    cap: f64,
    max_step: f64,
    seed: Option<u64>,
}

impl Default for ProgressSimulator {
    fn default() -> Self {
        Self {
            period: DEFAULT_TICK_PERIOD,
            cap: PROGRESS_CAP,
            max_step: DEFAULT_MAX_STEP,
            seed: None,
        }
    }
}

impl ProgressSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tick period
    pub fn period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Set the progress ceiling
    pub fn cap(mut self, cap: f64) -> Self {
        self.cap = cap;
        self
    }

    /// Set the upper bound (exclusive) of the per-tick increment
    pub fn max_step(mut self, max_step: f64) -> Self {
        self.max_step = max_step;
        self
    }

    /// Seed the step generator for reproducible runs
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Start a ticker that reports simulated progress through `on_tick`
    ///
    /// Values start above 0, never decrease, and never exceed the cap.
    /// Ticking stops when the returned handle is stopped or dropped.
    pub fn start<F>(&self, on_tick: F) -> ProgressHandle
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        let period = self.period;
        let cap = self.cap;
        let max_step = self.max_step;
        let mut rng = match self.seed {
            Some(seed) => StepRng::new(seed),
            None => StepRng::from_entropy(),
        };
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick of a tokio interval fires immediately; skip it
            // so progress stays at 0 for one full period.
            interval.tick().await;

            let mut progress: f64 = 0.0;
            loop {
                interval.tick().await;
                progress = (progress + rng.next_in(max_step)).min(cap);
                on_tick(progress);
            }
        });

        ProgressHandle { task }
    }
}

/// Handle to a running progress ticker
///
/// Aborts the ticker on [`stop`](ProgressHandle::stop) and on drop.
#[derive(Debug)]
pub struct ProgressHandle {
    task: JoinHandle<()>,
}

impl ProgressHandle {
    /// Stop the ticker immediately; no further ticks are delivered
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
