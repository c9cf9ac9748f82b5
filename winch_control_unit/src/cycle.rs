//! Control loop: a dedicated thread ticking the mode engine.
//!
//! ## Cycle Loop
//! The thread ticks every `cycle_time_ms` using `std::thread::sleep` for the
//! remainder of the period. An overrun is counted and logged, never fatal:
//! the next tick starts immediately.
//!
//! ## Shutdown
//! [`ControlLoop::stop`] clears the running flag and joins the thread. A loop
//! thread that exits on its own (panic) is reported as
//! [`ControlError::LoopTerminated`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::controller::WinchController;
use crate::error::ControlError;
use crate::mode::ModeEngine;

/// Control thread name, shown in log lines.
pub const CONTROL_THREAD_NAME: &str = "Ctrl";

/// Cycles between two periodic statistics lines.
const STATS_LOG_INTERVAL: u64 = 1000;

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle timing statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: u64,
    /// Minimum cycle duration [ns].
    pub min_cycle_ns: u64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: u64,
    /// Running sum for average computation.
    pub sum_cycle_ns: u128,
    /// Cycles that took longer than the period.
    pub overruns: u64,
}

impl CycleStats {
    /// Create a new zeroed stats instance.
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: u64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
        }
    }

    /// Record a cycle duration against the `budget` period.
    ///
    /// Returns `true` on overrun.
    #[inline]
    pub fn record(&mut self, duration: Duration, budget: Duration) -> bool {
        let duration_ns = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns += u128::from(duration_ns);
        let overrun = duration > budget;
        if overrun {
            self.overruns += 1;
        }
        overrun
    }

    /// Average cycle time [ns] (returns 0 if no cycles).
    #[inline]
    pub fn avg_cycle_ns(&self) -> u64 {
        if self.cycle_count == 0 {
            0
        } else {
            u64::try_from(self.sum_cycle_ns / u128::from(self.cycle_count)).unwrap_or(u64::MAX)
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Control Loop ───────────────────────────────────────────────────

/// Handle on the running control thread.
pub struct ControlLoop {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<CycleStats>>,
}

impl ControlLoop {
    /// Attach a mode engine to `winch` and start ticking it every `period`.
    ///
    /// # Errors
    /// `ControlError::EngineAttached` if the winch already has an engine,
    /// `ControlError::Spawn` if the thread cannot be created.
    pub fn spawn(winch: Arc<WinchController>, period: Duration) -> Result<Self, ControlError> {
        let mut engine = ModeEngine::new(&winch)?;
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name(CONTROL_THREAD_NAME.to_string())
            .spawn(move || run_loop(&winch, &mut engine, period, &flag))
            .map_err(|e| ControlError::Spawn(e.to_string()))?;

        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    /// Whether the thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the thread and return its statistics.
    pub fn stop(mut self) -> Result<CycleStats, ControlError> {
        self.running.store(false, Ordering::SeqCst);
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| ControlError::LoopTerminated),
            None => Err(ControlError::LoopTerminated),
        }
    }
}

impl Drop for ControlLoop {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_loop(
    winch: &WinchController,
    engine: &mut ModeEngine,
    period: Duration,
    running: &AtomicBool,
) -> CycleStats {
    info!("Starting Control Loop ({} ms).", period.as_millis());
    let mut stats = CycleStats::new();
    let mut last_start = Instant::now();

    while running.load(Ordering::SeqCst) {
        let cycle_start = Instant::now();
        let dt = cycle_start.duration_since(last_start);
        last_start = cycle_start;

        engine.tick(winch, dt);

        let elapsed = cycle_start.elapsed();
        if stats.record(elapsed, period) {
            warn!(
                "Cycle overrun: {} us > {} us (total {})",
                elapsed.as_micros(),
                period.as_micros(),
                stats.overruns
            );
        }
        if stats.cycle_count % STATS_LOG_INTERVAL == 0 {
            debug!(
                "Cycle {}: avg {} ns, max {} ns, overruns {}",
                stats.cycle_count,
                stats.avg_cycle_ns(),
                stats.max_cycle_ns,
                stats.overruns
            );
        }

        if let Some(remaining) = period.checked_sub(elapsed) {
            thread::sleep(remaining);
        }
    }

    info!("Stopping Control Loop.");
    stats
}
