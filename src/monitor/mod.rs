//! Host CPU and memory sampling.
//!
//! # Responsibilities
//! - Define the sampling capability the protocol worker consumes
//! - Compute utilization from two cumulative CPU samples
//! - Provide a `/proc` backed implementation for Linux hosts
//!
//! # Design Decisions
//! - Samples are plain values; each connection keeps its own baseline
//! - Monitors are stateless and shared behind `Arc<dyn SystemMonitor>`
//! - Sampling never fails: an unreadable counter source reads as idle

pub mod procfs;

pub use procfs::ProcMonitor;

/// Cumulative CPU tick counters at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuUsageSample {
    /// Ticks spent doing work (everything but idle and iowait).
    pub busy: u64,
    /// Ticks across all modes.
    pub total: u64,
}

impl CpuUsageSample {
    pub fn new(busy: u64, total: u64) -> Self {
        Self { busy, total }
    }

    /// Utilization in percent between `earlier` and this sample.
    ///
    /// Returns 0 when no time has elapsed or the counters went backwards.
    pub fn usage_since(&self, earlier: &CpuUsageSample) -> f64 {
        let total = self.total.saturating_sub(earlier.total);
        if total == 0 {
            return 0.0;
        }
        let busy = self.busy.saturating_sub(earlier.busy).min(total);
        (busy as f64 / total as f64) * 100.0
    }
}

/// Source of host utilization figures.
///
/// Implementations may block on file I/O. Async callers run them through
/// `tokio::task::spawn_blocking`.
pub trait SystemMonitor: Send + Sync {
    /// Current cumulative CPU counters.
    fn sample(&self) -> CpuUsageSample;

    /// Memory in use, as a percentage of total.
    fn memory_percent(&self) -> f64;
}
