//! `/proc` backed system monitor for Linux.

use std::fs;
use std::path::PathBuf;

use crate::monitor::{CpuUsageSample, SystemMonitor};

/// Reads `/proc/stat` and `/proc/meminfo` on every call, with blocking `std::fs`.
#[derive(Debug, Clone)]
pub struct ProcMonitor {
    stat_path: PathBuf,
    meminfo_path: PathBuf,
}

impl ProcMonitor {
    pub fn new() -> Self {
        Self::with_paths("/proc/stat", "/proc/meminfo")
    }

    /// Read counters from alternate files (used by tests and containers
    /// that mount a host `/proc` elsewhere).
    pub fn with_paths(stat: impl Into<PathBuf>, meminfo: impl Into<PathBuf>) -> Self {
        Self {
            stat_path: stat.into(),
            meminfo_path: meminfo.into(),
        }
    }
}

impl Default for ProcMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemMonitor for ProcMonitor {
    fn sample(&self) -> CpuUsageSample {
        match fs::read_to_string(&self.stat_path) {
            Ok(content) => parse_stat(&content).unwrap_or_default(),
            Err(e) => {
                tracing::debug!(path = ?self.stat_path, error = %e, "CPU counters unavailable");
                CpuUsageSample::default()
            }
        }
    }

    fn memory_percent(&self) -> f64 {
        match fs::read_to_string(&self.meminfo_path) {
            Ok(content) => parse_meminfo(&content).unwrap_or(0.0),
            Err(e) => {
                tracing::debug!(path = ?self.meminfo_path, error = %e, "Memory counters unavailable");
                0.0
            }
        }
    }
}

/// Aggregate `cpu` line: "cpu user nice system idle iowait irq softirq steal ..."
fn parse_stat(content: &str) -> Option<CpuUsageSample> {
    let line = content
        .lines()
        .find(|l| l.split_whitespace().next() == Some("cpu"))?;

    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .take(8)
        .map(|f| f.parse().ok())
        .collect::<Option<_>>()?;
    if fields.len() < 4 {
        return None;
    }

    let total: u64 = fields.iter().sum();
    let idle = fields[3] + fields.get(4).copied().unwrap_or(0);
    Some(CpuUsageSample::new(total - idle, total))
}

fn parse_meminfo(content: &str) -> Option<f64> {
    let mut total = None;
    let mut available = None;
    let mut free = 0u64;
    let mut buffers = 0u64;
    let mut cached = 0u64;

    for line in content.lines() {
        let mut parts = line.splitn(2, ':');
        let key = parts.next()?.trim();
        let value: u64 = match parts
            .next()
            .and_then(|v| v.split_whitespace().next())
            .and_then(|v| v.parse().ok())
        {
            Some(v) => v,
            None => continue,
        };

        match key {
            "MemTotal" => total = Some(value),
            "MemAvailable" => available = Some(value),
            "MemFree" => free = value,
            "Buffers" => buffers = value,
            "Cached" => cached = value,
            _ => {}
        }
    }

    let total = total.filter(|t| *t > 0)?;
    // older kernels lack MemAvailable
    let available = available.unwrap_or(free + buffers + cached).min(total);
    Some((total - available) as f64 * 100.0 / total as f64)
}
