use std::{future::Future, sync::Arc, time::Duration};

use sysinfo::{ProcessesToUpdate, System};
use tokio::time::Instant;
use tracing::{info, warn};

/// Heap growth below this is considered memory-efficient.
pub const MEMORY_EFFICIENT_GROWTH_BYTES: i64 = 10 * 1024 * 1024;

pub trait MemoryProbe: Send + Sync {
    fn resident_bytes(&self) -> u64;
}

/// Resident set size of the current process, as reported by `sysinfo`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessMemoryProbe;

impl MemoryProbe for ProcessMemoryProbe {
    fn resident_bytes(&self) -> u64 {
        let Ok(pid) = sysinfo::get_current_pid() else {
            return 0;
        };
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        sys.process(pid).map(|p| p.memory()).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationMetrics {
    pub elapsed: Duration,
    pub memory_before: u64,
    pub memory_after: u64,
    pub memory_delta: i64,
    pub memory_efficient: bool,
    pub slow: bool,
}

/// Observes duration and memory growth of an operation without touching its outcome.
#[derive(Clone)]
pub struct PerformanceMonitor {
    slow_threshold: Duration,
    probe: Arc<dyn MemoryProbe>,
}

impl PerformanceMonitor {
    pub fn new(slow_threshold: Duration, probe: Arc<dyn MemoryProbe>) -> Self {
        Self {
            slow_threshold,
            probe,
        }
    }

    pub fn memory_probe(&self) -> &dyn MemoryProbe {
        self.probe.as_ref()
    }

    pub async fn measure<T, Fut>(&self, name: &str, context: &str, operation: Fut) -> (T, OperationMetrics)
    where
        Fut: Future<Output = T>,
    {
        let memory_before = self.probe.resident_bytes();
        let started = Instant::now();

        let output = operation.await;

        let elapsed = started.elapsed();
        let memory_after = self.probe.resident_bytes();
        let memory_delta = memory_after as i64 - memory_before as i64;
        let metrics = OperationMetrics {
            elapsed,
            memory_before,
            memory_after,
            memory_delta,
            memory_efficient: memory_delta < MEMORY_EFFICIENT_GROWTH_BYTES,
            slow: elapsed > self.slow_threshold,
        };

        if metrics.slow {
            warn!(
                operation = name,
                context,
                elapsed_ms = elapsed.as_millis() as u64,
                threshold_ms = self.slow_threshold.as_millis() as u64,
                memory_delta,
                "Slow operation"
            );
        } else {
            info!(
                operation = name,
                context,
                elapsed_ms = elapsed.as_millis() as u64,
                memory_delta,
                memory_efficient = metrics.memory_efficient,
                "Operation finished"
            );
        }

        (output, metrics)
    }
}
