use serde::Serialize;
use std::sync::Mutex;

/// Counters for user actions and location lookups.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub saves: usize,
    pub lookups: usize,
    pub failed_lookups: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_save(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.saves += 1;
        }
    }

    pub fn record_lookup(&self, succeeded: bool) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.lookups += 1;
            if !succeeded {
                metrics.failed_lookups += 1;
            }
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
