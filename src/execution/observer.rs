use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use crate::types::TypeTag;

/// Events emitted by the [`super::ProfilingEngine`] during a run.
#[derive(Debug, Clone)]
pub enum ProfilingEvent {
    RunStarted {
        columns: usize,
    },
    ThrottleWaited {
        duration: Duration,
    },
    ColumnStarted {
        index: usize,
        name: String,
        rows: usize,
    },
    ColumnFinished {
        index: usize,
        name: String,
        dominant_type: TypeTag,
        confidence_pct: f64,
    },
    RunFinished {
        elapsed: Duration,
        metrics: ProfilingMetricsSnapshot,
    },
}

/// Observer hook for profiling events.
///
/// Column events are delivered from worker threads, possibly concurrently.
pub trait ProfilingObserver: Send + Sync {
    fn on_event(&self, event: &ProfilingEvent);
}

/// Forwards profiling events to `tracing`.
///
/// Run boundaries are logged at `info`, per-column events at `debug`.
#[derive(Debug, Default)]
pub struct TracingProfilingObserver;

impl ProfilingObserver for TracingProfilingObserver {
    fn on_event(&self, event: &ProfilingEvent) {
        match event {
            ProfilingEvent::RunStarted { columns } => {
                tracing::info!(columns, "profiling run started");
            }
            ProfilingEvent::ThrottleWaited { duration } => {
                tracing::debug!(?duration, "waited for column slot");
            }
            ProfilingEvent::ColumnStarted { index, name, rows } => {
                tracing::debug!(index, column = %name, rows, "column started");
            }
            ProfilingEvent::ColumnFinished {
                index,
                name,
                dominant_type,
                confidence_pct,
            } => {
                tracing::debug!(
                    index,
                    column = %name,
                    dominant_type = %dominant_type,
                    confidence_pct,
                    "column finished"
                );
            }
            ProfilingEvent::RunFinished { elapsed, metrics } => {
                tracing::info!(?elapsed, %metrics, "profiling run finished");
            }
        }
    }
}

/// Real-time counters for a profiling run.
///
/// The engine updates these while columns are profiled; callers can snapshot them at any time.
pub struct ProfilingMetrics {
    run_id: AtomicU64,
    elapsed_ns: AtomicU64,

    columns_started: AtomicU64,
    columns_finished: AtomicU64,
    values_classified: AtomicU64,
    nulls_seen: AtomicU64,
    throttle_wait_ns: AtomicU64,

    active_columns: AtomicUsize,
    max_active_columns: AtomicUsize,
}

impl ProfilingMetrics {
    pub fn new() -> Self {
        Self {
            run_id: AtomicU64::new(0),
            elapsed_ns: AtomicU64::new(0),
            columns_started: AtomicU64::new(0),
            columns_finished: AtomicU64::new(0),
            values_classified: AtomicU64::new(0),
            nulls_seen: AtomicU64::new(0),
            throttle_wait_ns: AtomicU64::new(0),
            active_columns: AtomicUsize::new(0),
            max_active_columns: AtomicUsize::new(0),
        }
    }

    /// Reset counters and bump the run id.
    pub fn begin_run(&self) {
        let _ = self.run_id.fetch_add(1, Ordering::SeqCst);
        self.elapsed_ns.store(0, Ordering::SeqCst);
        self.columns_started.store(0, Ordering::SeqCst);
        self.columns_finished.store(0, Ordering::SeqCst);
        self.values_classified.store(0, Ordering::SeqCst);
        self.nulls_seen.store(0, Ordering::SeqCst);
        self.throttle_wait_ns.store(0, Ordering::SeqCst);
        self.active_columns.store(0, Ordering::SeqCst);
        self.max_active_columns.store(0, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns.store(saturating_nanos(elapsed), Ordering::SeqCst);
    }

    pub fn on_column_start(&self) {
        let _ = self.columns_started.fetch_add(1, Ordering::SeqCst);
        let now = self.active_columns.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.max_active_columns.fetch_max(now, Ordering::SeqCst);
    }

    /// Record a finished column with its classified (non-null) and null value counts.
    pub fn on_column_end(&self, classified: usize, nulls: usize) {
        let _ = self.columns_finished.fetch_add(1, Ordering::SeqCst);
        let _ = self.active_columns.fetch_sub(1, Ordering::SeqCst);
        let _ = self
            .values_classified
            .fetch_add(classified as u64, Ordering::SeqCst);
        let _ = self.nulls_seen.fetch_add(nulls as u64, Ordering::SeqCst);
    }

    pub fn on_throttle_wait(&self, d: Duration) {
        let _ = self
            .throttle_wait_ns
            .fetch_add(saturating_nanos(d), Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> ProfilingMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        let elapsed = (elapsed_ns > 0).then(|| Duration::from_nanos(elapsed_ns));

        ProfilingMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed,
            columns_started: self.columns_started.load(Ordering::SeqCst),
            columns_finished: self.columns_finished.load(Ordering::SeqCst),
            values_classified: self.values_classified.load(Ordering::SeqCst),
            nulls_seen: self.nulls_seen.load(Ordering::SeqCst),
            throttle_wait: Duration::from_nanos(self.throttle_wait_ns.load(Ordering::SeqCst)),
            max_active_columns: self.max_active_columns.load(Ordering::SeqCst),
        }
    }
}

impl Default for ProfilingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    d.as_nanos().min(u128::from(u64::MAX)) as u64
}

/// Immutable snapshot of [`ProfilingMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilingMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    pub columns_started: u64,
    pub columns_finished: u64,
    pub values_classified: u64,
    pub nulls_seen: u64,
    pub throttle_wait: Duration,
    pub max_active_columns: usize,
}

impl fmt::Display for ProfilingMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, columns={}/{}, values_classified={}, nulls_seen={}, max_active_columns={}, throttle_wait={:?}, elapsed={:?}",
            self.run_id,
            self.columns_finished,
            self.columns_started,
            self.values_classified,
            self.nulls_seen,
            self.max_active_columns,
            self.throttle_wait,
            self.elapsed
        )
    }
}
