//! Execution engine for profiling datasets with configurable parallelism.
//!
//! This module sits "above" [`crate::profiling`] and provides:
//!
//! - Parallel per-column profiling on a dedicated thread pool
//! - Throttling of concurrently profiled columns
//! - Real-time metrics + observer hooks for monitoring
//!
//! Column results are merged back in column order, so the report is identical to the one
//! produced by the sequential [`crate::profiling::profile_dataset`].

mod observer;
mod semaphore;

use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::ThreadPool;
use rayon::ThreadPoolBuilder;

use crate::config::ProfileOptions;
use crate::error::{ProfilingError, ProfilingResult};
use crate::profiling::{ColumnProfiler, ReportAggregator};
use crate::types::{ColumnProfile, DataSet, DatasetReport, SheetReport};

pub use observer::{
    ProfilingEvent, ProfilingMetrics, ProfilingMetricsSnapshot, ProfilingObserver,
    TracingProfilingObserver,
};

use semaphore::Semaphore;

/// Configuration for the [`ProfilingEngine`].
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Upper bound on concurrently profiled columns.
    ///
    /// This is an additional throttle on top of `num_threads`, useful for very long columns.
    pub max_in_flight_columns: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        let n = available_threads();
        Self {
            num_threads: Some(n),
            max_in_flight_columns: n,
        }
    }
}

fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Profiles the columns of a [`DataSet`] in parallel.
///
/// ```rust
/// use rust_column_profiling::config::ProfileOptions;
/// use rust_column_profiling::execution::{ExecutionOptions, ProfilingEngine};
/// use rust_column_profiling::types::{Column, DataSet, TypeTag};
///
/// let engine = ProfilingEngine::new(ExecutionOptions::default()).unwrap();
/// let ds = DataSet::new(vec![
///     Column::from_texts("when", &["01/02/2023", "2023-05-01"]),
///     Column::from_texts("flag", &["true", "sim", "no"]),
/// ]);
/// let report = engine.profile_dataset(&ds, &ProfileOptions::default());
/// assert_eq!(report.columns[0].dominant_type, TypeTag::Date);
/// assert_eq!(report.columns[1].dominant_type, TypeTag::Boolean);
/// ```
pub struct ProfilingEngine {
    pool: ThreadPool,
    opts: ExecutionOptions,
    observer: Option<Arc<dyn ProfilingObserver>>,
    metrics: Arc<ProfilingMetrics>,
}

impl ProfilingEngine {
    /// Create a new engine with the given options.
    ///
    /// Fails with [`ProfilingError::InvalidConfig`] if `max_in_flight_columns == 0` or
    /// `num_threads == Some(0)`.
    pub fn new(opts: ExecutionOptions) -> ProfilingResult<Self> {
        if opts.max_in_flight_columns == 0 {
            return Err(ProfilingError::InvalidConfig {
                message: "max_in_flight_columns must be > 0".to_string(),
            });
        }
        if opts.num_threads == Some(0) {
            return Err(ProfilingError::InvalidConfig {
                message: "num_threads must be > 0 when set".to_string(),
            });
        }

        let n_threads = opts.num_threads.unwrap_or_else(available_threads);
        let pool = ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .thread_name(|i| format!("column-profiler-{i}"))
            .build()?;

        Ok(Self {
            pool,
            opts,
            observer: None,
            metrics: Arc::new(ProfilingMetrics::new()),
        })
    }

    /// Attach an observer for profiling events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn ProfilingObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time profiling metrics.
    pub fn metrics(&self) -> Arc<ProfilingMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Profile every column in parallel and aggregate the result.
    pub fn profile_dataset(&self, dataset: &DataSet, opts: &ProfileOptions) -> DatasetReport {
        self.pool.install(|| self.profile_dataset_impl(dataset, opts))
    }

    /// Profile each sheet of a workbook separately, keeping sheet order.
    pub fn profile_sheets(
        &self,
        sheets: &[(String, DataSet)],
        opts: &ProfileOptions,
    ) -> Vec<SheetReport> {
        sheets
            .iter()
            .map(|(sheet, ds)| {
                let _span = tracing::debug_span!("sheet", sheet = %sheet).entered();
                SheetReport {
                    sheet: sheet.clone(),
                    report: self.profile_dataset(ds, opts),
                }
            })
            .collect()
    }

    fn profile_dataset_impl(&self, dataset: &DataSet, opts: &ProfileOptions) -> DatasetReport {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ProfilingEvent::RunStarted {
            columns: dataset.column_count(),
        });

        let sem = Semaphore::new(self.opts.max_in_flight_columns);
        let profiler = ColumnProfiler::new(opts);

        // Indexed parallel iterators collect in input order.
        let profiles: Vec<ColumnProfile> = dataset
            .columns
            .par_iter()
            .enumerate()
            .map(|(index, column)| {
                let (_permit, waited) = sem.acquire();
                if waited > Duration::ZERO {
                    self.metrics.on_throttle_wait(waited);
                    self.emit(ProfilingEvent::ThrottleWaited { duration: waited });
                }

                self.metrics.on_column_start();
                self.emit(ProfilingEvent::ColumnStarted {
                    index,
                    name: column.name.clone(),
                    rows: column.len(),
                });

                let profile = profiler.profile_column(column);

                self.emit(ProfilingEvent::ColumnFinished {
                    index,
                    name: profile.name.clone(),
                    dominant_type: profile.dominant_type,
                    confidence_pct: profile.confidence_pct,
                });
                self.metrics
                    .on_column_end(profile.non_null_count(), profile.null_count);
                profile
            })
            .collect();

        let report = ReportAggregator::new(opts).aggregate(profiles);

        self.metrics.end_run(start.elapsed());
        self.emit(ProfilingEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });

        report
    }

    fn emit(&self, event: ProfilingEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}
