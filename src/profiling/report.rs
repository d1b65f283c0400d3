//! Dataset-level aggregation of column profiles.

use std::collections::BTreeMap;

use crate::config::ProfileOptions;
use crate::types::{ColumnProfile, DatasetReport, TypeShare, TypeTag};

use super::column::percent;

/// Aggregate profiles into a [`DatasetReport`] using the default 50% null threshold.
pub fn aggregate(profiles: Vec<ColumnProfile>) -> DatasetReport {
    ReportAggregator::default().aggregate(profiles)
}

/// Builds a [`DatasetReport`] from column profiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportAggregator {
    null_flag_threshold_pct: f64,
}

impl Default for ReportAggregator {
    fn default() -> Self {
        Self::new(&ProfileOptions::default())
    }
}

impl ReportAggregator {
    /// Create an aggregator from options.
    pub fn new(opts: &ProfileOptions) -> Self {
        Self {
            null_flag_threshold_pct: opts.null_flag_threshold_pct,
        }
    }

    /// Aggregate profiles.
    ///
    /// - Profiles keep their input order.
    /// - The type distribution only lists tags that occur, most common first; equal counts
    ///   keep [`TypeTag`] order.
    /// - Columns with `null_pct` strictly above the threshold are flagged, in input order.
    pub fn aggregate(&self, profiles: Vec<ColumnProfile>) -> DatasetReport {
        let total = profiles.len();

        let mut by_tag: BTreeMap<TypeTag, usize> = BTreeMap::new();
        for p in &profiles {
            *by_tag.entry(p.dominant_type).or_insert(0) += 1;
        }
        let mut type_distribution: Vec<TypeShare> = by_tag
            .into_iter()
            .map(|(type_tag, column_count)| TypeShare {
                type_tag,
                column_count,
                pct: percent(column_count, total),
            })
            .collect();
        // Stable sort: ties stay in tag order.
        type_distribution.sort_by(|a, b| b.column_count.cmp(&a.column_count));

        let flagged_columns: Vec<ColumnProfile> = profiles
            .iter()
            .filter(|p| p.null_pct > self.null_flag_threshold_pct)
            .cloned()
            .collect();

        tracing::debug!(
            columns = total,
            flagged = flagged_columns.len(),
            "aggregated dataset report"
        );

        DatasetReport {
            columns: profiles,
            type_distribution,
            flagged_columns,
            null_flag_threshold_pct: self.null_flag_threshold_pct,
        }
    }
}
