use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::window::Period;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// One parsed row of a multi-column source. Columns that failed numeric
/// coercion are simply absent from `values`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MetricRow {
    pub timestamp: DateTime<Utc>,
    pub values: BTreeMap<String, f64>,
}

/// Loader output for single-metric sources. `dropped` counts records that
/// failed to parse and were discarded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedSeries {
    pub points: Vec<DataPoint>,
    pub dropped: usize,
}

/// Loader output for tabular sources.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedTable {
    pub rows: Vec<MetricRow>,
    pub dropped: usize,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub enum ChangeKind {
    Daily,
    SevenDay,
}

impl ChangeKind {
    /// Column name holding this change variant in the Bitcoin dataset.
    pub fn btc_column(&self) -> &'static str {
        match self {
            ChangeKind::Daily => "pct_change",
            ChangeKind::SevenDay => "seven_d_pct_change",
        }
    }

    /// Column name holding this change variant in the meme-coin dataset.
    pub fn meme_column(&self) -> &'static str {
        match self {
            ChangeKind::Daily => "avg_pct_change",
            ChangeKind::SevenDay => "seven_d_avg_pct_change",
        }
    }
}

/// Explicit view state threaded through every model build. Replaces the
/// mutable selector variables the UI layer used to capture.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub period: Period,
    pub change_kind: ChangeKind,
    pub visible_metrics: BTreeSet<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            period: Period::ThreeMonths,
            change_kind: ChangeKind::Daily,
            visible_metrics: ["engagements", "impressions", "likes"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

/// Pearson correlation outcome. `coefficient` is `None` when the sample is
/// too small or either side has zero variance.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CorrelationResult {
    pub coefficient: Option<f64>,
    pub samples: usize,
}

/// Renderer-ready payload of one pipeline build. The renderer maps domains to
/// pixel space and draws; it must not re-filter or re-derive anything.
///
/// BTreeMaps keep key order stable so identical inputs serialize identically.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChartModel {
    pub chart: String,
    pub series: BTreeMap<String, Vec<DataPoint>>,
    pub x_domain: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub domains: BTreeMap<String, (f64, f64)>,
    pub stats: BTreeMap<String, Option<f64>>,
}

impl ChartModel {
    pub fn new(chart: &str) -> Self {
        Self {
            chart: chart.to_string(),
            series: BTreeMap::new(),
            x_domain: None,
            domains: BTreeMap::new(),
            stats: BTreeMap::new(),
        }
    }

    /// Resolves each displayed series' point nearest to a hover timestamp,
    /// for synchronized tooltips. Empty series are omitted.
    pub fn hover(&self, at: DateTime<Utc>) -> BTreeMap<String, DataPoint> {
        self.series
            .iter()
            .filter_map(|(name, series)| {
                crate::core::timeseries::nearest(series, at)
                    .ok()
                    .map(|p| (name.clone(), p.clone()))
            })
            .collect()
    }
}
