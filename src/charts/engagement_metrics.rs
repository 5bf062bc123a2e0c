use crate::analysis::scaling::{extent_domain, time_extent};
use crate::charts::ChartBuilder;
use crate::core::timeseries::{column_series, filter_window};
use crate::error::PipelineResult;
use crate::fetcher::SourceBundle;
use crate::models::{ChartModel, ViewState};
use chrono::{DateTime, Utc};

/// X account engagement metrics over time, one line per visible metric.
/// The count axis rescales to whichever metrics are toggled on.
pub struct EngagementMetricsChart;

impl ChartBuilder for EngagementMetricsChart {
    fn slug(&self) -> &str {
        "engagement_metrics"
    }

    fn name(&self) -> &str {
        "X Engagement Metrics"
    }

    fn required_sources(&self) -> Vec<&str> {
        vec!["x_analytics"]
    }

    fn build(
        &self,
        sources: &SourceBundle,
        state: &ViewState,
        now: DateTime<Utc>,
    ) -> PipelineResult<ChartModel> {
        let window = state.period.window(now);
        let analytics = sources.table("x_analytics")?;

        let mut model = ChartModel::new(self.slug());
        for metric in &state.visible_metrics {
            let series = filter_window(&column_series(&analytics.rows, metric), &window);
            model.series.insert(metric.clone(), series);
        }

        let all: Vec<&[_]> = model.series.values().map(|s| s.as_slice()).collect();
        model.x_domain = time_extent(&all);
        if let Some((_, max)) = extent_domain(&all) {
            model.domains.insert("count".to_string(), (0.0, max * 1.1));
        }

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::SourceData;
    use crate::models::{LoadedTable, MetricRow};
    use chrono::TimeZone;
    use std::collections::{BTreeMap, BTreeSet};

    fn bundle() -> SourceBundle {
        let rows = (1..=5)
            .map(|d| MetricRow {
                timestamp: Utc.with_ymd_and_hms(2025, 3, d, 0, 0, 0).unwrap(),
                values: BTreeMap::from([
                    ("engagements".to_string(), 10.0 * d as f64),
                    ("impressions".to_string(), 100.0 * d as f64),
                    ("likes".to_string(), d as f64),
                ]),
            })
            .collect();

        let mut bundle = SourceBundle::default();
        bundle.insert(
            "x_analytics",
            SourceData::Table(LoadedTable { rows, dropped: 0 }),
        );
        bundle
    }

    fn state_with(metrics: &[&str]) -> ViewState {
        ViewState {
            visible_metrics: metrics.iter().map(|m| m.to_string()).collect::<BTreeSet<_>>(),
            ..ViewState::default()
        }
    }

    #[test]
    fn test_axis_follows_visible_metrics() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();
        let bundle = bundle();

        let all = EngagementMetricsChart
            .build(&bundle, &state_with(&["engagements", "impressions", "likes"]), now)
            .unwrap();
        let (_, hi) = all.domains["count"];
        assert!((hi - 550.0).abs() < 1e-9);

        let without_impressions = EngagementMetricsChart
            .build(&bundle, &state_with(&["engagements", "likes"]), now)
            .unwrap();
        let (_, hi) = without_impressions.domains["count"];
        assert!((hi - 55.0).abs() < 1e-9);
        assert!(!without_impressions.series.contains_key("impressions"));
    }
}
