use crate::core::window::TimeWindow;
use crate::error::{PipelineError, PipelineResult};
use crate::models::{DataPoint, MetricRow};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Minimum points a filtered range must keep before the filter falls back to
/// the full series. Sparser subsets draw misleading charts.
pub const MIN_WINDOW_POINTS: usize = 10;

/// Returns the points inside `[window.start, window.end]` (inclusive).
/// If fewer than [`MIN_WINDOW_POINTS`] survive, the entire unfiltered series
/// is returned instead.
pub fn filter_window(series: &[DataPoint], window: &TimeWindow) -> Vec<DataPoint> {
    let filtered: Vec<DataPoint> = series
        .iter()
        .filter(|p| p.timestamp >= window.start && p.timestamp <= window.end)
        .cloned()
        .collect();

    if filtered.len() < MIN_WINDOW_POINTS {
        series.to_vec()
    } else {
        filtered
    }
}

/// Finds the point whose timestamp is closest to `query`.
///
/// Precondition: `series` is sorted ascending by timestamp. Binary search for
/// the insertion position, then compare the two neighbors. Queries outside the
/// covered range resolve to the boundary point.
pub fn nearest<'a>(
    series: &'a [DataPoint],
    query: DateTime<Utc>,
) -> PipelineResult<&'a DataPoint> {
    if series.is_empty() {
        return Err(PipelineError::EmptySeries);
    }

    let idx = series.partition_point(|p| p.timestamp < query);
    if idx == 0 {
        return Ok(&series[0]);
    }
    if idx == series.len() {
        return Ok(&series[series.len() - 1]);
    }

    let left = &series[idx - 1];
    let right = &series[idx];
    if query - left.timestamp > right.timestamp - query {
        Ok(right)
    } else {
        Ok(left)
    }
}

/// Two series matched point-for-point by calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPoint {
    pub timestamp: DateTime<Utc>,
    pub a: f64,
    pub b: f64,
}

/// Pairs points from `a` and `b` whose calendar dates are identical,
/// ignoring time-of-day. Unmatched points on either side are excluded,
/// never interpolated.
pub fn match_by_date(a: &[DataPoint], b: &[DataPoint]) -> Vec<AlignedPoint> {
    let b_map: HashMap<chrono::NaiveDate, f64> = b
        .iter()
        .map(|p| (p.timestamp.date_naive(), p.value))
        .collect();

    a.iter()
        .filter_map(|p| {
            b_map.get(&p.timestamp.date_naive()).map(|&val_b| AlignedPoint {
                timestamp: p.timestamp,
                a: p.value,
                b: val_b,
            })
        })
        .collect()
}

/// Extracts one numeric column from a table as a single-metric series.
/// Rows missing the column (null/empty/non-numeric at parse time) or holding
/// a non-finite value are excluded.
pub fn column_series(rows: &[MetricRow], column: &str) -> Vec<DataPoint> {
    rows.iter()
        .filter_map(|row| {
            row.values
                .get(column)
                .filter(|v| v.is_finite())
                .map(|&value| DataPoint {
                    timestamp: row.timestamp,
                    value,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn point(day: u32, value: f64) -> DataPoint {
        DataPoint {
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            value,
        }
    }

    fn monthly_series(len: u32) -> Vec<DataPoint> {
        (1..=len)
            .map(|m| DataPoint {
                timestamp: Utc.with_ymd_and_hms(2024, m, 1, 0, 0, 0).unwrap(),
                value: m as f64,
            })
            .collect()
    }

    #[test]
    fn test_filter_window_keeps_inclusive_bounds() {
        let series: Vec<DataPoint> = (1..=20).map(|d| point(d, d as f64)).collect();
        let window = TimeWindow {
            start: Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap(),
        };

        let filtered = filter_window(&series, &window);
        assert_eq!(filtered.len(), 12);
        assert_eq!(filtered[0], point(5, 5.0));
        assert_eq!(filtered[11], point(16, 16.0));
    }

    #[test]
    fn test_filter_window_falls_back_below_threshold() {
        // 12 monthly points narrowed to a one-month window leaves 1 point,
        // which is under the threshold: the full series comes back untouched.
        let series = monthly_series(12);
        let window = TimeWindow {
            start: Utc.with_ymd_and_hms(2024, 11, 15, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 12, 15, 0, 0, 0).unwrap(),
        };

        let filtered = filter_window(&series, &window);
        assert_eq!(filtered, series);
    }

    #[test]
    fn test_filter_window_exactly_at_threshold() {
        let series: Vec<DataPoint> = (1..=20).map(|d| point(d, d as f64)).collect();
        let window = TimeWindow {
            start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap(),
        };

        let filtered = filter_window(&series, &window);
        assert_eq!(filtered.len(), 10);
    }

    #[test]
    fn test_nearest_picks_minimal_delta() {
        let series = vec![point(1, 1.0), point(10, 2.0), point(20, 3.0)];

        let q = Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap();
        assert_eq!(nearest(&series, q).unwrap(), &series[0]);

        let q = Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap();
        assert_eq!(nearest(&series, q).unwrap(), &series[1]);

        // Exhaustive check: no other point is strictly closer.
        let q = Utc.with_ymd_and_hms(2024, 1, 14, 12, 0, 0).unwrap();
        let best = nearest(&series, q).unwrap();
        let best_delta = (q - best.timestamp).abs();
        for p in &series {
            assert!((q - p.timestamp).abs() >= best_delta);
        }
    }

    #[test]
    fn test_nearest_clamps_to_boundaries() {
        let series = vec![point(5, 1.0), point(10, 2.0)];

        let before = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(nearest(&series, before).unwrap(), &series[0]);

        let after = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        assert_eq!(nearest(&series, after).unwrap(), &series[1]);
    }

    #[test]
    fn test_nearest_empty_series_errors() {
        let q = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            nearest(&[], q),
            Err(PipelineError::EmptySeries)
        ));
    }

    #[test]
    fn test_match_by_date_ignores_time_of_day() {
        let a = vec![DataPoint {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 3, 16, 0, 0).unwrap(),
            value: 10.0,
        }];
        let b = vec![DataPoint {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
            value: 20.0,
        }];

        let pairs = match_by_date(&a, &b);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].a, 10.0);
        assert_eq!(pairs[0].b, 20.0);
    }

    #[test]
    fn test_match_by_date_disjoint_dates_is_empty() {
        let a = vec![point(1, 10.0), point(2, 20.0), point(3, 15.0)];
        let b = vec![point(5, 50.0), point(6, 45.0), point(7, 60.0)];
        assert!(match_by_date(&a, &b).is_empty());
    }

    #[test]
    fn test_column_series_drops_missing_and_non_finite() {
        let ts = |d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap();
        let row = |d: u32, entries: &[(&str, f64)]| MetricRow {
            timestamp: ts(d),
            values: entries
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        };

        let rows = vec![
            row(1, &[("doge", 0.08)]),
            row(2, &[("shib", 0.01)]),
            row(3, &[("doge", f64::NAN)]),
            row(4, &[("doge", 0.10)]),
        ];

        let series = column_series(&rows, "doge");
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].value, 0.08);
        assert_eq!(series[1].value, 0.10);
    }
}
