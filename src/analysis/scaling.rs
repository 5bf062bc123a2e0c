use crate::models::DataPoint;
use chrono::{DateTime, Utc};

fn min_max(series: &[DataPoint]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in series {
        min = min.min(p.value);
        max = max.max(p.value);
    }
    if series.is_empty() {
        None
    } else {
        Some((min, max))
    }
}

/// Value-axis domain with 5% breathing room on both ends.
pub fn padded_domain(series: &[DataPoint]) -> Option<(f64, f64)> {
    min_max(series).map(|(min, max)| (min * 0.95, max * 1.05))
}

/// Zero-floored value-axis domain with 10% headroom, for charts anchored at 0.
pub fn zero_floor_domain(series: &[DataPoint]) -> Option<(f64, f64)> {
    min_max(series).map(|(_, max)| (0.0, max * 1.1))
}

/// Raw extent across several series, no padding.
pub fn extent_domain(series_list: &[&[DataPoint]]) -> Option<(f64, f64)> {
    let mut acc: Option<(f64, f64)> = None;
    for series in series_list {
        if let Some((min, max)) = min_max(series) {
            acc = Some(match acc {
                Some((lo, hi)) => (lo.min(min), hi.max(max)),
                None => (min, max),
            });
        }
    }
    acc
}

/// Domain for a bubble-radius scale: `[0, max]`. The sqrt mapping onto pixel
/// radii belongs to the renderer; the pipeline only supplies the numbers.
pub fn radius_domain(series: &[DataPoint]) -> Option<(f64, f64)> {
    min_max(series).map(|(_, max)| (0.0, max))
}

/// Union time extent of several series.
pub fn time_extent(series_list: &[&[DataPoint]]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let mut acc: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
    for series in series_list {
        for p in *series {
            acc = Some(match acc {
                Some((lo, hi)) => (lo.min(p.timestamp), hi.max(p.timestamp)),
                None => (p.timestamp, p.timestamp),
            });
        }
    }
    acc
}
