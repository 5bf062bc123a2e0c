use crate::core::timeseries::{match_by_date, AlignedPoint};
use crate::models::{CorrelationResult, DataPoint};

/// Pearson correlation coefficient over pre-aligned pairs.
///
/// The coefficient is absent (`None`) when fewer than two pairs exist or when
/// either side has zero variance; NaN and infinities never leave this
/// function. The result is clamped to [-1, 1] against floating point error.
pub fn pearson(pairs: &[AlignedPoint]) -> CorrelationResult {
    let n = pairs.len();
    if n < 2 {
        return CorrelationResult {
            coefficient: None,
            samples: n,
        };
    }

    let mean_a = pairs.iter().map(|p| p.a).sum::<f64>() / n as f64;
    let mean_b = pairs.iter().map(|p| p.b).sum::<f64>() / n as f64;

    let mut numer = 0.0;
    let mut denom_a = 0.0;
    let mut denom_b = 0.0;

    for pair in pairs {
        let da = pair.a - mean_a;
        let db = pair.b - mean_b;
        numer += da * db;
        denom_a += da * da;
        denom_b += db * db;
    }

    if denom_a == 0.0 || denom_b == 0.0 {
        return CorrelationResult {
            coefficient: None,
            samples: n,
        };
    }

    let coefficient = (numer / (denom_a.sqrt() * denom_b.sqrt())).clamp(-1.0, 1.0);

    CorrelationResult {
        coefficient: Some(coefficient),
        samples: n,
    }
}

/// Aligns two series on calendar dates and correlates the overlap.
pub fn correlate_by_date(a: &[DataPoint], b: &[DataPoint]) -> CorrelationResult {
    pearson(&match_by_date(a, b))
}
