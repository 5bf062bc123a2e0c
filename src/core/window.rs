use chrono::{DateTime, Duration, Months, Utc};
use serde::Serialize;

/// Selectable look-back periods for the time-range filter buttons.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    OneMonth,
    ThreeMonths,
    SixMonths,
    NineMonths,
    TwelveMonths,
    OneYear,
    FiveYears,
}

/// Calendar range used to filter a series, recomputed from "now" on every
/// period selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    pub const ALL: [Period; 7] = [
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::NineMonths,
        Period::TwelveMonths,
        Period::OneYear,
        Period::FiveYears,
    ];

    pub fn parse(label: &str) -> Option<Period> {
        match label.to_lowercase().as_str() {
            "1m" => Some(Period::OneMonth),
            "3m" => Some(Period::ThreeMonths),
            "6m" => Some(Period::SixMonths),
            "9m" => Some(Period::NineMonths),
            "12m" => Some(Period::TwelveMonths),
            "1y" => Some(Period::OneYear),
            "5y" => Some(Period::FiveYears),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::OneMonth => "1m",
            Period::ThreeMonths => "3m",
            Period::SixMonths => "6m",
            Period::NineMonths => "9m",
            Period::TwelveMonths => "12m",
            Period::OneYear => "1y",
            Period::FiveYears => "5y",
        }
    }

    /// Window ending at `now`. Month periods step back whole calendar months;
    /// year periods use fixed 365-day years, matching the source datasets.
    pub fn window(&self, now: DateTime<Utc>) -> TimeWindow {
        let months_back = |n: u32| now.checked_sub_months(Months::new(n)).unwrap_or(now);
        let start = match self {
            Period::OneMonth => months_back(1),
            Period::ThreeMonths => months_back(3),
            Period::SixMonths => months_back(6),
            Period::NineMonths => months_back(9),
            Period::TwelveMonths => months_back(12),
            Period::OneYear => now - Duration::days(365),
            Period::FiveYears => now - Duration::days(5 * 365),
        };
        TimeWindow { start, end: now }
    }
}
