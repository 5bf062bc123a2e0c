use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

use crate::charts::change_compare::ChangeCompareChart;
use crate::charts::coin_price::CoinPriceChart;
use crate::charts::dominance_price::DominancePriceChart;
use crate::charts::engagement_metrics::EngagementMetricsChart;
use crate::charts::engagement_price::EngagementPriceChart;
use crate::charts::ChartBuilder;
use crate::error::{PipelineError, PipelineResult};
use crate::fetcher::analytics::AnalyticsFetcher;
use crate::fetcher::daily_csv::DailyCsvFetcher;
use crate::fetcher::dominance::DominanceFetcher;
use crate::fetcher::history_json::HistoryFetcher;
use crate::fetcher::{DataSource, SourceConfig};

#[derive(Debug, Clone, Serialize)]
pub struct ChartMetadata {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub sources: Vec<String>,
}

macro_rules! chart {
    ($slug:expr, $name:expr, $desc:expr, [$($src:expr),+]) => {
        ChartMetadata {
            slug: $slug.to_string(),
            name: $name.to_string(),
            description: $desc.to_string(),
            sources: vec![$($src.to_string()),+],
        }
    };
}

static CHARTS: Lazy<Vec<ChartMetadata>> = Lazy::new(|| {
    vec![
        chart!("dominance_price", "Bitcoin Market Dominance vs Doge Price",
               "BTC dominance and DOGE close price on twin value axes",
               ["btc_dominance", "prices"]),
        chart!("engagement_price", "Doge Price vs X Engagement",
               "DOGE price line with engagement bubbles and correlation gauge",
               ["prices", "x_analytics"]),
        chart!("change_compare", "Bitcoin vs Meme Coins Price Change",
               "Daily or 7-day percentage change, BTC against the meme average",
               ["btc_change", "prices"]),
        chart!("engagement_metrics", "X Engagement Metrics",
               "Per-day account metrics with toggleable visibility",
               ["x_analytics"]),
        chart!("coin_price", "Meme Coin Price",
               "Close-price history for one selected coin",
               ["coin_history"]),
    ]
});

/// HashMap for O(1) slug -> index lookup
static CHART_MAP: Lazy<HashMap<String, usize>> = Lazy::new(|| {
    CHARTS
        .iter()
        .enumerate()
        .map(|(idx, chart)| (chart.slug.clone(), idx))
        .collect()
});

pub struct Registry;

impl Registry {
    /// All registered charts (for listing in a shell or CLI).
    pub fn all_charts() -> &'static Vec<ChartMetadata> {
        &CHARTS
    }

    /// O(1) lookup by slug
    pub fn get_metadata(slug: &str) -> Option<ChartMetadata> {
        CHART_MAP
            .get(slug)
            .and_then(|&idx| CHARTS.get(idx))
            .cloned()
    }

    pub fn get_builder(slug: &str) -> Option<Box<dyn ChartBuilder>> {
        match slug {
            "dominance_price" => Some(Box::new(DominancePriceChart)),
            "engagement_price" => Some(Box::new(EngagementPriceChart)),
            "change_compare" => Some(Box::new(ChangeCompareChart)),
            "engagement_metrics" => Some(Box::new(EngagementMetricsChart)),
            "coin_price" => Some(Box::new(CoinPriceChart)),
            _ => None,
        }
    }

    /// Constructs the fetchers for every source a chart requires.
    pub fn sources_for(
        slug: &str,
        cfg: &SourceConfig,
    ) -> PipelineResult<Vec<Box<dyn DataSource>>> {
        let metadata =
            Self::get_metadata(slug).ok_or_else(|| PipelineError::UnknownChart(slug.to_string()))?;

        let mut fetchers: Vec<Box<dyn DataSource>> = Vec::with_capacity(metadata.sources.len());
        for source in &metadata.sources {
            let fetcher: Box<dyn DataSource> = match source.as_str() {
                "prices" => Box::new(DailyCsvFetcher::new(
                    "prices",
                    format!("{}/meme-coins/simplified-prices.csv", cfg.base_url),
                )),
                "btc_change" => Box::new(DailyCsvFetcher::new(
                    "btc_change",
                    format!("{}/bitcoin-price-change.csv", cfg.base_url),
                )),
                "btc_dominance" => Box::new(DominanceFetcher::new(&cfg.base_url)),
                "x_analytics" => Box::new(AnalyticsFetcher::new(&cfg.base_url)),
                "coin_history" => Box::new(HistoryFetcher::new(&cfg.base_url, &cfg.coin)),
                other => return Err(PipelineError::MissingSource(other.to_string())),
            };
            fetchers.push(fetcher);
        }

        Ok(fetchers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_chart_has_a_builder_with_matching_sources() {
        for chart in Registry::all_charts() {
            let builder = Registry::get_builder(&chart.slug)
                .unwrap_or_else(|| panic!("no builder for {}", chart.slug));
            assert_eq!(builder.slug(), chart.slug);
            let expected: Vec<&str> = chart.sources.iter().map(|s| s.as_str()).collect();
            assert_eq!(builder.required_sources(), expected);
        }
    }

    #[test]
    fn test_sources_resolve_for_every_chart() {
        let cfg = SourceConfig::default();
        for chart in Registry::all_charts() {
            let fetchers = Registry::sources_for(&chart.slug, &cfg).unwrap();
            let names: Vec<&str> = fetchers.iter().map(|f| f.name()).collect();
            let expected: Vec<&str> = chart.sources.iter().map(|s| s.as_str()).collect();
            assert_eq!(names, expected);
        }
    }

    #[test]
    fn test_unknown_chart() {
        assert!(Registry::get_metadata("nope").is_none());
        assert!(Registry::get_builder("nope").is_none());
        assert!(Registry::sources_for("nope", &SourceConfig::default()).is_err());
    }
}
