use crate::analysis::scaling::{time_extent, zero_floor_domain};
use crate::charts::ChartBuilder;
use crate::core::timeseries::filter_window;
use crate::error::PipelineResult;
use crate::fetcher::SourceBundle;
use crate::models::{ChartModel, ViewState};
use chrono::{DateTime, Utc};

/// Close-price line for one selected meme coin (doge, shib, floki, pepe,
/// bonk), loaded from that coin's history document.
pub struct CoinPriceChart;

impl ChartBuilder for CoinPriceChart {
    fn slug(&self) -> &str {
        "coin_price"
    }

    fn name(&self) -> &str {
        "Meme Coin Price"
    }

    fn required_sources(&self) -> Vec<&str> {
        vec!["coin_history"]
    }

    fn build(
        &self,
        sources: &SourceBundle,
        state: &ViewState,
        now: DateTime<Utc>,
    ) -> PipelineResult<ChartModel> {
        let window = state.period.window(now);
        let history = sources.series("coin_history")?;

        let price = filter_window(&history.points, &window);

        let mut model = ChartModel::new(self.slug());
        model.x_domain = time_extent(&[&price]);
        if let Some(domain) = zero_floor_domain(&price) {
            model.domains.insert("price".to_string(), domain);
        }
        model.series.insert("price".to_string(), price);

        Ok(model)
    }
}
