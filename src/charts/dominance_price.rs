use crate::analysis::scaling::{padded_domain, time_extent};
use crate::charts::ChartBuilder;
use crate::core::timeseries::{column_series, filter_window};
use crate::error::PipelineResult;
use crate::fetcher::SourceBundle;
use crate::models::{ChartModel, ViewState};
use chrono::{DateTime, Utc};

/// Bitcoin market dominance against the DOGE close price, on separate
/// value axes sharing the time axis.
pub struct DominancePriceChart;

impl ChartBuilder for DominancePriceChart {
    fn slug(&self) -> &str {
        "dominance_price"
    }

    fn name(&self) -> &str {
        "Bitcoin Market Dominance vs Doge Price"
    }

    fn required_sources(&self) -> Vec<&str> {
        vec!["btc_dominance", "prices"]
    }

    fn build(
        &self,
        sources: &SourceBundle,
        state: &ViewState,
        now: DateTime<Utc>,
    ) -> PipelineResult<ChartModel> {
        let window = state.period.window(now);

        let dominance = sources.series("btc_dominance")?;
        let prices = sources.table("prices")?;

        let dominance = filter_window(&dominance.points, &window);
        let price = filter_window(&column_series(&prices.rows, "doge"), &window);

        let mut model = ChartModel::new(self.slug());
        model.x_domain = time_extent(&[&dominance, &price]);
        if let Some(domain) = padded_domain(&dominance) {
            model.domains.insert("dominance".to_string(), domain);
        }
        if let Some(domain) = padded_domain(&price) {
            model.domains.insert("price".to_string(), domain);
        }
        model.series.insert("dominance".to_string(), dominance);
        model.series.insert("price".to_string(), price);

        Ok(model)
    }
}
