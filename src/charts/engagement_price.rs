use crate::analysis::scaling::{radius_domain, time_extent, zero_floor_domain};
use crate::analysis::statistics::correlate_by_date;
use crate::charts::ChartBuilder;
use crate::core::timeseries::{column_series, filter_window};
use crate::error::PipelineResult;
use crate::fetcher::SourceBundle;
use crate::models::{ChartModel, ViewState};
use chrono::{DateTime, Utc};

/// DOGE price line with X engagement bubbles sized by the radius domain,
/// plus the price/engagement correlation gauge value.
pub struct EngagementPriceChart;

impl ChartBuilder for EngagementPriceChart {
    fn slug(&self) -> &str {
        "engagement_price"
    }

    fn name(&self) -> &str {
        "Doge Price vs X Engagement"
    }

    fn required_sources(&self) -> Vec<&str> {
        vec!["prices", "x_analytics"]
    }

    fn build(
        &self,
        sources: &SourceBundle,
        state: &ViewState,
        now: DateTime<Utc>,
    ) -> PipelineResult<ChartModel> {
        let window = state.period.window(now);

        let prices = sources.table("prices")?;
        let analytics = sources.table("x_analytics")?;

        // Zero prices are placeholder rows in the sheet, not real quotes.
        let price: Vec<_> = column_series(&prices.rows, "doge")
            .into_iter()
            .filter(|p| p.value != 0.0)
            .collect();
        let engagement = column_series(&analytics.rows, "engagements");

        let price = filter_window(&price, &window);
        let engagement = filter_window(&engagement, &window);

        let correlation = correlate_by_date(&engagement, &price);

        let mut model = ChartModel::new(self.slug());
        model.x_domain = time_extent(&[&price]);
        if let Some(domain) = zero_floor_domain(&price) {
            model.domains.insert("price".to_string(), domain);
        }
        if let Some(domain) = radius_domain(&engagement) {
            model.domains.insert("radius".to_string(), domain);
        }
        model
            .stats
            .insert("correlation".to_string(), correlation.coefficient);
        model.stats.insert(
            "correlation_samples".to_string(),
            Some(correlation.samples as f64),
        );
        model.series.insert("price".to_string(), price);
        model.series.insert("engagements".to_string(), engagement);

        Ok(model)
    }
}
