use crate::analysis::scaling::{extent_domain, time_extent};
use crate::charts::ChartBuilder;
use crate::core::timeseries::{column_series, filter_window};
use crate::error::PipelineResult;
use crate::fetcher::SourceBundle;
use crate::models::{ChartModel, ViewState};
use chrono::{DateTime, Utc};

/// Bitcoin vs meme-coin-average percentage change, with the daily/7-day
/// toggle selecting which column pair feeds the lines.
pub struct ChangeCompareChart;

impl ChartBuilder for ChangeCompareChart {
    fn slug(&self) -> &str {
        "change_compare"
    }

    fn name(&self) -> &str {
        "Bitcoin vs Meme Coins Price Change"
    }

    fn required_sources(&self) -> Vec<&str> {
        vec!["btc_change", "prices"]
    }

    fn build(
        &self,
        sources: &SourceBundle,
        state: &ViewState,
        now: DateTime<Utc>,
    ) -> PipelineResult<ChartModel> {
        let window = state.period.window(now);

        let btc_rows = sources.table("btc_change")?;
        let meme_rows = sources.table("prices")?;

        // Switching the toggle re-derives both lines from the same raw rows;
        // a dataset without the seven-day column just yields an empty line.
        let btc = column_series(&btc_rows.rows, state.change_kind.btc_column());
        let meme = column_series(&meme_rows.rows, state.change_kind.meme_column());

        let btc = filter_window(&btc, &window);
        let meme = filter_window(&meme, &window);

        let mut model = ChartModel::new(self.slug());
        model.x_domain = time_extent(&[&btc, &meme]);
        // Percentage axes keep the raw extent, no padding.
        if let Some(domain) = extent_domain(&[&btc, &meme]) {
            model.domains.insert("change".to_string(), domain);
        }
        model.series.insert("bitcoin".to_string(), btc);
        model.series.insert("memecoins".to_string(), meme);

        Ok(model)
    }
}
