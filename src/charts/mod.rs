use crate::error::PipelineResult;
use crate::fetcher::SourceBundle;
use crate::models::{ChartModel, ViewState};
use chrono::{DateTime, Utc};

pub mod change_compare;
pub mod coin_price;
pub mod dominance_price;
pub mod engagement_metrics;
pub mod engagement_price;
pub mod registry;

/// Assembles a renderer-ready model from fetched sources and explicit view
/// state. Implementations must be pure: same bundle, state, and `now` always
/// produce an identical model.
pub trait ChartBuilder: Send + Sync {
    /// Unique slug (e.g. "dominance_price")
    fn slug(&self) -> &str;

    /// Display name
    fn name(&self) -> &str;

    /// Source slugs this chart needs fetched before it can build
    fn required_sources(&self) -> Vec<&str>;

    /// Build the model for one interaction state.
    fn build(
        &self,
        sources: &SourceBundle,
        state: &ViewState,
        now: DateTime<Utc>,
    ) -> PipelineResult<ChartModel>;
}
