pub mod analysis;
pub mod charts;
pub mod core;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod telemetry;

pub use crate::charts::ChartBuilder;
pub use crate::core::session::ChartSession;
pub use crate::error::{PipelineError, PipelineResult};
pub use crate::fetcher::SourceConfig;
pub use crate::models::{ChartModel, ViewState};

use chrono::Utc;
use std::sync::Arc;

/// One-shot convenience: fetch a chart's sources and build its model for the
/// given view state. Interactive callers should keep the [`ChartSession`]
/// instead, so later rebuilds reuse the fetched data.
pub async fn build_chart(
    slug: &str,
    cfg: &SourceConfig,
    state: &ViewState,
) -> PipelineResult<Arc<ChartModel>> {
    let session = ChartSession::open(slug, cfg).await?;
    session.rebuild(state, Utc::now())
}
