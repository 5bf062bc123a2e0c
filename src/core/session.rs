use crate::charts::registry::Registry;
use crate::charts::ChartBuilder;
use crate::core::orchestrator;
use crate::error::PipelineResult;
use crate::fetcher::{SourceBundle, SourceConfig};
use crate::models::{ChartModel, ViewState};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Committed {
    ticket: u64,
    model: Option<Arc<ChartModel>>,
}

/// One chart's owned pipeline state: its builder, its fetched sources, and
/// the model currently on display.
///
/// Sources are fetched once at open; period/toggle changes only re-run the
/// transform. Rebuilds take a ticket at initiation, and a finished build
/// commits only if nothing initiated later has committed already, so a stale
/// rebuild can never overwrite a newer one.
pub struct ChartSession {
    builder: Box<dyn ChartBuilder>,
    sources: SourceBundle,
    next_ticket: AtomicU64,
    committed: Mutex<Committed>,
}

impl ChartSession {
    pub fn new(builder: Box<dyn ChartBuilder>, sources: SourceBundle) -> Self {
        Self {
            builder,
            sources,
            next_ticket: AtomicU64::new(1),
            committed: Mutex::new(Committed::default()),
        }
    }

    /// Resolves the chart from the registry and fetches its sources.
    pub async fn open(chart_slug: &str, cfg: &SourceConfig) -> PipelineResult<Self> {
        let builder = Registry::get_builder(chart_slug)
            .ok_or_else(|| crate::error::PipelineError::UnknownChart(chart_slug.to_string()))?;
        let sources = orchestrator::load_chart_sources(chart_slug, cfg).await?;
        Ok(Self::new(builder, sources))
    }

    pub fn slug(&self) -> &str {
        self.builder.slug()
    }

    pub fn sources(&self) -> &SourceBundle {
        &self.sources
    }

    /// Rebuilds the model from the already-fetched sources and commits it if
    /// it is still the newest build. Returns the freshly built model.
    pub fn rebuild(
        &self,
        state: &ViewState,
        now: DateTime<Utc>,
    ) -> PipelineResult<Arc<ChartModel>> {
        let ticket = self.begin();
        let model = Arc::new(self.builder.build(&self.sources, state, now)?);
        self.commit(ticket, model.clone());
        Ok(model)
    }

    /// The model of the newest committed rebuild.
    pub fn current(&self) -> Option<Arc<ChartModel>> {
        self.committed.lock().unwrap().model.clone()
    }

    fn begin(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst)
    }

    fn commit(&self, ticket: u64, model: Arc<ChartModel>) -> bool {
        let mut slot = self.committed.lock().unwrap();
        if ticket >= slot.ticket {
            slot.ticket = ticket;
            slot.model = Some(model);
            true
        } else {
            false
        }
    }
}
