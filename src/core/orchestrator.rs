use crate::error::{PipelineError, PipelineResult};
use crate::fetcher::{DataSource, SourceBundle, SourceConfig};
use crate::charts::registry::Registry;
use tracing::debug;

/// Fetches all sources concurrently and joins into one bundle.
///
/// A single failing source fails the whole load; charts never render from a
/// partial bundle.
pub async fn load_sources(
    fetchers: Vec<Box<dyn DataSource>>,
) -> PipelineResult<SourceBundle> {
    let mut handles = Vec::with_capacity(fetchers.len());
    for fetcher in fetchers {
        handles.push(tokio::spawn(async move {
            let name = fetcher.name().to_string();
            let result = fetcher.fetch().await;
            (name, result)
        }));
    }

    let mut bundle = SourceBundle::default();
    for handle in handles {
        let (name, result) = handle.await.map_err(|e| PipelineError::SourceFetch {
            name: "fetch task".to_string(),
            reason: e.to_string(),
        })?;

        match result {
            Ok(data) => {
                debug!(source = name.as_str(), "source loaded");
                bundle.insert(&name, data);
            }
            Err(e) => {
                return Err(PipelineError::SourceFetch {
                    name,
                    reason: e.to_string(),
                })
            }
        }
    }

    Ok(bundle)
}

/// Resolves a chart's fetchers from the registry and loads its bundle.
pub async fn load_chart_sources(
    chart_slug: &str,
    cfg: &SourceConfig,
) -> PipelineResult<SourceBundle> {
    let fetchers = Registry::sources_for(chart_slug, cfg)?;
    load_sources(fetchers).await
}
