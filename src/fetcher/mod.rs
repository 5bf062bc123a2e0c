use crate::error::{PipelineError, PipelineResult};
use crate::models::{LoadedSeries, LoadedTable};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

pub mod analytics;
pub mod daily_csv;
pub mod dominance;
pub mod history_json;

/// Where the static data files live, plus the coin the price-history source
/// should load. Passed explicitly; fetchers hold no global state.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub base_url: String,
    pub coin: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/data".to_string(),
            coin: "doge".to_string(),
        }
    }
}

/// Raw payload of one fetched source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceData {
    Series(LoadedSeries),
    Table(LoadedTable),
}

#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch(&self) -> Result<SourceData>;
}

/// All raw sources one chart needs, keyed by source slug. Owned by a single
/// chart session; rebuilds read from it without re-fetching.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SourceBundle {
    sources: BTreeMap<String, SourceData>,
}

impl SourceBundle {
    pub fn insert(&mut self, name: &str, data: SourceData) {
        self.sources.insert(name.to_string(), data);
    }

    pub fn series(&self, name: &str) -> PipelineResult<&LoadedSeries> {
        match self.sources.get(name) {
            Some(SourceData::Series(series)) => Ok(series),
            _ => Err(PipelineError::MissingSource(name.to_string())),
        }
    }

    pub fn table(&self, name: &str) -> PipelineResult<&LoadedTable> {
        match self.sources.get(name) {
            Some(SourceData::Table(table)) => Ok(table),
            _ => Err(PipelineError::MissingSource(name.to_string())),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(|k| k.as_str())
    }
}
