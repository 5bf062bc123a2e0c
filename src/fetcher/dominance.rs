use super::{DataSource, SourceData};
use crate::models::{DataPoint, LoadedSeries};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Loads the Bitcoin market-dominance JSON
/// (`{ data: { points: [ { timestamp, dominance: [pct, ...] } ] } }`).
pub struct DominanceFetcher {
    url: String,
    client: Client,
}

impl DominanceFetcher {
    pub fn new(base_url: &str) -> Self {
        Self {
            url: format!("{}/dominance.json", base_url),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl DataSource for DominanceFetcher {
    fn name(&self) -> &str {
        "btc_dominance"
    }

    async fn fetch(&self) -> Result<SourceData> {
        let resp = self.client.get(&self.url).send().await?;
        if !resp.status().is_success() {
            return Err(anyhow!("dominance source error: {}", resp.status()));
        }

        let json: DominanceResponse = resp.json().await?;
        Ok(SourceData::Series(parse_dominance(json)))
    }
}

#[derive(Deserialize)]
pub struct DominanceResponse {
    data: DominanceData,
}

#[derive(Deserialize)]
struct DominanceData {
    points: Vec<DominancePoint>,
}

#[derive(Deserialize)]
struct DominancePoint {
    // The feed has emitted both "1704067200" and 1704067200 over time.
    timestamp: Value,
    #[serde(default)]
    dominance: Vec<f64>,
}

fn epoch_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub fn parse_dominance(json: DominanceResponse) -> LoadedSeries {
    let mut points = Vec::new();
    let mut dropped = 0usize;

    for entry in json.data.points {
        let timestamp = epoch_seconds(&entry.timestamp)
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single());
        let value = entry.dominance.first().copied();

        match (timestamp, value) {
            (Some(timestamp), Some(value)) => points.push(DataPoint { timestamp, value }),
            _ => dropped += 1,
        }
    }

    points.sort_by_key(|p| p.timestamp);

    if dropped > 0 {
        warn!(dropped, "skipped dominance entries without values");
    }

    LoadedSeries { points, dropped }
}
