use super::{DataSource, SourceData};
use crate::models::{DataPoint, LoadedSeries};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

/// Loads one coin's close-price history JSON
/// (`{ data: { points: { "<epoch_seconds>": { c: [close, ...] } } } }`).
pub struct HistoryFetcher {
    coin: String,
    url: String,
    client: Client,
}

impl HistoryFetcher {
    pub fn new(base_url: &str, coin: &str) -> Self {
        Self {
            coin: coin.to_string(),
            url: format!("{}/meme-coins/{}.json", base_url, coin),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl DataSource for HistoryFetcher {
    fn name(&self) -> &str {
        "coin_history"
    }

    async fn fetch(&self) -> Result<SourceData> {
        let resp = self.client.get(&self.url).send().await?;
        if !resp.status().is_success() {
            return Err(anyhow!(
                "history source error for '{}': {}",
                self.coin,
                resp.status()
            ));
        }

        let json: HistoryResponse = resp.json().await?;
        Ok(SourceData::Series(parse_history(&self.coin, json)))
    }
}

#[derive(Deserialize)]
pub struct HistoryResponse {
    data: HistoryData,
}

#[derive(Deserialize)]
struct HistoryData {
    points: HashMap<String, HistoryPoint>,
}

#[derive(Deserialize)]
struct HistoryPoint {
    #[serde(default)]
    c: Option<Vec<f64>>,
}

/// Entries with a malformed epoch key or a missing/empty `c` array are
/// skipped; the rest of the document still loads.
pub fn parse_history(coin: &str, json: HistoryResponse) -> LoadedSeries {
    let mut points = Vec::new();
    let mut dropped = 0usize;

    for (epoch, entry) in json.data.points {
        let close = entry.c.as_ref().and_then(|c| c.first().copied());
        let timestamp = epoch
            .parse::<i64>()
            .ok()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single());

        match (timestamp, close) {
            (Some(timestamp), Some(value)) => points.push(DataPoint { timestamp, value }),
            _ => dropped += 1,
        }
    }

    points.sort_by_key(|p| p.timestamp);

    if dropped > 0 {
        warn!(coin, dropped, "skipped history entries without close prices");
    }

    LoadedSeries { points, dropped }
}
