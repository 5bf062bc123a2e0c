use super::{DataSource, SourceData};
use crate::models::{LoadedTable, MetricRow};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::collections::BTreeMap;
use tracing::warn;

/// Loads the X/Twitter account analytics export
/// (`Impressions, Likes, Engagements, Replies, Reposts, ...` per day).
pub struct AnalyticsFetcher {
    url: String,
    client: Client,
}

impl AnalyticsFetcher {
    pub fn new(base_url: &str) -> Self {
        Self {
            url: format!("{}/account_overview_analytics_phicoin.csv", base_url),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl DataSource for AnalyticsFetcher {
    fn name(&self) -> &str {
        "x_analytics"
    }

    async fn fetch(&self) -> Result<SourceData> {
        let resp = self.client.get(&self.url).send().await?;
        if !resp.status().is_success() {
            return Err(anyhow!("analytics source error: {}", resp.status()));
        }

        let body = resp.text().await?;
        let table = parse_analytics_csv(&body)?;
        Ok(SourceData::Table(table))
    }
}

/// The export writes dates as free text, e.g. `"Tuesday, March 4, 2025"`,
/// sometimes with stray quote characters around the field.
fn parse_free_text_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.trim().trim_matches('"').trim();
    NaiveDate::parse_from_str(cleaned, "%A, %B %d, %Y").ok()
}

/// Metric headers become snake_case keys ("Profile visits" -> "profile_visits").
fn metric_key(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

pub fn parse_analytics_csv(text: &str) -> Result<LoadedTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let date_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("date"))
        .ok_or_else(|| anyhow!("analytics export has no Date column"))?;

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for record in reader.records() {
        let record = record?;

        let date = record.get(date_idx).and_then(parse_free_text_date);
        let Some(date) = date else {
            dropped += 1;
            continue;
        };

        let mut values = BTreeMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if idx == date_idx {
                continue;
            }
            if let Some(cell) = record.get(idx) {
                if let Ok(value) = cell.trim().parse::<f64>() {
                    if value.is_finite() {
                        values.insert(metric_key(header), value);
                    }
                }
            }
        }

        rows.push(MetricRow {
            timestamp: date.and_hms_opt(0, 0, 0).unwrap().and_utc(),
            values,
        });
    }

    rows.sort_by_key(|r| r.timestamp);

    if dropped > 0 {
        warn!(source = "x_analytics", dropped, "dropped rows with unreadable dates");
    }

    Ok(LoadedTable { rows, dropped })
}
