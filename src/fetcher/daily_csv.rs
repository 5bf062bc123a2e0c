use super::{DataSource, SourceData};
use crate::models::{LoadedTable, MetricRow};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::collections::BTreeMap;
use tracing::warn;

/// Loads a CSV source with an ISO `date` column plus arbitrary numeric
/// columns. Serves both the coin price sheet and the percentage-change sheet.
pub struct DailyCsvFetcher {
    name: String,
    url: String,
    client: Client,
}

impl DailyCsvFetcher {
    pub fn new(name: &str, url: String) -> Self {
        Self {
            name: name.to_string(),
            url,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl DataSource for DailyCsvFetcher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<SourceData> {
        let resp = self.client.get(&self.url).send().await?;
        if !resp.status().is_success() {
            return Err(anyhow!("CSV source error ({}): {}", self.url, resp.status()));
        }

        let body = resp.text().await?;
        let table = parse_daily_csv(&self.name, &body)?;
        Ok(SourceData::Table(table))
    }
}

/// Parses CSV text into a table of daily metric rows.
///
/// A row with an unparsable date is dropped (counted). Numeric cells that are
/// empty or fail to coerce are absent from that row's value map, so per-column
/// extraction later sees exactly the rows where the field was valid.
pub fn parse_daily_csv(name: &str, text: &str) -> Result<LoadedTable> {
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
        .ok_or_else(|| anyhow!("'{}' has no date column (headers: {:?})", name, headers))?;

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for record in reader.records() {
        let record = record?;

        let date = record
            .get(date_idx)
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());
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
                        values.insert(header.clone(), value);
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
        warn!(source = name, dropped, "dropped rows with unparsable dates");
    }

    Ok(LoadedTable { rows, dropped })
}
