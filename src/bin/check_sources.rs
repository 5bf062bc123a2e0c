use memechart::charts::registry::Registry;
use memechart::fetcher::{SourceConfig, SourceData};
use std::collections::BTreeSet;

fn config_from_env() -> SourceConfig {
    let defaults = SourceConfig::default();
    SourceConfig {
        base_url: std::env::var("MEMECHART_DATA_URL").unwrap_or(defaults.base_url),
        coin: std::env::var("MEMECHART_COIN").unwrap_or(defaults.coin),
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let _ = memechart::telemetry::init_default_tracing();

    let cfg = config_from_env();
    println!("🔍 Checking sources at {}", cfg.base_url);

    // Every chart's sources, deduplicated; "prices" feeds three charts.
    let mut seen = BTreeSet::new();
    println!(
        "\n{:<15} | {:<8} | {:<8} | {}",
        "Source", "Records", "Dropped", "Range"
    );
    println!("{}", "-".repeat(60));

    for chart in Registry::all_charts() {
        let fetchers = match Registry::sources_for(&chart.slug, &cfg) {
            Ok(fetchers) => fetchers,
            Err(e) => {
                println!("{:<15} | failed to resolve: {}", chart.slug, e);
                continue;
            }
        };

        for fetcher in fetchers {
            if !seen.insert(fetcher.name().to_string()) {
                continue;
            }

            match fetcher.fetch().await {
                Ok(SourceData::Series(series)) => {
                    let range = match (series.points.first(), series.points.last()) {
                        (Some(first), Some(last)) => format!(
                            "{} .. {}",
                            first.timestamp.format("%Y-%m-%d"),
                            last.timestamp.format("%Y-%m-%d")
                        ),
                        _ => "EMPTY".to_string(),
                    };
                    println!(
                        "{:<15} | {:<8} | {:<8} | {}",
                        fetcher.name(),
                        series.points.len(),
                        series.dropped,
                        range
                    );
                }
                Ok(SourceData::Table(table)) => {
                    let range = match (table.rows.first(), table.rows.last()) {
                        (Some(first), Some(last)) => format!(
                            "{} .. {}",
                            first.timestamp.format("%Y-%m-%d"),
                            last.timestamp.format("%Y-%m-%d")
                        ),
                        _ => "EMPTY".to_string(),
                    };
                    println!(
                        "{:<15} | {:<8} | {:<8} | {}",
                        fetcher.name(),
                        table.rows.len(),
                        table.dropped,
                        range
                    );
                }
                Err(e) => {
                    println!("{:<15} | ❌ {}", fetcher.name(), e);
                }
            }
        }
    }

    println!("\nDone.");
}
