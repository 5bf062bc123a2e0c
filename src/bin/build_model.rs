use memechart::charts::registry::Registry;
use memechart::core::window::Period;
use memechart::models::{ChangeKind, ViewState};
use memechart::{ChartSession, SourceConfig};

fn usage() -> ! {
    eprintln!("Usage: build_model <chart-slug> [period] [daily|7d]\n");
    eprintln!("Charts:");
    for chart in Registry::all_charts() {
        eprintln!("  {:<20} {}", chart.slug, chart.name);
    }
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _ = memechart::telemetry::init_default_tracing();

    let mut args = std::env::args().skip(1);
    let slug = args.next().unwrap_or_else(|| "dominance_price".to_string());
    if Registry::get_metadata(&slug).is_none() {
        eprintln!("Unknown chart '{}'", slug);
        usage();
    }

    let mut state = ViewState::default();
    for arg in args {
        if let Some(period) = Period::parse(&arg) {
            state.period = period;
        } else if arg == "7d" {
            state.change_kind = ChangeKind::SevenDay;
        } else if arg == "daily" {
            state.change_kind = ChangeKind::Daily;
        } else {
            eprintln!("Unrecognized argument '{}'", arg);
            usage();
        }
    }

    let defaults = SourceConfig::default();
    let cfg = SourceConfig {
        base_url: std::env::var("MEMECHART_DATA_URL").unwrap_or(defaults.base_url),
        coin: std::env::var("MEMECHART_COIN").unwrap_or(defaults.coin),
    };

    println!(
        "Building '{}' (period {}) from {}",
        slug,
        state.period.label(),
        cfg.base_url
    );

    let session = ChartSession::open(&slug, &cfg).await?;
    let model = session.rebuild(&state, chrono::Utc::now())?;

    println!("{}", serde_json::to_string_pretty(model.as_ref())?);
    Ok(())
}
