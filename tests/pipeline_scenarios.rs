use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use memechart::charts::registry::Registry;
use memechart::core::orchestrator::load_sources;
use memechart::core::window::Period;
use memechart::fetcher::daily_csv::parse_daily_csv;
use memechart::fetcher::{DataSource, SourceBundle, SourceData};
use memechart::models::{DataPoint, LoadedSeries, ViewState};
use memechart::ChartSession;

struct CannedSource {
    name: &'static str,
    data: SourceData,
}

#[async_trait]
impl DataSource for CannedSource {
    fn name(&self) -> &str {
        self.name
    }

    async fn fetch(&self) -> Result<SourceData> {
        Ok(self.data.clone())
    }
}

fn dominance_series(days: &[u32]) -> LoadedSeries {
    LoadedSeries {
        points: days
            .iter()
            .map(|&d| DataPoint {
                timestamp: Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap(),
                value: 50.0 + d as f64 / 10.0,
            })
            .collect(),
        dropped: 0,
    }
}

#[tokio::test]
async fn scenario_price_domain_gets_five_percent_padding() {
    // Raw price series 0.08 / 0.09 / 0.10 over the whole window must come out
    // with a (0.076, 0.105) price axis.
    let prices_csv = "date,doge\n2024-01-01,0.08\n2024-01-02,0.09\n2024-01-03,0.10\n";
    let prices = parse_daily_csv("prices", prices_csv).unwrap();
    assert_eq!(prices.rows.len(), 3);

    let sources: Vec<Box<dyn DataSource>> = vec![
        Box::new(CannedSource {
            name: "btc_dominance",
            data: SourceData::Series(dominance_series(&[1, 2, 3])),
        }),
        Box::new(CannedSource {
            name: "prices",
            data: SourceData::Table(prices),
        }),
    ];

    let bundle = load_sources(sources).await.unwrap();
    let session = ChartSession::new(Registry::get_builder("dominance_price").unwrap(), bundle);

    let now = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
    let model = session.rebuild(&ViewState::default(), now).unwrap();

    let (lo, hi) = model.domains["price"];
    assert!((lo - 0.076).abs() < 1e-12);
    assert!((hi - 0.105).abs() < 1e-12);
}

#[tokio::test]
async fn scenario_disjoint_series_produce_absent_correlation() {
    let prices_csv = "date,doge\n2024-01-01,0.08\n2024-01-02,0.09\n2024-01-03,0.10\n";
    let analytics_csv = "Date,Engagements\n\
        \"Friday, January 5, 2024\",50\n\
        \"Saturday, January 6, 2024\",45\n\
        \"Sunday, January 7, 2024\",60\n";

    let sources: Vec<Box<dyn DataSource>> = vec![
        Box::new(CannedSource {
            name: "prices",
            data: SourceData::Table(parse_daily_csv("prices", prices_csv).unwrap()),
        }),
        Box::new(CannedSource {
            name: "x_analytics",
            data: SourceData::Table(
                memechart::fetcher::analytics::parse_analytics_csv(analytics_csv).unwrap(),
            ),
        }),
    ];

    let bundle = load_sources(sources).await.unwrap();
    let session = ChartSession::new(Registry::get_builder("engagement_price").unwrap(), bundle);

    let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
    let model = session.rebuild(&ViewState::default(), now).unwrap();

    // No calendar dates overlap, so the gauge shows N/A, not a number.
    assert_eq!(model.stats["correlation"], None);
    assert_eq!(model.stats["correlation_samples"], Some(0.0));
    assert_eq!(model.series["price"].len(), 3);
    assert_eq!(model.series["engagements"].len(), 3);
}

#[tokio::test]
async fn scenario_sparse_window_falls_back_to_full_series() {
    // 12 monthly rows narrowed to one month leaves a single point, so the
    // filter hands back all 12.
    let mut csv = String::from("date,pct_change,seven_d_pct_change\n");
    for month in 1..=12 {
        csv.push_str(&format!("2024-{:02}-01,{}.0,0.5\n", month, month));
    }
    let mut meme_csv = String::from("date,avg_pct_change\n");
    for month in 1..=12 {
        meme_csv.push_str(&format!("2024-{:02}-01,-{}.0\n", month, month));
    }

    let sources: Vec<Box<dyn DataSource>> = vec![
        Box::new(CannedSource {
            name: "btc_change",
            data: SourceData::Table(parse_daily_csv("btc_change", &csv).unwrap()),
        }),
        Box::new(CannedSource {
            name: "prices",
            data: SourceData::Table(parse_daily_csv("prices", &meme_csv).unwrap()),
        }),
    ];

    let bundle = load_sources(sources).await.unwrap();
    let session = ChartSession::new(Registry::get_builder("change_compare").unwrap(), bundle);

    let state = ViewState {
        period: Period::OneMonth,
        ..ViewState::default()
    };
    let now = Utc.with_ymd_and_hms(2024, 12, 15, 0, 0, 0).unwrap();
    let model = session.rebuild(&state, now).unwrap();

    assert_eq!(model.series["bitcoin"].len(), 12);
    assert_eq!(model.series["memecoins"].len(), 12);
}

#[tokio::test]
async fn scenario_rebuilds_are_idempotent() {
    let prices_csv = "date,doge\n2024-01-01,0.08\n2024-01-02,0.09\n2024-01-03,0.10\n";

    let sources: Vec<Box<dyn DataSource>> = vec![
        Box::new(CannedSource {
            name: "btc_dominance",
            data: SourceData::Series(dominance_series(&[1, 2, 3])),
        }),
        Box::new(CannedSource {
            name: "prices",
            data: SourceData::Table(parse_daily_csv("prices", prices_csv).unwrap()),
        }),
    ];

    let bundle = load_sources(sources).await.unwrap();
    let session = ChartSession::new(Registry::get_builder("dominance_price").unwrap(), bundle);

    let state = ViewState::default();
    let now = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();

    let first = session.rebuild(&state, now).unwrap();
    let second = session.rebuild(&state, now).unwrap();

    assert_eq!(first.as_ref(), second.as_ref());
    assert_eq!(
        serde_json::to_string(first.as_ref()).unwrap(),
        serde_json::to_string(second.as_ref()).unwrap()
    );
}

#[tokio::test]
async fn scenario_period_change_reuses_fetched_sources() {
    // Rebuilding with a different period must not require new fetchers; the
    // session holds the bundle and only re-runs the transform.
    let mut csv = String::from("date,doge\n");
    for day in 1..=30 {
        csv.push_str(&format!("2024-06-{:02},0.1{}\n", day, day % 10));
    }

    let sources: Vec<Box<dyn DataSource>> = vec![
        Box::new(CannedSource {
            name: "btc_dominance",
            data: SourceData::Series(dominance_series(&[1, 2, 3])),
        }),
        Box::new(CannedSource {
            name: "prices",
            data: SourceData::Table(parse_daily_csv("prices", &csv).unwrap()),
        }),
    ];

    let bundle = load_sources(sources).await.unwrap();
    let session = ChartSession::new(Registry::get_builder("dominance_price").unwrap(), bundle);

    let now = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
    let monthly = session
        .rebuild(
            &ViewState {
                period: Period::OneMonth,
                ..ViewState::default()
            },
            now,
        )
        .unwrap();
    let yearly = session
        .rebuild(
            &ViewState {
                period: Period::OneYear,
                ..ViewState::default()
            },
            now,
        )
        .unwrap();

    assert!(monthly.series["price"].len() <= yearly.series["price"].len());
    assert_eq!(session.current().unwrap().as_ref(), yearly.as_ref());
}

#[tokio::test]
async fn scenario_missing_bundle_source_is_a_build_error() {
    let session = ChartSession::new(
        Registry::get_builder("dominance_price").unwrap(),
        SourceBundle::default(),
    );

    let now = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
    let err = session.rebuild(&ViewState::default(), now).unwrap_err();
    assert!(matches!(
        err,
        memechart::PipelineError::MissingSource(_)
    ));
}
