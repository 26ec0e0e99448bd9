use anyhow::{Context, Result};
use moneymoves::{
    fetch::ResourceFetcher,
    selection::CountrySelection,
    Chapter2, Config, DatasetStore, Economic, LoadOutcome, LoadReport,
};
use serde_json::json;
use std::env;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// Usage: `moneymoves [COUNTRY] [YEAR]`
#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) config + selection from args ─────────────────────────────
    let cfg = Config::from_env()?;
    let mut selection = CountrySelection::default();
    let mut args = env::args().skip(1);
    if let Some(country) = args.next() {
        selection.set_selected_country(country);
    }
    if let Some(year) = args.next() {
        let year = year
            .parse()
            .with_context(|| format!("YEAR must be an integer, got {:?}", year))?;
        selection.set_active_year(year);
    }

    // ─── 3) load both datasets ───────────────────────────────────────
    let fetcher = ResourceFetcher::from_config(&cfg)?;
    info!(base = %cfg.base_url, "loading datasets");
    let chapter2: DatasetStore<Chapter2, _> = DatasetStore::from_config(fetcher.clone(), &cfg);
    let economic: DatasetStore<Economic, _> = DatasetStore::from_config(fetcher, &cfg);

    let (c2, eco) = tokio::join!(chapter2.load(), economic.load());
    for (name, res) in [("chapter2", &c2), ("economic", &eco)] {
        if let Err(e) = res {
            error!(dataset = name, "{}", e);
        }
    }

    // ─── 4) summary ──────────────────────────────────────────────────
    let report_json = |res: &Result<LoadOutcome, _>, error: Option<String>| match res {
        Ok(LoadOutcome::Loaded(LoadReport {
            records, dropped, ..
        })) => json!({ "records": records, "dropped": dropped }),
        _ => json!({ "error": error }),
    };

    let summary = json!({
        "chapter2": {
            "load": report_json(&c2, chapter2.error()),
            "countries": chapter2.categories().to_vec(),
            "selected": chapter2
                .records_for_category(&selection.selected_country)
                .collect::<Vec<_>>(),
        },
        "economic": {
            "load": report_json(&eco, economic.error()),
            "countries": economic.categories().to_vec(),
            "selected": economic
                .record_for_category_and_year(&selection.selected_country, selection.active_year),
        },
        "selection": selection,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    info!("all done");
    Ok(())
}
