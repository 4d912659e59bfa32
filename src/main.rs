//! menucache CLI - load the catalog and print it.
//!
//! A thin frontend over the library core, standing in for a real UI:
//!
//! ```text
//! menucache                    # full catalog (store first, remote on miss)
//! menucache cake               # search by name
//! menucache --category Mains   # restrict to a category
//! menucache --refresh          # force a remote fetch
//! ```

use std::io;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use menucache::{
    CatalogClient, Config, FilterCriteria, MenuStore, SearchEngine, SyncCoordinator,
};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

struct CliArgs {
    refresh: bool,
    category: Option<String>,
    search: String,
}

fn parse_args() -> CliArgs {
    let mut args = std::env::args().skip(1);
    let mut parsed = CliArgs {
        refresh: false,
        category: None,
        search: String::new(),
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--refresh" => parsed.refresh = true,
            "--category" => parsed.category = args.next(),
            _ => parsed.search = arg,
        }
    }
    parsed
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    let args = parse_args();

    let config = Config::load()?;
    let store = Arc::new(MenuStore::new(config.database_path()?));
    let client = CatalogClient::new(&config)?;
    let coordinator = SyncCoordinator::new(Arc::clone(&store), client);
    let engine = SearchEngine::new(Arc::clone(&store));

    info!("loading catalog");
    let catalog = if args.refresh {
        coordinator.refresh().await?
    } else {
        coordinator.load_catalog().await?
    };

    let items = if args.category.is_some() || !args.search.is_empty() {
        let criteria = FilterCriteria::new(
            args.category.into_iter().collect(),
            args.search,
        );
        engine.query(&criteria, &catalog)
    } else {
        catalog
    };

    for item in &items {
        println!(
            "{:<30} {:<12} {:>8}",
            item.name,
            item.category,
            item.price_display()
        );
    }
    println!("{} item(s)", items.len());

    if let Some(status) = coordinator.status() {
        let hint = if status.is_stale() {
            "  (run with --refresh to update)"
        } else {
            ""
        };
        println!("last synced: {}{}", status.age_display(), hint);
    }

    Ok(())
}
