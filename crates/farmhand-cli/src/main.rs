//! A utility that resolves crop display icons against the configured
//! catalog, exactly the way the web app would.
//!
//! Useful for checking what a crop marker will render as, and for spotting
//! crops that silently fall back to the generic icon.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use farmhand_service::caches::IconCache;
use farmhand_service::catalog::CatalogClient;
use farmhand_service::config::Config;
use farmhand_service::{logging, metrics};

mod output;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Outputs one row per slug as a table.
    Table,
    /// Outputs the resolved icons as JSON.
    Json,
}

/// Resolves display icons for crop slugs.
///
/// Icons come from the crop catalog configured via `--config` (or the
/// default public catalog) and are subject to the same fallback rules as
/// the web app: any crop the catalog cannot produce an icon for resolves
/// to the generic plant icon.
#[derive(Parser, Debug)]
#[command(version, about, long_about)]
struct Cli {
    /// The crop slugs to resolve (e.g. `lettuce`).
    #[arg(required = true)]
    slugs: Vec<String>,

    /// Path to the configuration file.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// The output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

fn main() {
    if let Err(error) = execute() {
        logging::ensure_log_error(&error);
        std::process::exit(1);
    }
}

fn execute() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::get(cli.config.as_deref()).context("failed to load configuration")?;

    let _sentry_guard = config.sentry_dsn.clone().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    // SAFETY: The runtime is constructed below, so no other threads are
    // running yet.
    unsafe { logging::init_logging(&config) };

    if let Some(statsd) = config.metrics.statsd.as_deref() {
        metrics::configure_statsd(
            &config.metrics.prefix,
            statsd,
            config.metrics.custom_tags.clone(),
        );
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create runtime")?;

    runtime.block_on(resolve_icons(cli, &config))
}

async fn resolve_icons(cli: Cli, config: &Config) -> Result<()> {
    let catalog = Arc::new(CatalogClient::new(config));
    let icons = IconCache::new(catalog);

    let resolved = icons
        .prefetch(&cli.slugs, |progress| {
            tracing::debug!("resolved {}/{} icons", progress.completed(), progress.total());
        })
        .await;

    match cli.format {
        OutputFormat::Table => output::print_table(&cli.slugs, &resolved),
        OutputFormat::Json => output::print_json(&cli.slugs, &resolved)?,
    }

    Ok(())
}
