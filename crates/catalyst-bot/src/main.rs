mod cli;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use catalyst_bot::config::load_settings;
use catalyst_bot::daemon::Daemon;
use catalyst_bot::{build_cache, build_classifier, build_dedup, build_dispatcher, build_fetcher_registry, build_journals};
use clap::Parser;
use cli::{Cli, Command};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let code = run().await;
    std::process::exit(code);
}

async fn run() -> i32 {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            error!(error = %err, "fatal error");
            2
        }
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    match cli.command {
        Command::Run => run_daemon(settings).await,
        Command::Analyze { since_days } => run_analyze(settings, since_days).await,
        Command::Bootstrap { start, end } => run_bootstrap_cmd(settings, start, end).await,
    }
}

async fn run_daemon(settings: catalyst_models::Settings) -> Result<()> {
    let cache = build_cache(&settings.cache)?;
    let dedup = build_dedup(&settings.dedup);
    let registry = build_fetcher_registry(&settings.feeds);
    let classifier = build_classifier(cache.clone(), &settings.classifier)?;
    let dispatcher = build_dispatcher(&settings);
    let (accepted_journal, rejected_journal) = build_journals("./data")?;

    let cancel = CancellationToken::new();
    let shutdown_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received shutdown signal");
            shutdown_cancel.cancel();
        }
    });

    let daemon = Arc::new(Daemon::new(
        settings,
        cache,
        dedup,
        registry,
        classifier,
        dispatcher,
        accepted_journal,
        rejected_journal,
        cancel,
    ));
    daemon.run().await;
    Ok(())
}

async fn run_analyze(settings: catalyst_models::Settings, since_days: Option<u32>) -> Result<()> {
    let cache = build_cache(&settings.cache)?;
    let (_, rejected_journal) = build_journals("./data")?;

    let mut config = settings.analyzer.clone();
    if let Some(days) = since_days {
        config.lookback_days = days;
    }

    let analyzer = catalyst_analyzer::Analyzer::new(
        cache.as_ref(),
        rejected_journal.as_ref(),
        &config,
        "./data/recommendations.json",
    );
    let report = analyzer.run(chrono::Utc::now(), &HashMap::new()).await?;
    info!(
        recommendations = report.recommendations.len(),
        items_considered = report.items_considered,
        "analyzer run complete"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn run_bootstrap_cmd(
    settings: catalyst_models::Settings,
    start: chrono::DateTime<chrono::Utc>,
    end: Option<chrono::DateTime<chrono::Utc>>,
) -> Result<()> {
    let cache = build_cache(&settings.cache)?;
    let mut registry = build_fetcher_registry(&settings.feeds);
    let (_, rejected_journal) = build_journals("./data")?;

    let _ = end;
    let seeded = catalyst_bot::bootstrap::run_bootstrap(&mut registry, cache, &rejected_journal, start).await?;
    info!(seeded, "bootstrap complete");
    Ok(())
}
