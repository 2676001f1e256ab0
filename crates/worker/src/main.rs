use anyhow::Context;
use clap::Parser;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greeninvesta_core::config::Settings;
use greeninvesta_core::quote::{finnhub::FinnhubClient, QuoteProvider};

mod refresh;

#[derive(Debug, Parser)]
#[command(name = "greeninvesta_worker")]
struct Args {
    /// Ticker to refresh. Repeatable. Defaults to every stored company.
    #[arg(long = "ticker")]
    tickers: Vec<String>,

    /// Refresh at most this many stored companies, least recently updated first.
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    limit: Option<i64>,

    /// Pause between tickers, to stay under the upstream rate limit.
    #[arg(long, default_value_t = 2000)]
    delay_ms: u64,

    /// Attempts per ticker before it is counted as a failure.
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Fetch quotes without writing to the database.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let delay = Duration::from_millis(args.delay_ms);
    let provider = FinnhubClient::from_settings(&settings)?.with_retries(args.retries);
    let explicit = refresh::normalize_tickers(&args.tickers);

    let pool = if needs_database(&args, &explicit) {
        Some(connect_pool(&settings).await?)
    } else {
        None
    };
    if let Some(pool) = pool.as_ref().filter(|_| needs_migration(&args)) {
        greeninvesta_core::storage::migrate(pool).await?;
    }

    let tickers = match &pool {
        Some(pool) if explicit.is_empty() => {
            greeninvesta_core::storage::companies::tickers_for_refresh(pool, args.limit).await?
        }
        _ => explicit,
    };

    if tickers.is_empty() {
        tracing::info!("no companies to refresh");
        return Ok(());
    }

    if args.dry_run {
        let summary = refresh::refresh_quotes(&provider, None, &tickers, delay).await;
        tracing::info!(?summary, dry_run = true, "quote refresh finished");
        return Ok(());
    }

    let pool = pool.context("database connection missing for refresh")?;
    let mut lock_conn = pool.acquire().await.context("acquire lock connection failed")?;
    let acquired = greeninvesta_core::storage::lock::try_acquire_refresh_lock(&mut *lock_conn).await?;
    if !acquired {
        tracing::warn!("refresh lock not acquired; another run in progress");
        return Ok(());
    }

    tracing::info!(
        provider = provider.provider_name(),
        tickers = tickers.len(),
        "quote refresh started"
    );
    let summary = refresh::refresh_quotes(&provider, Some(&pool), &tickers, delay).await;

    if let Err(err) = greeninvesta_core::storage::lock::release_refresh_lock(&mut *lock_conn).await {
        sentry_anyhow::capture_anyhow(&err);
        tracing::warn!(error = %err, "failed to release refresh lock");
    }

    if summary.failures > 0 {
        tracing::warn!(?summary, "quote refresh finished with failures");
    } else {
        tracing::info!(?summary, "quote refresh finished");
    }
    Ok(())
}

/// A dry run with explicit tickers never touches the database. Every other
/// run needs it, either to list stored tickers or to write quotes.
fn needs_database(args: &Args, explicit: &[String]) -> bool {
    !args.dry_run || explicit.is_empty()
}

/// Migrations write schema, so a dry run skips them and only reads.
fn needs_migration(args: &Args) -> bool {
    !args.dry_run
}

async fn connect_pool(settings: &Settings) -> anyhow::Result<sqlx::PgPool> {
    let db_url = settings.require_database_url()?;
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .connect(db_url)
        .await
        .context("connect DATABASE_URL failed")
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
