use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method},
    routing::get,
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greeninvesta_core::config::Settings;
use greeninvesta_core::quote::{finnhub::FinnhubClient, QuoteProvider};

mod analyses;
mod companies;
mod error;
mod quotes;
mod recommendations;

use error::AppError;

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

    let pool = connect_pool(&settings).await;
    let quotes: Arc<dyn QuoteProvider> = Arc::new(FinnhubClient::from_settings(&settings)?);

    let state = AppState { pool, quotes };
    let app = router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Connects and migrates. Any failure leaves the API running without storage.
async fn connect_pool(settings: &Settings) -> Option<PgPool> {
    let db_url = match settings.require_database_url() {
        Ok(url) => url,
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "DATABASE_URL missing; starting API in degraded mode");
            return None;
        }
    };

    let pool = match sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .connect(db_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            let err = anyhow::Error::new(e);
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "db connect failed; starting API in degraded mode");
            return None;
        }
    };

    match greeninvesta_core::storage::migrate(&pool).await {
        Ok(()) => Some(pool),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "db migrations failed; starting API in degraded mode");
            None
        }
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .merge(analyses::routes())
        .merge(companies::routes())
        .merge(quotes::routes())
        .merge(recommendations::routes())
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
pub struct AppState {
    pool: Option<PgPool>,
    quotes: Arc<dyn QuoteProvider>,
}

impl AppState {
    pub fn pool(&self) -> Result<&PgPool, AppError> {
        self.pool.as_ref().ok_or_else(AppError::db_unavailable)
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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
