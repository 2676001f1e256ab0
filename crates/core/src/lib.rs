pub mod domain;
pub mod quote;
pub mod storage;

pub mod config {
    use anyhow::Context;

    const DEFAULT_PORT: u16 = 3000;
    const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub database_url: Option<String>,
        pub db_max_connections: u32,
        pub sentry_dsn: Option<String>,
        pub finnhub_api_key: Option<String>,
        pub finnhub_base_url: Option<String>,
        pub port: u16,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                database_url: std::env::var("DATABASE_URL").ok(),
                db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                finnhub_api_key: std::env::var("FINNHUB_API_KEY").ok(),
                finnhub_base_url: std::env::var("FINNHUB_BASE_URL").ok(),
                port: std::env::var("PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_PORT),
            })
        }

        pub fn require_database_url(&self) -> anyhow::Result<&str> {
            self.database_url
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .context("DATABASE_URL is required")
        }
    }
}
