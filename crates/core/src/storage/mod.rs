pub mod analyses;
pub mod companies;
pub mod investments;
pub mod lock;

use anyhow::Context;

pub async fn migrate(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("sqlx migrations failed")?;
    Ok(())
}

/// Clamps a caller-supplied row limit into `1..=max`, using `default` when absent.
pub fn clamp_limit(requested: Option<i64>, default: i64, max: i64) -> i64 {
    requested.unwrap_or(default).clamp(1, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limit_defaults_and_bounds() {
        assert_eq!(clamp_limit(None, 5, 50), 5);
        assert_eq!(clamp_limit(Some(0), 5, 50), 1);
        assert_eq!(clamp_limit(Some(-3), 5, 50), 1);
        assert_eq!(clamp_limit(Some(500), 5, 50), 50);
        assert_eq!(clamp_limit(Some(12), 5, 50), 12);
    }
}
