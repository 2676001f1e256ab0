use anyhow::Context;

// Advisory locks are scoped to the Postgres session, so acquire and release must
// run on the same connection rather than on the pool.
const QUOTE_REFRESH_LOCK_KEY: i64 = 0x4752_4545_4E51; // "GREENQ"

pub async fn try_acquire_refresh_lock(conn: &mut sqlx::PgConnection) -> anyhow::Result<bool> {
    let acquired: (bool,) = sqlx::query_as("SELECT pg_try_advisory_lock($1)")
        .persistent(false)
        .bind(QUOTE_REFRESH_LOCK_KEY)
        .fetch_one(&mut *conn)
        .await
        .context("failed to acquire quote refresh advisory lock")?;
    Ok(acquired.0)
}

pub async fn release_refresh_lock(conn: &mut sqlx::PgConnection) -> anyhow::Result<()> {
    sqlx::query("SELECT pg_advisory_unlock($1)")
        .persistent(false)
        .bind(QUOTE_REFRESH_LOCK_KEY)
        .execute(&mut *conn)
        .await
        .context("failed to release quote refresh advisory lock")?;
    Ok(())
}
