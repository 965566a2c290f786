//! Postgres connection pool.
//!
//! Connections are checked out per request and returned on drop. Each checkout
//! pings the connection first so a dead one is replaced instead of failing
//! the request.

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::Config;
use crate::error::Result;

/// Build the pool without connecting. A malformed `DATABASE_URL` fails here;
/// an unreachable server only shows up on the first query (and in `/health`).
pub fn create_pool(cfg: &Config) -> Result<PgPool> {
    let options = PgConnectOptions::from_str(&cfg.database_url)?;
    let pool = PgPoolOptions::new()
        .max_connections(cfg.db_max_connections)
        .acquire_timeout(cfg.db_acquire_timeout)
        .test_before_acquire(true)
        .connect_lazy_with(options);
    Ok(pool)
}
