//! The fixed SQL templates behind each endpoint.
//!
//! Every function checks out one pooled connection, runs bound statements on
//! it, and hands it back when the guard drops, on success or error alike.
//! Numeric metrics are cast to `float8`, ids to `bigint` and timestamps to a
//! naive UTC `timestamp` so decoding does not depend on the loader's column
//! types.

use sqlx::PgPool;
use tracing::debug;

use crate::config::CLOSING_SOON_MAX_ROWS;
use crate::db::models::{EventMarketRow, EventRow, KpiSummary, MarketRow, TagRow};
use crate::error::{AppError, Result};

const TOP_LIQUIDITY_SQL: &str = r#"
    SELECT market_id::bigint AS market_id, question, category,
           liquidity::float8 AS liquidity, volume::float8 AS volume,
           active, closed, event_id::bigint AS event_id, end_ts::timestamp AS end_ts
    FROM polymarket.dim_market
    ORDER BY liquidity DESC NULLS LAST
    LIMIT $1
"#;

const TOP_VOLUME_SQL: &str = r#"
    SELECT market_id::bigint AS market_id, question, category,
           liquidity::float8 AS liquidity, volume::float8 AS volume,
           active, closed, event_id::bigint AS event_id, end_ts::timestamp AS end_ts
    FROM polymarket.dim_market
    ORDER BY volume DESC NULLS LAST
    LIMIT $1
"#;

const SEARCH_MARKETS_SQL: &str = r#"
    SELECT market_id::bigint AS market_id, question, category,
           liquidity::float8 AS liquidity, volume::float8 AS volume,
           active, closed, event_id::bigint AS event_id, end_ts::timestamp AS end_ts
    FROM polymarket.dim_market
    WHERE question ILIKE $1
    ORDER BY liquidity DESC NULLS LAST
    LIMIT $2
"#;

const CLOSING_SOON_SQL: &str = r#"
    SELECT event_id::bigint AS event_id, title, category, end_ts::timestamp AS end_ts
    FROM polymarket.dim_event
    WHERE end_ts IS NOT NULL
      AND end_ts >= (NOW() AT TIME ZONE 'UTC')
      AND end_ts <= (NOW() AT TIME ZONE 'UTC') + make_interval(hours => $1)
    ORDER BY end_ts ASC
    LIMIT $2
"#;

const EVENT_BY_ID_SQL: &str = r#"
    SELECT event_id::bigint AS event_id, title, category, end_ts::timestamp AS end_ts
    FROM polymarket.dim_event
    WHERE event_id = $1
"#;

const EVENT_MARKETS_SQL: &str = r#"
    SELECT market_id::bigint AS market_id, question,
           liquidity::float8 AS liquidity, volume::float8 AS volume,
           active, closed, end_ts::timestamp AS end_ts
    FROM polymarket.dim_market
    WHERE event_id = $1
    ORDER BY liquidity DESC NULLS LAST
    LIMIT $2
"#;

const SEARCH_TAGS_SQL: &str = r#"
    SELECT tag_id::bigint AS tag_id, name, slug, parent_tag_id::bigint AS parent_tag_id
    FROM polymarket.dim_tag
    WHERE name ILIKE $1
    ORDER BY name ASC
    LIMIT $2
"#;

const KPI_SUMMARY_SQL: &str = r#"
    SELECT
      (SELECT COUNT(*) FROM polymarket.dim_market) AS markets,
      (SELECT COUNT(*) FROM polymarket.dim_event)  AS events,
      (SELECT COUNT(*) FROM polymarket.dim_tag)    AS tags,
      (SELECT COUNT(*) FROM polymarket.dim_time)   AS days,
      (SELECT COUNT(*) FROM polymarket.dim_market WHERE closed = true)  AS closed_markets,
      (SELECT COUNT(*) FROM polymarket.dim_market WHERE closed = false) AS open_markets,
      (SELECT MAX(liquidity)::float8 FROM polymarket.dim_market) AS max_liquidity
"#;

/// Liveness probe: succeeds iff a connection can be checked out and used.
pub async fn ping(pool: &PgPool) -> Result<()> {
    let mut conn = pool.acquire().await?;
    sqlx::query("SELECT 1").execute(&mut *conn).await?;
    Ok(())
}

pub async fn top_liquidity(pool: &PgPool, limit: i64) -> Result<Vec<MarketRow>> {
    let mut conn = pool.acquire().await?;
    let rows = sqlx::query_as::<_, MarketRow>(TOP_LIQUIDITY_SQL)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

pub async fn top_volume(pool: &PgPool, limit: i64) -> Result<Vec<MarketRow>> {
    let mut conn = pool.acquire().await?;
    let rows = sqlx::query_as::<_, MarketRow>(TOP_VOLUME_SQL)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

/// Markets whose question contains `query`, ignoring case.
pub async fn search_markets(pool: &PgPool, query: &str, limit: i64) -> Result<Vec<MarketRow>> {
    let mut conn = pool.acquire().await?;
    let rows = sqlx::query_as::<_, MarketRow>(SEARCH_MARKETS_SQL)
        .bind(contains_pattern(query))
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;
    debug!(query, rows = rows.len(), "search_markets");
    Ok(rows)
}

/// Events ending within the next `hours` hours (UTC), soonest first.
pub async fn closing_soon(pool: &PgPool, hours: i32) -> Result<Vec<EventRow>> {
    let mut conn = pool.acquire().await?;
    let rows = sqlx::query_as::<_, EventRow>(CLOSING_SOON_SQL)
        .bind(hours)
        .bind(CLOSING_SOON_MAX_ROWS)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

/// Looks up the event, then lists its markets on the same connection.
/// An unknown `event_id` is `NotFound`, never an empty list.
pub async fn markets_by_event(
    pool: &PgPool,
    event_id: i64,
    limit: i64,
) -> Result<(EventRow, Vec<EventMarketRow>)> {
    let mut conn = pool.acquire().await?;

    let event = sqlx::query_as::<_, EventRow>(EVENT_BY_ID_SQL)
        .bind(event_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("event_id {event_id} not found")))?;

    let markets = sqlx::query_as::<_, EventMarketRow>(EVENT_MARKETS_SQL)
        .bind(event_id)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;

    Ok((event, markets))
}

/// Tags whose name contains `name`, ignoring case, alphabetical.
pub async fn search_tags(pool: &PgPool, name: &str, limit: i64) -> Result<Vec<TagRow>> {
    let mut conn = pool.acquire().await?;
    let rows = sqlx::query_as::<_, TagRow>(SEARCH_TAGS_SQL)
        .bind(contains_pattern(name))
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;
    debug!(name, rows = rows.len(), "search_tags");
    Ok(rows)
}

pub async fn kpi_summary(pool: &PgPool) -> Result<KpiSummary> {
    let mut conn = pool.acquire().await?;
    let row = sqlx::query_as::<_, KpiSummary>(KPI_SUMMARY_SQL)
        .fetch_one(&mut *conn)
        .await?;
    Ok(row)
}

/// `%term%` for ILIKE with the term's own `\`, `%` and `_` escaped, so user
/// input is matched as a literal substring.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
