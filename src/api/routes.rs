use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::api::extract::{ValidPath, ValidQuery};
use crate::api::health::health;
use crate::api::params::{
    validate_range, validate_search_term, ClosingSoonParams, LimitParams, SearchMarketsParams,
    SearchTagsParams,
};
use crate::config::limits;
use crate::db::models::{EventMarketRow, EventRow, KpiSummary, MarketRow, TagRow};
use crate::db::queries;
use crate::error::AppError;

#[derive(Clone)]
pub struct ApiState {
    pub pool: PgPool,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/markets/top-liquidity", get(get_top_liquidity))
        .route("/markets/top-volume", get(get_top_volume))
        .route("/markets/search", get(search_markets))
        .route("/events/closing-soon", get(get_closing_soon))
        .route("/events/:event_id/markets", get(get_event_markets))
        .route("/tags/search", get(search_tags))
        .route("/kpi/summary", get(get_kpi_summary))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventMarketsResponse {
    pub event: EventRow,
    pub markets_count: usize,
    pub data: Vec<EventMarketRow>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_top_liquidity(
    State(state): State<ApiState>,
    ValidQuery(params): ValidQuery<LimitParams>,
) -> Result<Json<ListResponse<MarketRow>>, AppError> {
    let limit = validate_range("limit", params.limit, limits::TOP_MARKETS)?;
    let rows = queries::top_liquidity(&state.pool, limit).await?;
    Ok(Json(rows.into()))
}

async fn get_top_volume(
    State(state): State<ApiState>,
    ValidQuery(params): ValidQuery<LimitParams>,
) -> Result<Json<ListResponse<MarketRow>>, AppError> {
    let limit = validate_range("limit", params.limit, limits::TOP_MARKETS)?;
    let rows = queries::top_volume(&state.pool, limit).await?;
    Ok(Json(rows.into()))
}

async fn search_markets(
    State(state): State<ApiState>,
    ValidQuery(params): ValidQuery<SearchMarketsParams>,
) -> Result<Json<ListResponse<MarketRow>>, AppError> {
    let query = validate_search_term("query", &params.query)?;
    let limit = validate_range("limit", params.limit, limits::SEARCH_MARKETS)?;
    let rows = queries::search_markets(&state.pool, query, limit).await?;
    Ok(Json(rows.into()))
}

async fn get_closing_soon(
    State(state): State<ApiState>,
    ValidQuery(params): ValidQuery<ClosingSoonParams>,
) -> Result<Json<ListResponse<EventRow>>, AppError> {
    let hours = validate_range("hours", params.hours, limits::CLOSING_SOON_HOURS)?;
    // Range-checked to 1..=168 above.
    let rows = queries::closing_soon(&state.pool, hours as i32).await?;
    Ok(Json(rows.into()))
}

async fn get_event_markets(
    State(state): State<ApiState>,
    ValidPath(event_id): ValidPath<i64>,
    ValidQuery(params): ValidQuery<LimitParams>,
) -> Result<Json<EventMarketsResponse>, AppError> {
    let limit = validate_range("limit", params.limit, limits::EVENT_MARKETS)?;
    let (event, markets) = queries::markets_by_event(&state.pool, event_id, limit).await?;
    Ok(Json(EventMarketsResponse {
        event,
        markets_count: markets.len(),
        data: markets,
    }))
}

async fn search_tags(
    State(state): State<ApiState>,
    ValidQuery(params): ValidQuery<SearchTagsParams>,
) -> Result<Json<ListResponse<TagRow>>, AppError> {
    let name = validate_search_term("name", &params.name)?;
    let limit = validate_range("limit", params.limit, limits::SEARCH_TAGS)?;
    let rows = queries::search_tags(&state.pool, name, limit).await?;
    Ok(Json(rows.into()))
}

async fn get_kpi_summary(State(state): State<ApiState>) -> Result<Json<KpiSummary>, AppError> {
    let summary = queries::kpi_summary(&state.pool).await?;
    Ok(Json(summary))
}
