//! Liveness endpoint. Reports ok only after a round trip to the database.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::routes::ApiState;
use crate::db::queries;
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health(State(state): State<ApiState>) -> Result<Json<HealthResponse>, AppError> {
    queries::ping(&state.pool).await?;
    Ok(Json(HealthResponse { status: "ok" }))
}
