//! EPG endpoints
//!
//! `canalId` and `date` are parsed by hand so malformed values surface as
//! field-level validation errors in the uniform envelope.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{parse_param, ApiError};
use crate::AppState;

fn parse_canal_id(raw: &Option<String>) -> Result<Option<i32>, ApiError> {
    match raw.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(raw) => Ok(Some(parse_param("canalId", raw)?)),
        None => Ok(None),
    }
}

/// Query parameters for the date-scoped EPG listing
#[derive(Debug, Deserialize)]
pub struct EpgDayQuery {
    pub date: Option<String>,
    #[serde(rename = "canalId")]
    pub canal_id: Option<String>,
    pub categoria: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /epg - Programs of a calendar day (default: today, UTC), paginated
pub async fn day_listing(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EpgDayQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let canal_id = parse_canal_id(&query.canal_id)?;
    let envelope = state
        .epg
        .day_listing(query.date, canal_id, query.categoria, query.page, query.limit)
        .await?;

    Ok(Json(envelope))
}

/// Query parameters for the now-playing window
#[derive(Debug, Deserialize)]
pub struct EpgNowQuery {
    #[serde(rename = "canalId")]
    pub canal_id: Option<String>,
}

/// GET /epg/now - Programs currently on air
pub async fn now_playing(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EpgNowQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let canal_id = parse_canal_id(&query.canal_id)?;
    let envelope = state.epg.now_playing(canal_id).await?;

    Ok(Json(envelope))
}

/// Query parameters for the upcoming window
#[derive(Debug, Deserialize)]
pub struct EpgNextQuery {
    #[serde(rename = "canalId")]
    pub canal_id: Option<String>,
    pub hours: Option<String>,
}

/// GET /epg/next - Programs starting within the next N hours (default 6)
pub async fn upcoming(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EpgNextQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let canal_id = parse_canal_id(&query.canal_id)?;
    let hours = match query.hours.as_deref().filter(|h| !h.trim().is_empty()) {
        Some(raw) => Some(
            raw.trim()
                .parse::<i64>()
                .map_err(|_| ApiError::Validation(format!("hours inválido: {}", raw)))?,
        ),
        None => None,
    };

    let envelope = state.epg.upcoming(canal_id, hours).await?;

    Ok(Json(envelope))
}
