//! Channel catalog endpoints

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::repository::channels::ChannelFilters;
use crate::error::{parse_id, parse_param, ApiError};
use crate::AppState;

/// Query parameters for the channel listing.
/// Filter names keep the public API's Portuguese forms.
#[derive(Debug, Deserialize)]
pub struct ChannelListQuery {
    pub search: Option<String>,
    pub categoria: Option<String>,
    pub qualidade: Option<String>,
    pub idioma: Option<String>,
    pub pais: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /channels - Paginated channel listing with filters
pub async fn list_channels(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChannelListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let categoria = match query.categoria.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(raw) => Some(parse_param("categoria", raw)?),
        None => None,
    };

    let filters = ChannelFilters {
        search: query.search,
        categoria,
        qualidade: query.qualidade,
        idioma: query.idioma,
        pais: query.pais,
    };

    let envelope = state
        .catalog
        .list_channels(filters, query.page, query.limit)
        .await?;

    Ok(Json(envelope))
}

/// GET /channels/:id - Single channel with category name
pub async fn get_channel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let envelope = state.catalog.get_channel(id).await?;

    Ok(Json(envelope))
}
