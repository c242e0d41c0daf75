//! VOD catalog endpoints (movies and series)

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::repository::vod::VodFilters;
use crate::error::{parse_id, ApiError};
use crate::models::catalog::ContentKind;
use crate::AppState;

/// Query parameters for VOD listings
#[derive(Debug, Deserialize)]
pub struct VodListQuery {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub featured: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl VodListQuery {
    fn into_filters(self) -> (VodFilters, Option<i64>, Option<i64>) {
        let filters = VodFilters {
            search: self.search,
            genre: self.genre,
            year: self.year,
            featured: self.featured,
        };
        (filters, self.page, self.limit)
    }
}

/// GET /vod/movies - Paginated movie listing
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VodListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (filters, page, limit) = query.into_filters();
    let envelope = state
        .catalog
        .list_vod(ContentKind::Movie, filters, page, limit)
        .await?;

    Ok(Json(envelope))
}

/// GET /vod/movies/:id - Single movie
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let envelope = state.catalog.get_vod(ContentKind::Movie, id).await?;

    Ok(Json(envelope))
}

/// GET /vod/series - Paginated series listing
pub async fn list_series(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VodListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (filters, page, limit) = query.into_filters();
    let envelope = state
        .catalog
        .list_vod(ContentKind::Series, filters, page, limit)
        .await?;

    Ok(Json(envelope))
}

/// GET /vod/series/:id - Single series
pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let envelope = state.catalog.get_vod(ContentKind::Series, id).await?;

    Ok(Json(envelope))
}
