//! Category listing endpoint

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

/// GET /categories - Active categories in display order
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let envelope = state.catalog.list_categories().await?;

    Ok(Json(envelope))
}
