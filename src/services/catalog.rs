//! Catalog service
//!
//! Orchestrates filter normalization, pagination clamping, the response
//! cache and the paired data/count queries for channels, VOD contents and
//! categories. Every listing returns the serialized uniform envelope so
//! cache hits are byte-identical to the original response.

use serde_json::Value;
use sqlx::PgPool;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::db::repository::channels::{self, ChannelFilters};
use crate::db::repository::vod::{self, VodFilters};
use crate::db::repository::categories;
use crate::error::ApiError;
use crate::models::catalog::{Category, Channel, ContentKind, VodItem};
use crate::models::{ApiResponse, PageParams, Pagination};
use crate::services::cache::ResponseCache;

/// Log a failed query with its operation label and elapsed time, then wrap it
fn query_failed(op: &'static str, started: Instant, e: sqlx::Error) -> ApiError {
    tracing::error!(
        op = op,
        elapsed_ms = started.elapsed().as_millis() as u64,
        error = %e,
        "query failed"
    );
    ApiError::Storage(e)
}

#[derive(Clone)]
pub struct CatalogService {
    pool: PgPool,
    cache: ResponseCache,
    list_ttl: Duration,
    default_limit: i64,
    max_limit: i64,
}

impl CatalogService {
    pub fn new(pool: PgPool, cache: ResponseCache, config: &Config) -> Self {
        Self {
            pool,
            cache,
            list_ttl: Duration::from_secs(config.catalog_cache_ttl_secs),
            default_limit: config.default_page_size,
            max_limit: config.max_page_size,
        }
    }

    fn page_params(&self, page: Option<i64>, limit: Option<i64>) -> PageParams {
        PageParams::clamped(
            page.unwrap_or(1),
            limit.unwrap_or(self.default_limit),
            self.max_limit,
        )
    }

    /// List active channels with optional filters and pagination
    pub async fn list_channels(
        &self,
        filters: ChannelFilters,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Value, ApiError> {
        let filters = filters.normalized();
        let page = self.page_params(page, limit);
        let key = format!(
            "channels:{}|page={}|limit={}",
            filters.cache_key(),
            page.page,
            page.limit
        );

        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }

        let started = Instant::now();
        let rows = channels::list(&self.pool, &filters, page.limit, page.offset())
            .await
            .map_err(|e| query_failed("channels:list", started, e))?;
        let total = channels::count(&self.pool, &filters)
            .await
            .map_err(|e| query_failed("channels:count", started, e))?;

        tracing::debug!(
            total,
            returned = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "channels listed"
        );

        let data: Vec<Channel> = rows.into_iter().map(Into::into).collect();
        let envelope =
            serde_json::to_value(ApiResponse::paginated(data, Pagination::new(page, total)))?;

        self.cache.set(&key, envelope.clone(), self.list_ttl).await;
        Ok(envelope)
    }

    /// Get a single channel by id
    pub async fn get_channel(&self, id: i32) -> Result<Value, ApiError> {
        let started = Instant::now();
        let row = channels::get_by_id(&self.pool, id)
            .await
            .map_err(|e| query_failed("channels:get", started, e))?
            .ok_or_else(|| ApiError::NotFound("Canal não encontrado".to_string()))?;

        Ok(serde_json::to_value(ApiResponse::ok(Channel::from(row)))?)
    }

    /// List active VOD contents of one kind (movies or series)
    pub async fn list_vod(
        &self,
        kind: ContentKind,
        filters: VodFilters,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Value, ApiError> {
        let filters = filters.normalized();
        let page = self.page_params(page, limit);
        let key = format!(
            "vod:{}:{}|page={}|limit={}",
            kind,
            filters.cache_key(),
            page.page,
            page.limit
        );

        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }

        let started = Instant::now();
        let rows = vod::list(&self.pool, kind, &filters, page.limit, page.offset())
            .await
            .map_err(|e| query_failed("vod:list", started, e))?;
        let total = vod::count(&self.pool, kind, &filters)
            .await
            .map_err(|e| query_failed("vod:count", started, e))?;

        tracing::debug!(
            kind = %kind,
            total,
            returned = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "vod contents listed"
        );

        let data: Vec<VodItem> = rows.into_iter().map(Into::into).collect();
        let envelope =
            serde_json::to_value(ApiResponse::paginated(data, Pagination::new(page, total)))?;

        self.cache.set(&key, envelope.clone(), self.list_ttl).await;
        Ok(envelope)
    }

    /// Get a single VOD content by id and kind
    pub async fn get_vod(&self, kind: ContentKind, id: i32) -> Result<Value, ApiError> {
        let started = Instant::now();
        let row = vod::get_by_id(&self.pool, kind, id)
            .await
            .map_err(|e| query_failed("vod:get", started, e))?
            .ok_or_else(|| ApiError::NotFound("Conteúdo não encontrado".to_string()))?;

        Ok(serde_json::to_value(ApiResponse::ok(VodItem::from(row)))?)
    }

    /// List active categories (display order)
    pub async fn list_categories(&self) -> Result<Value, ApiError> {
        let key = "categories:all";

        if let Some(hit) = self.cache.get(key).await {
            return Ok(hit);
        }

        let started = Instant::now();
        let rows = categories::list_active(&self.pool)
            .await
            .map_err(|e| query_failed("categories:list", started, e))?;

        let data: Vec<Category> = rows.into_iter().map(Into::into).collect();
        let envelope = serde_json::to_value(ApiResponse::ok(data))?;

        self.cache.set(key, envelope.clone(), self.list_ttl).await;
        Ok(envelope)
    }
}
