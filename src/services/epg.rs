//! EPG windowing service
//!
//! Three query windows over the program guide:
//! - now playing: interval containment, boundary-inclusive on both ends
//! - upcoming: programs starting within the next N hours (horizon inclusive)
//! - day listing: programs starting inside a calendar day, paginated
//!
//! Day windows are computed on the UTC calendar, so "today" means the same
//! thing regardless of where the server runs. Clients wanting a local day
//! pass `date` explicitly.

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use serde_json::Value;
use sqlx::PgPool;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::db::repository::epg::{self, DayWindow};
use crate::error::ApiError;
use crate::models::epg::EpgProgram;
use crate::models::{ApiResponse, PageParams, Pagination};
use crate::services::cache::ResponseCache;

/// Hard cap on rows returned by the upcoming window
pub const UPCOMING_CAP: i64 = 50;

/// Widest allowed upcoming horizon in hours
const MAX_UPCOMING_HOURS: i64 = 48;

fn query_failed(op: &'static str, started: Instant, e: sqlx::Error) -> ApiError {
    tracing::error!(
        op = op,
        elapsed_ms = started.elapsed().as_millis() as u64,
        error = %e,
        "query failed"
    );
    ApiError::Storage(e)
}

/// Parse a `YYYY-MM-DD` date parameter
pub fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::Validation(format!("data inválida: {}", raw)))
}

/// Midnight-to-midnight bounds of the given UTC calendar day
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_hms_opt(0, 0, 0).expect("midnight is valid").and_utc();
    (start, start + ChronoDuration::days(1))
}

/// Validate the upcoming-window hours parameter (1..=48)
pub fn validate_hours(hours: i64) -> Result<i64, ApiError> {
    if (1..=MAX_UPCOMING_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(ApiError::Validation(format!(
            "hours deve estar entre 1 e {}",
            MAX_UPCOMING_HOURS
        )))
    }
}

#[derive(Clone)]
pub struct EpgService {
    pool: PgPool,
    cache: ResponseCache,
    now_ttl: Duration,
    day_ttl: Duration,
    default_hours: i64,
    default_limit: i64,
    max_limit: i64,
}

impl EpgService {
    pub fn new(pool: PgPool, cache: ResponseCache, config: &Config) -> Self {
        Self {
            pool,
            cache,
            now_ttl: Duration::from_secs(config.epg_now_cache_ttl_secs),
            day_ttl: Duration::from_secs(config.catalog_cache_ttl_secs),
            default_hours: config.epg_default_hours,
            default_limit: config.default_page_size,
            max_limit: config.max_page_size,
        }
    }

    /// Programs on air right now, optionally for one channel.
    /// No pagination; the result is a set (overlaps are not deduplicated).
    pub async fn now_playing(&self, channel_id: Option<i32>) -> Result<Value, ApiError> {
        let key = format!(
            "epg:now:canal={}",
            channel_id.map(|c| c.to_string()).unwrap_or_default()
        );

        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }

        let started = Instant::now();
        let rows = epg::current(&self.pool, Utc::now(), channel_id)
            .await
            .map_err(|e| query_failed("epg:now", started, e))?;

        let data: Vec<EpgProgram> = rows.into_iter().map(Into::into).collect();
        let envelope = serde_json::to_value(ApiResponse::ok(data))?;

        self.cache.set(&key, envelope.clone(), self.now_ttl).await;
        Ok(envelope)
    }

    /// Programs starting within the next `hours` hours (default 6).
    /// Capped at [`UPCOMING_CAP`] rows; not cached (small and time-sensitive).
    pub async fn upcoming(
        &self,
        channel_id: Option<i32>,
        hours: Option<i64>,
    ) -> Result<Value, ApiError> {
        let hours = validate_hours(hours.unwrap_or(self.default_hours))?;

        let now = Utc::now();
        let horizon = now + ChronoDuration::hours(hours);

        let started = Instant::now();
        let rows = epg::upcoming(&self.pool, now, horizon, channel_id, UPCOMING_CAP)
            .await
            .map_err(|e| query_failed("epg:upcoming", started, e))?;

        let data: Vec<EpgProgram> = rows.into_iter().map(Into::into).collect();
        Ok(serde_json::to_value(ApiResponse::ok(data))?)
    }

    /// Programs starting inside the given day (default: today, UTC),
    /// optionally filtered by channel and category, paginated.
    pub async fn day_listing(
        &self,
        date: Option<String>,
        channel_id: Option<i32>,
        categoria: Option<String>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Value, ApiError> {
        let day = match date.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(raw) => parse_date(raw)?,
            None => Utc::now().date_naive(),
        };
        let (day_start, day_end) = day_bounds(day);
        let categoria = categoria.filter(|c| !c.trim().is_empty());

        let page = PageParams::clamped(
            page.unwrap_or(1),
            limit.unwrap_or(self.default_limit),
            self.max_limit,
        );
        let key = format!(
            "epg:day:date={}|canal={}|categoria={}|page={}|limit={}",
            day,
            channel_id.map(|c| c.to_string()).unwrap_or_default(),
            categoria.as_deref().unwrap_or(""),
            page.page,
            page.limit
        );

        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }

        let window = DayWindow {
            day_start,
            day_end,
            channel_id,
            categoria,
        };

        let started = Instant::now();
        let rows = epg::day_listing(&self.pool, &window, page.limit, page.offset())
            .await
            .map_err(|e| query_failed("epg:day", started, e))?;
        let total = epg::day_count(&self.pool, &window)
            .await
            .map_err(|e| query_failed("epg:day:count", started, e))?;

        tracing::debug!(
            day = %day,
            total,
            returned = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "epg day listing"
        );

        let data: Vec<EpgProgram> = rows.into_iter().map(Into::into).collect();
        let envelope =
            serde_json::to_value(ApiResponse::paginated(data, Pagination::new(page, total)))?;

        self.cache.set(&key, envelope.clone(), self.day_ttl).await;
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert!(parse_date("01/06/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("hoje").is_err());
    }

    #[test]
    fn test_day_bounds_cover_exactly_one_utc_day() {
        let (start, end) = day_bounds(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());

        assert_eq!(start.hour(), 0);
        assert_eq!(start.minute(), 0);
        assert_eq!(end - start, ChronoDuration::days(1));
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
    }

    #[test]
    fn test_hours_range() {
        assert_eq!(validate_hours(1).unwrap(), 1);
        assert_eq!(validate_hours(6).unwrap(), 6);
        assert_eq!(validate_hours(48).unwrap(), 48);
        assert!(validate_hours(0).is_err());
        assert!(validate_hours(49).is_err());
        assert!(validate_hours(-2).is_err());
    }

    #[test]
    fn test_blank_date_falls_back_to_today() {
        // day_listing treats "" and missing the same way; the parse path
        // only runs for non-blank input
        assert!(parse_date("").is_err());
        let blank: Option<String> = Some("  ".into());
        assert!(blank.as_deref().filter(|d| !d.trim().is_empty()).is_none());
    }
}
