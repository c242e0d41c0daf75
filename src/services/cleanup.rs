//! Background maintenance task
//!
//! Runs on startup, then periodically:
//! - sweeps expired response-cache entries
//! - prunes EPG programs past the retention window
//! - trims watch history to the most recent N per user

use chrono::{Duration as ChronoDuration, Utc};
use sqlx::PgPool;
use std::time::Duration;
use tokio::time;

use crate::db::repository::{epg, watch_history};
use crate::services::cache::ResponseCache;

/// Configuration for the cleanup service
pub struct CleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_secs: u64,
    /// Delete EPG programs that ended more than this many days ago
    pub epg_retention_days: i64,
    /// Maximum watch history items to keep per user
    pub max_history_per_user: i64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            epg_retention_days: 7,
            max_history_per_user: 100,
        }
    }
}

/// Result of a cleanup cycle
#[derive(Debug, Default)]
pub struct CleanupResult {
    pub cache_entries_purged: usize,
    pub epg_programs_deleted: u64,
    pub history_entries_trimmed: i64,
    pub errors: Vec<String>,
}

impl CleanupResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run a single cleanup cycle
pub async fn run_cleanup(
    pool: &PgPool,
    cache: &ResponseCache,
    config: &CleanupConfig,
) -> CleanupResult {
    let mut result = CleanupResult::default();

    // Sweep expired cache entries
    result.cache_entries_purged = cache.purge_expired().await;
    if result.cache_entries_purged > 0 {
        tracing::info!(
            purged = result.cache_entries_purged,
            "expired cache entries removed"
        );
    }

    // Prune old EPG programs
    let cutoff = Utc::now() - ChronoDuration::days(config.epg_retention_days);
    match epg::delete_ended_before(pool, cutoff).await {
        Ok(count) => {
            result.epg_programs_deleted = count;
            if count > 0 {
                tracing::info!("Cleanup: deleted {} old EPG programs", count);
            }
        }
        Err(e) => {
            result.errors.push(format!("EPG cleanup failed: {}", e));
            tracing::error!("Cleanup: EPG cleanup failed: {}", e);
        }
    }

    // Trim old watch history
    match watch_history::trim_per_user(pool, config.max_history_per_user).await {
        Ok(count) => {
            result.history_entries_trimmed = count;
            if count > 0 {
                tracing::info!("Cleanup: trimmed {} old watch history entries", count);
            }
        }
        Err(e) => {
            result
                .errors
                .push(format!("Watch history cleanup failed: {}", e));
            tracing::error!("Cleanup: watch history cleanup failed: {}", e);
        }
    }

    result
}

/// Start the background cleanup task
///
/// Runs immediately on startup, then periodically at the configured
/// interval. Spawn with `tokio::spawn`.
pub async fn start_cleanup_task(pool: PgPool, cache: ResponseCache, config: CleanupConfig) {
    tracing::info!(
        "Starting cleanup task (interval: {}s, epg retention: {}d, max history: {})",
        config.interval_secs,
        config.epg_retention_days,
        config.max_history_per_user
    );

    // Run immediately on startup
    run_cleanup(&pool, &cache, &config).await;

    // Then run periodically
    let mut interval = time::interval(Duration::from_secs(config.interval_secs));
    interval.tick().await; // first tick fires immediately

    loop {
        interval.tick().await;

        let result = run_cleanup(&pool, &cache, &config).await;
        if !result.is_success() {
            for error in &result.errors {
                tracing::warn!("Cleanup error: {}", error);
            }
        }
    }
}
