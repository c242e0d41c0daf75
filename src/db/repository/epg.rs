//! EPG program repository
//!
//! Three window shapes over epg_programs:
//! - current:  start_time <= now AND end_time >= now (inclusive both ends)
//! - upcoming: start_time > now AND start_time <= horizon, capped
//! - day:      start_time within [day_start, day_end), paginated
//!
//! All windows join the channel name for display and order deterministically.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::EpgProgramRow;

const EPG_COLUMNS: &str = "p.id, p.channel_id, c.name AS channel_name, p.title, \
     p.description, p.category, p.start_time, p.end_time, p.classification";

const EPG_FROM: &str = "FROM epg_programs p JOIN channels c ON c.id = p.channel_id";

/// Programs on air at `now`. A program starting or ending exactly at `now`
/// counts as on air. Returns a set: overlapping programs are not deduplicated.
pub async fn current(
    pool: &PgPool,
    now: DateTime<Utc>,
    channel_id: Option<i32>,
) -> Result<Vec<EpgProgramRow>, sqlx::Error> {
    let mut qb = QueryBuilder::new(format!("SELECT {} {}", EPG_COLUMNS, EPG_FROM));
    qb.push(" WHERE p.start_time <= ")
        .push_bind(now)
        .push(" AND p.end_time >= ")
        .push_bind(now);
    if let Some(id) = channel_id {
        qb.push(" AND p.channel_id = ").push_bind(id);
    }
    qb.push(" ORDER BY p.channel_id, p.start_time");

    qb.build_query_as::<EpgProgramRow>().fetch_all(pool).await
}

/// Programs starting after `now` and no later than `horizon` (inclusive)
pub async fn upcoming(
    pool: &PgPool,
    now: DateTime<Utc>,
    horizon: DateTime<Utc>,
    channel_id: Option<i32>,
    cap: i64,
) -> Result<Vec<EpgProgramRow>, sqlx::Error> {
    let mut qb = QueryBuilder::new(format!("SELECT {} {}", EPG_COLUMNS, EPG_FROM));
    qb.push(" WHERE p.start_time > ")
        .push_bind(now)
        .push(" AND p.start_time <= ")
        .push_bind(horizon);
    if let Some(id) = channel_id {
        qb.push(" AND p.channel_id = ").push_bind(id);
    }
    qb.push(" ORDER BY p.start_time ASC LIMIT ").push_bind(cap);

    qb.build_query_as::<EpgProgramRow>().fetch_all(pool).await
}

/// Filters for the date-scoped listing
#[derive(Debug, Clone)]
pub struct DayWindow {
    pub day_start: DateTime<Utc>,
    pub day_end: DateTime<Utc>,
    pub channel_id: Option<i32>,
    pub categoria: Option<String>,
}

impl DayWindow {
    fn push_predicate(&self, qb: &mut QueryBuilder<Postgres>) {
        qb.push(" WHERE p.start_time >= ")
            .push_bind(self.day_start)
            .push(" AND p.start_time < ")
            .push_bind(self.day_end);
        if let Some(id) = self.channel_id {
            qb.push(" AND p.channel_id = ").push_bind(id);
        }
        if let Some(category) = &self.categoria {
            qb.push(" AND p.category = ").push_bind(category.clone());
        }
    }
}

/// Programs starting inside the day window, paginated
pub async fn day_listing(
    pool: &PgPool,
    window: &DayWindow,
    limit: i64,
    offset: i64,
) -> Result<Vec<EpgProgramRow>, sqlx::Error> {
    let mut qb = QueryBuilder::new(format!("SELECT {} {}", EPG_COLUMNS, EPG_FROM));
    window.push_predicate(&mut qb);
    qb.push(" ORDER BY p.start_time ASC, p.channel_id LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    qb.build_query_as::<EpgProgramRow>().fetch_all(pool).await
}

/// Count for the same day window as [`day_listing`]
pub async fn day_count(pool: &PgPool, window: &DayWindow) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) {}", EPG_FROM));
    window.push_predicate(&mut qb);

    let row: (i64,) = qb.build_query_as().fetch_one(pool).await?;
    Ok(row.0)
}

/// Prune programs that ended before the cutoff; returns rows deleted
pub async fn delete_ended_before(
    pool: &PgPool,
    cutoff: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM epg_programs WHERE end_time < $1")
        .bind(cutoff)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_current_window_inclusive_both_ends() {
        // The generated predicate must use <= / >= so a program with
        // start_time == now or end_time == now is on air.
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM epg_programs p");
        qb.push(" WHERE p.start_time <= ")
            .push_bind(now())
            .push(" AND p.end_time >= ")
            .push_bind(now());

        assert!(qb.sql().contains("p.start_time <= $1"));
        assert!(qb.sql().contains("p.end_time >= $2"));
    }

    #[test]
    fn test_upcoming_window_excludes_now_includes_horizon() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM epg_programs p");
        qb.push(" WHERE p.start_time > ")
            .push_bind(now())
            .push(" AND p.start_time <= ")
            .push_bind(now() + chrono::Duration::hours(6));

        assert!(qb.sql().contains("p.start_time > $1"));
        assert!(qb.sql().contains("p.start_time <= $2"));
    }

    #[test]
    fn test_day_window_half_open() {
        let window = DayWindow {
            day_start: now(),
            day_end: now() + chrono::Duration::days(1),
            channel_id: Some(3),
            categoria: None,
        };
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM epg_programs p");
        window.push_predicate(&mut qb);

        let sql = qb.sql();
        assert!(sql.contains("p.start_time >= $1"));
        assert!(sql.contains("p.start_time < $2"));
        assert!(sql.contains("p.channel_id = $3"));
        assert!(!sql.contains("category ="));
    }
}
