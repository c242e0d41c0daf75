//! VOD content repository (movies and series share one table)
//!
//! The content_type column is fixed per endpoint; the remaining filters are
//! optional and bound via QueryBuilder like the channel repository.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::{StreamSourceRow, VodRow};
use crate::models::catalog::ContentKind;

const VOD_COLUMNS: &str = "v.id, v.title, v.description, v.cover_url, v.stream_url, \
     v.content_type, v.year, v.duration_minutes, v.genre, v.is_featured, v.is_active";

/// Optional VOD listing filters
#[derive(Debug, Clone, Default)]
pub struct VodFilters {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub featured: Option<bool>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl VodFilters {
    /// Drop empty/blank string filters so they never reach the predicate
    pub fn normalized(self) -> Self {
        Self {
            search: non_empty(self.search),
            genre: non_empty(self.genre),
            year: self.year,
            featured: self.featured,
        }
    }

    /// Append the WHERE clause: active rows of the given kind, plus filters.
    /// Free-text search matches title and description, case-insensitively.
    fn push_predicate(&self, kind: ContentKind, qb: &mut QueryBuilder<Postgres>) {
        qb.push(" WHERE v.is_active = TRUE AND v.content_type = ")
            .push_bind(kind.to_string());

        if let Some(term) = &self.search {
            let pattern = format!("%{}%", term);
            qb.push(" AND (v.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR v.description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(genre) = &self.genre {
            qb.push(" AND v.genre = ").push_bind(genre.clone());
        }
        if let Some(year) = self.year {
            qb.push(" AND v.year = ").push_bind(year);
        }
        if let Some(featured) = self.featured {
            qb.push(" AND v.is_featured = ").push_bind(featured);
        }
    }

    /// Deterministic fragment for response-cache keys
    pub fn cache_key(&self) -> String {
        format!(
            "search={}|genre={}|year={}|featured={}",
            self.search.as_deref().unwrap_or(""),
            self.genre.as_deref().unwrap_or(""),
            self.year.map(|y| y.to_string()).unwrap_or_default(),
            self.featured.map(|f| f.to_string()).unwrap_or_default(),
        )
    }
}

/// Movies list newest-first by year; series list by id descending
fn push_order(kind: ContentKind, qb: &mut QueryBuilder<Postgres>) {
    match kind {
        ContentKind::Movie => qb.push(" ORDER BY v.year DESC NULLS LAST, v.id DESC"),
        _ => qb.push(" ORDER BY v.id DESC"),
    };
}

/// List VOD contents of the given kind matching the filters
pub async fn list(
    pool: &PgPool,
    kind: ContentKind,
    filters: &VodFilters,
    limit: i64,
    offset: i64,
) -> Result<Vec<VodRow>, sqlx::Error> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM vod_contents v", VOD_COLUMNS));
    filters.push_predicate(kind, &mut qb);
    push_order(kind, &mut qb);
    qb.push(" LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    qb.build_query_as::<VodRow>().fetch_all(pool).await
}

/// Count VOD contents matching the same filters as [`list`]
pub async fn count(
    pool: &PgPool,
    kind: ContentKind,
    filters: &VodFilters,
) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM vod_contents v");
    filters.push_predicate(kind, &mut qb);

    let row: (i64,) = qb.build_query_as().fetch_one(pool).await?;
    Ok(row.0)
}

/// Get a single VOD content by id and kind (active or not)
pub async fn get_by_id(
    pool: &PgPool,
    kind: ContentKind,
    id: i32,
) -> Result<Option<VodRow>, sqlx::Error> {
    sqlx::query_as::<_, VodRow>(&format!(
        "SELECT {} FROM vod_contents v WHERE v.id = $1 AND v.content_type = $2",
        VOD_COLUMNS
    ))
    .bind(id)
    .bind(kind.to_string())
    .fetch_optional(pool)
    .await
}

/// Resolve the stored stream origin for the proxy gateway
pub async fn get_stream_source(
    pool: &PgPool,
    kind: ContentKind,
    id: i32,
) -> Result<Option<StreamSourceRow>, sqlx::Error> {
    sqlx::query_as::<_, StreamSourceRow>(
        "SELECT stream_url, is_active FROM vod_contents WHERE id = $1 AND content_type = $2",
    )
    .bind(id)
    .bind(kind.to_string())
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predicate_sql(kind: ContentKind, filters: &VodFilters) -> String {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM vod_contents v");
        filters.push_predicate(kind, &mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn test_kind_always_bound() {
        let sql = predicate_sql(ContentKind::Movie, &VodFilters::default());
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM vod_contents v \
             WHERE v.is_active = TRUE AND v.content_type = $1"
        );
    }

    #[test]
    fn test_search_matches_both_columns() {
        let filters = VodFilters {
            search: Some("matrix".into()),
            ..Default::default()
        };
        let sql = predicate_sql(ContentKind::Movie, &filters);

        assert!(sql.contains("v.title ILIKE $2"));
        assert!(sql.contains("v.description ILIKE $3"));
        assert!(!sql.contains("matrix"));
    }

    #[test]
    fn test_ordering_per_kind() {
        let mut qb = QueryBuilder::<Postgres>::new("");
        push_order(ContentKind::Movie, &mut qb);
        assert_eq!(qb.sql(), " ORDER BY v.year DESC NULLS LAST, v.id DESC");

        let mut qb = QueryBuilder::<Postgres>::new("");
        push_order(ContentKind::Series, &mut qb);
        assert_eq!(qb.sql(), " ORDER BY v.id DESC");
    }
}
