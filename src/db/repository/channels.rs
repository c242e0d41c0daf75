//! Channel repository
//!
//! Listing filters are assembled with sqlx's QueryBuilder: values are always
//! bound, never concatenated into the SQL text. The same predicate feeds
//! both the data query and the COUNT(*) query.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::{ChannelRow, StreamSourceRow};

const CHANNEL_COLUMNS: &str = "c.id, c.name, c.logo_url, c.stream_url, c.quality, \
     c.language, c.country, c.category_id, cat.name AS category_name, \
     c.is_active, c.sort_order";

/// Optional channel listing filters. Empty strings are treated as absent;
/// call [`ChannelFilters::normalized`] before building a predicate.
#[derive(Debug, Clone, Default)]
pub struct ChannelFilters {
    pub search: Option<String>,
    pub categoria: Option<i32>,
    pub qualidade: Option<String>,
    pub idioma: Option<String>,
    pub pais: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ChannelFilters {
    /// Drop empty/blank string filters so they never reach the predicate
    pub fn normalized(self) -> Self {
        Self {
            search: non_empty(self.search),
            categoria: self.categoria,
            qualidade: non_empty(self.qualidade),
            idioma: non_empty(self.idioma),
            pais: non_empty(self.pais),
        }
    }

    /// Append the WHERE clause for these filters. Only active channels are
    /// listed; the channel entity has no description column, so free-text
    /// search matches the name only.
    fn push_predicate(&self, qb: &mut QueryBuilder<Postgres>) {
        qb.push(" WHERE c.is_active = TRUE");

        if let Some(term) = &self.search {
            qb.push(" AND c.name ILIKE ")
                .push_bind(format!("%{}%", term));
        }
        if let Some(id) = self.categoria {
            qb.push(" AND c.category_id = ").push_bind(id);
        }
        if let Some(quality) = &self.qualidade {
            qb.push(" AND c.quality = ").push_bind(quality.clone());
        }
        if let Some(language) = &self.idioma {
            qb.push(" AND c.language = ").push_bind(language.clone());
        }
        if let Some(country) = &self.pais {
            qb.push(" AND c.country = ").push_bind(country.clone());
        }
    }

    /// Deterministic fragment for response-cache keys
    pub fn cache_key(&self) -> String {
        format!(
            "search={}|categoria={}|qualidade={}|idioma={}|pais={}",
            self.search.as_deref().unwrap_or(""),
            self.categoria.map(|c| c.to_string()).unwrap_or_default(),
            self.qualidade.as_deref().unwrap_or(""),
            self.idioma.as_deref().unwrap_or(""),
            self.pais.as_deref().unwrap_or(""),
        )
    }
}

/// List channels matching the filters, ordered by name
pub async fn list(
    pool: &PgPool,
    filters: &ChannelFilters,
    limit: i64,
    offset: i64,
) -> Result<Vec<ChannelRow>, sqlx::Error> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM channels c LEFT JOIN categories cat ON cat.id = c.category_id",
        CHANNEL_COLUMNS
    ));
    filters.push_predicate(&mut qb);
    qb.push(" ORDER BY c.name ASC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    qb.build_query_as::<ChannelRow>().fetch_all(pool).await
}

/// Count channels matching the same filters as [`list`]
pub async fn count(pool: &PgPool, filters: &ChannelFilters) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM channels c");
    filters.push_predicate(&mut qb);

    let row: (i64,) = qb.build_query_as().fetch_one(pool).await?;
    Ok(row.0)
}

/// Get a single channel by id (active or not), with category name joined
pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<ChannelRow>, sqlx::Error> {
    sqlx::query_as::<_, ChannelRow>(&format!(
        "SELECT {} FROM channels c \
         LEFT JOIN categories cat ON cat.id = c.category_id \
         WHERE c.id = $1",
        CHANNEL_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Resolve the stored stream origin for the proxy gateway
pub async fn get_stream_source(
    pool: &PgPool,
    id: i32,
) -> Result<Option<StreamSourceRow>, sqlx::Error> {
    sqlx::query_as::<_, StreamSourceRow>(
        "SELECT stream_url, is_active FROM channels WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predicate_sql(filters: &ChannelFilters) -> String {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM channels c");
        filters.push_predicate(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn test_no_filters_only_active_clause() {
        let sql = predicate_sql(&ChannelFilters::default());
        assert_eq!(sql, "SELECT COUNT(*) FROM channels c WHERE c.is_active = TRUE");
    }

    #[test]
    fn test_all_filters_bound_positionally() {
        let filters = ChannelFilters {
            search: Some("globo".into()),
            categoria: Some(2),
            qualidade: Some("HD".into()),
            idioma: Some("pt".into()),
            pais: Some("BR".into()),
        };
        let sql = predicate_sql(&filters);

        assert!(sql.contains("c.name ILIKE $1"));
        assert!(sql.contains("c.category_id = $2"));
        assert!(sql.contains("c.quality = $3"));
        assert!(sql.contains("c.language = $4"));
        assert!(sql.contains("c.country = $5"));
        // filter values never appear in the SQL text
        assert!(!sql.contains("globo"));
        assert!(!sql.contains("HD"));
    }

    #[test]
    fn test_empty_strings_stripped() {
        let filters = ChannelFilters {
            search: Some("  ".into()),
            qualidade: Some(String::new()),
            ..Default::default()
        }
        .normalized();

        assert!(filters.search.is_none());
        assert!(filters.qualidade.is_none());

        let sql = predicate_sql(&filters);
        assert!(!sql.contains("ILIKE"));
        assert!(!sql.contains("quality"));
    }

    #[test]
    fn test_cache_key_is_deterministic() {
        let filters = ChannelFilters {
            qualidade: Some("HD".into()),
            ..Default::default()
        };
        assert_eq!(
            filters.cache_key(),
            "search=|categoria=|qualidade=HD|idioma=|pais="
        );
    }
}
