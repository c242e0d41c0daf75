//! Category repository

use sqlx::PgPool;

use crate::db::models::CategoryRow;

/// List active categories in display order
pub async fn list_active(pool: &PgPool) -> Result<Vec<CategoryRow>, sqlx::Error> {
    sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name, description, icon, sort_order, is_active \
         FROM categories WHERE is_active = TRUE \
         ORDER BY sort_order, name",
    )
    .fetch_all(pool)
    .await
}
