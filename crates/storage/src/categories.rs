use centimo_core::Category;

use crate::db::DbPool;
use crate::error::StoreError;

fn from_row(row: (i64, String, String)) -> Result<Category, StoreError> {
    let keywords: Vec<String> =
        serde_json::from_str(&row.2).map_err(|_| StoreError::CorruptKeywords(row.1.clone()))?;
    Ok(Category {
        id: Some(row.0),
        name: row.1,
        keywords,
    })
}

/// Create a category or replace its keyword set. The conflict-update keeps the
/// original row id, so `list_categories` keeps reporting creation order.
pub async fn upsert_category(
    pool: &DbPool,
    name: &str,
    keywords: &[String],
) -> Result<(), StoreError> {
    let keywords_json = serde_json::to_string(keywords).expect("serialize keyword list");
    sqlx::query(
        "INSERT INTO categories (category_name, keywords) VALUES (?, ?)
         ON CONFLICT(category_name) DO UPDATE
         SET keywords = excluded.keywords, last_modified = datetime('now')",
    )
    .bind(name)
    .bind(keywords_json)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_category(pool: &DbPool, name: &str) -> Result<Option<Category>, StoreError> {
    let row = sqlx::query_as::<_, (i64, String, String)>(
        "SELECT id, category_name, keywords FROM categories WHERE category_name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    row.map(from_row).transpose()
}

/// All categories in creation order; the categorizer's matching order.
pub async fn list_categories(pool: &DbPool) -> Result<Vec<Category>, StoreError> {
    let rows = sqlx::query_as::<_, (i64, String, String)>(
        "SELECT id, category_name, keywords FROM categories ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(from_row).collect()
}

/// Append one keyword to an existing category, skipping duplicates. Returns
/// whether the keyword list changed; `NotFound` when the category is absent.
pub async fn append_keyword(
    pool: &DbPool,
    name: &str,
    keyword: &str,
) -> Result<bool, StoreError> {
    let mut category = get_category(pool, name)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("category '{name}'")))?;

    if !category.add_keyword(keyword) {
        return Ok(false);
    }
    upsert_category(pool, name, &category.keywords).await?;
    Ok(true)
}
