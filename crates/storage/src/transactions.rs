use centimo_core::{Direction, Money, Month, NormalizedTransaction, Transaction, UNCATEGORIZED};
use chrono::NaiveDate;

use crate::db::DbPool;
use crate::error::StoreError;

/// Listing filter: both dimensions optional, unfiltered when `None`.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub month: Option<Month>,
    /// Case-insensitive substring of the description.
    pub search: Option<String>,
}

impl TransactionFilter {
    pub fn for_month(month: Month) -> Self {
        TransactionFilter {
            month: Some(month),
            ..Default::default()
        }
    }
}

type TxRow = (
    i64,
    String,
    NaiveDate,
    String,
    i64,
    String,
    String,
    String,
    String,
);

const TX_COLUMNS: &str = "id, transaction_hash, fecha_valor, concepto, importe, tipo, category, \
                          upload_date, last_modified";

fn from_row(row: TxRow) -> Result<Transaction, StoreError> {
    let direction: Direction = row.5.parse().map_err(|_| StoreError::CorruptRow {
        id: row.0,
        reason: format!("unknown tipo '{}'", row.5),
    })?;
    Ok(Transaction {
        id: row.0,
        fingerprint: row.1,
        value_date: row.2,
        description: row.3,
        amount: Money::from_cents(row.4),
        direction,
        category: row.6,
        uploaded_at: row.7,
        last_modified: row.8,
    })
}

/// Persist a normalized transaction. `DuplicateFingerprint` on a hash collision
/// with an already-stored row; the unique index is the last line of defense
/// behind the importer's `transaction_exists` pre-check.
pub async fn insert_transaction(
    pool: &DbPool,
    fingerprint: &str,
    tx: &NormalizedTransaction,
    category: &str,
) -> Result<i64, StoreError> {
    let result = sqlx::query_scalar::<_, i64>(
        "INSERT INTO transactions (transaction_hash, fecha_valor, concepto, importe, tipo, category)
         VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(fingerprint)
    .bind(tx.value_date)
    .bind(&tx.description)
    .bind(tx.amount.to_cents())
    .bind(tx.direction.as_str())
    .bind(category)
    .fetch_one(pool)
    .await;

    match result {
        Ok(id) => Ok(id),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(StoreError::DuplicateFingerprint(fingerprint.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn transaction_exists(pool: &DbPool, fingerprint: &str) -> Result<bool, StoreError> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE transaction_hash = ?")
            .bind(fingerprint)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

pub async fn get_transaction(pool: &DbPool, id: i64) -> Result<Option<Transaction>, StoreError> {
    let row = sqlx::query_as::<_, TxRow>(&format!(
        "SELECT {TX_COLUMNS} FROM transactions WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(from_row).transpose()
}

/// Most recent first; id breaks same-day ties so the order is stable.
pub async fn list_transactions(
    pool: &DbPool,
    filter: &TransactionFilter,
) -> Result<Vec<Transaction>, StoreError> {
    let range = filter.month.map(Month::range);
    let rows = sqlx::query_as::<_, TxRow>(&format!(
        "SELECT {TX_COLUMNS} FROM transactions
         WHERE (?1 IS NULL OR (fecha_valor >= ?1 AND fecha_valor <= ?2))
           AND (?3 IS NULL OR instr(lower(concepto), lower(?3)) > 0)
         ORDER BY fecha_valor DESC, id DESC"
    ))
    .bind(range.map(|r| r.start))
    .bind(range.map(|r| r.end))
    .bind(filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()))
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(from_row).collect()
}

pub async fn list_uncategorized(pool: &DbPool) -> Result<Vec<Transaction>, StoreError> {
    let rows = sqlx::query_as::<_, TxRow>(&format!(
        "SELECT {TX_COLUMNS} FROM transactions WHERE category = ?
         ORDER BY fecha_valor DESC, id DESC"
    ))
    .bind(UNCATEGORIZED)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(from_row).collect()
}

/// Reassign one transaction's category. `NotFound` when the id is absent.
pub async fn update_category(
    pool: &DbPool,
    id: i64,
    new_category: &str,
) -> Result<(), StoreError> {
    let result = sqlx::query(
        "UPDATE transactions SET category = ?, last_modified = datetime('now') WHERE id = ?",
    )
    .bind(new_category)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound(format!("transaction {id}")));
    }
    Ok(())
}

/// Recategorize every transaction sharing the same raw description. Returns the
/// number of rows touched.
pub async fn update_category_by_description(
    pool: &DbPool,
    description: &str,
    new_category: &str,
) -> Result<u64, StoreError> {
    let result = sqlx::query(
        "UPDATE transactions SET category = ?, last_modified = datetime('now') WHERE concepto = ?",
    )
    .bind(new_category)
    .bind(description)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
