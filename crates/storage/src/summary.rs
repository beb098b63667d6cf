use centimo_core::{Money, Month};
use chrono::NaiveDate;
use serde::Serialize;

use crate::db::DbPool;
use crate::error::StoreError;

/// Aggregate metrics for a month, or all time when no month is given.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub credits: Money,
    pub debits: Money,
    /// credits − debits.
    pub balance: Money,
    /// Debit totals per category, largest first.
    pub by_category: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseStats {
    pub total_transactions: i64,
    /// Transaction counts per category, largest first.
    pub category_counts: Vec<(String, i64)>,
    pub first_value_date: Option<NaiveDate>,
    pub last_value_date: Option<NaiveDate>,
}

pub async fn monthly_summary(
    pool: &DbPool,
    month: Option<Month>,
) -> Result<Summary, StoreError> {
    let range = month.map(Month::range);
    let start = range.map(|r| r.start);
    let end = range.map(|r| r.end);

    let (credit_cents, debit_cents): (i64, i64) = sqlx::query_as(
        "SELECT
             COALESCE(SUM(CASE WHEN tipo = 'credit' THEN importe ELSE 0 END), 0),
             COALESCE(SUM(CASE WHEN tipo = 'debit' THEN importe ELSE 0 END), 0)
         FROM transactions
         WHERE (?1 IS NULL OR (fecha_valor >= ?1 AND fecha_valor <= ?2))",
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT category, SUM(importe) FROM transactions
         WHERE tipo = 'debit'
           AND (?1 IS NULL OR (fecha_valor >= ?1 AND fecha_valor <= ?2))
         GROUP BY category
         ORDER BY SUM(importe) DESC, category",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(Summary {
        credits: Money::from_cents(credit_cents),
        debits: Money::from_cents(debit_cents),
        balance: Money::from_cents(credit_cents - debit_cents),
        by_category: rows
            .into_iter()
            .map(|(category, cents)| CategoryTotal {
                category,
                total: Money::from_cents(cents),
            })
            .collect(),
    })
}

pub async fn database_stats(pool: &DbPool) -> Result<DatabaseStats, StoreError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
        .fetch_one(pool)
        .await?;

    let category_counts = sqlx::query_as::<_, (String, i64)>(
        "SELECT category, COUNT(*) FROM transactions
         GROUP BY category ORDER BY COUNT(*) DESC, category",
    )
    .fetch_all(pool)
    .await?;

    let (first, last): (Option<NaiveDate>, Option<NaiveDate>) =
        sqlx::query_as("SELECT MIN(fecha_valor), MAX(fecha_valor) FROM transactions")
            .fetch_one(pool)
            .await?;

    Ok(DatabaseStats {
        total_transactions: total,
        category_counts,
        first_value_date: first,
        last_value_date: last,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::transactions::insert_transaction;
    use centimo_core::{Direction, NormalizedTransaction};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seed(
        pool: &DbPool,
        hash: &str,
        d: NaiveDate,
        cents: i64,
        direction: Direction,
        category: &str,
    ) {
        let tx = NormalizedTransaction {
            value_date: d,
            description: format!("TX {hash}"),
            amount: Money::from_cents(cents),
            direction,
            currency: None,
        };
        insert_transaction(pool, hash, &tx, category).await.unwrap();
    }

    #[tokio::test]
    async fn summary_all_time() {
        let pool = open_in_memory().await.unwrap();
        seed(&pool, "h1", date(2024, 1, 5), 250_000, Direction::Credit, "Salary").await;
        seed(&pool, "h2", date(2024, 1, 10), 2550, Direction::Debit, "Groceries").await;
        seed(&pool, "h3", date(2024, 2, 12), 4000, Direction::Debit, "Groceries").await;
        seed(&pool, "h4", date(2024, 2, 14), 1200, Direction::Debit, "Transport").await;

        let summary = monthly_summary(&pool, None).await.unwrap();
        assert_eq!(summary.credits.to_cents(), 250_000);
        assert_eq!(summary.debits.to_cents(), 7750);
        assert_eq!(summary.balance.to_cents(), 242_250);

        let totals: Vec<(&str, i64)> = summary
            .by_category
            .iter()
            .map(|c| (c.category.as_str(), c.total.to_cents()))
            .collect();
        assert_eq!(totals, vec![("Groceries", 6550), ("Transport", 1200)]);
    }

    #[tokio::test]
    async fn summary_scoped_to_month() {
        let pool = open_in_memory().await.unwrap();
        seed(&pool, "h1", date(2024, 1, 5), 250_000, Direction::Credit, "Salary").await;
        seed(&pool, "h2", date(2024, 1, 10), 2550, Direction::Debit, "Groceries").await;
        seed(&pool, "h3", date(2024, 2, 12), 4000, Direction::Debit, "Groceries").await;

        let summary = monthly_summary(&pool, Month::new(2024, 2)).await.unwrap();
        assert_eq!(summary.credits.to_cents(), 0);
        assert_eq!(summary.debits.to_cents(), 4000);
        assert_eq!(summary.balance.to_cents(), -4000);
        assert_eq!(summary.by_category.len(), 1);
    }

    #[tokio::test]
    async fn summary_of_empty_store_is_zero() {
        let pool = open_in_memory().await.unwrap();
        let summary = monthly_summary(&pool, None).await.unwrap();
        assert!(summary.credits.is_zero());
        assert!(summary.debits.is_zero());
        assert!(summary.by_category.is_empty());
    }

    #[tokio::test]
    async fn stats_counts_and_date_range() {
        let pool = open_in_memory().await.unwrap();
        seed(&pool, "h1", date(2024, 1, 5), 100, Direction::Debit, "Groceries").await;
        seed(&pool, "h2", date(2024, 3, 20), 100, Direction::Debit, "Groceries").await;
        seed(&pool, "h3", date(2024, 2, 1), 100, Direction::Credit, "Salary").await;

        let stats = database_stats(&pool).await.unwrap();
        assert_eq!(stats.total_transactions, 3);
        assert_eq!(
            stats.category_counts,
            vec![("Groceries".to_string(), 2), ("Salary".to_string(), 1)]
        );
        assert_eq!(stats.first_value_date, Some(date(2024, 1, 5)));
        assert_eq!(stats.last_value_date, Some(date(2024, 3, 20)));
    }

    #[tokio::test]
    async fn stats_of_empty_store() {
        let pool = open_in_memory().await.unwrap();
        let stats = database_stats(&pool).await.unwrap();
        assert_eq!(stats.total_transactions, 0);
        assert!(stats.first_value_date.is_none());
    }
}
