use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;

pub type DbPool = Pool<Sqlite>;

/// Open (creating if needed) the database at `path` and run migrations.
pub async fn create_db(path: &Path) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    configure(&pool).await?;
    run_migrations(&pool).await?;

    Ok(pool)
}

/// In-memory database for tests; same schema and pragmas as on disk.
pub async fn open_in_memory() -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    configure(&pool).await?;
    run_migrations(&pool).await?;

    Ok(pool)
}

async fn configure(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(pool)
        .await?;
    Ok(())
}

async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            transaction_hash TEXT NOT NULL UNIQUE,
            fecha_valor TEXT NOT NULL,
            concepto TEXT NOT NULL,
            importe INTEGER NOT NULL CHECK (importe >= 0),
            tipo TEXT NOT NULL,
            category TEXT NOT NULL,
            upload_date TEXT NOT NULL DEFAULT (datetime('now')),
            last_modified TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_transactions_hash ON transactions(transaction_hash)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_transactions_fecha_valor ON transactions(fecha_valor)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category_name TEXT NOT NULL UNIQUE,
            keywords TEXT NOT NULL,
            created_date TEXT NOT NULL DEFAULT (datetime('now')),
            last_modified TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_db_on_disk_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("centimo.db");

        let pool = create_db(&path).await.unwrap();
        sqlx::query("INSERT INTO categories (category_name, keywords) VALUES ('Groceries', '[]')")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;

        // Migrations are idempotent and data survives a reopen.
        let pool = create_db(&path).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn amount_check_constraint_rejects_negative() {
        let pool = open_in_memory().await.unwrap();
        let result = sqlx::query(
            "INSERT INTO transactions (transaction_hash, fecha_valor, concepto, importe, tipo, category)
             VALUES ('h', '2024-01-15', 'X', -1, 'debit', 'uncategorized')",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err());
    }
}
