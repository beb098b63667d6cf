pub mod categories;
pub mod db;
pub mod error;
pub mod summary;
pub mod transactions;

pub use categories::{append_keyword, get_category, list_categories, upsert_category};
pub use db::{create_db, open_in_memory, DbPool};
pub use error::StoreError;
pub use summary::{database_stats, monthly_summary, CategoryTotal, DatabaseStats, Summary};
pub use transactions::{
    get_transaction, insert_transaction, list_transactions, list_uncategorized,
    transaction_exists, update_category, update_category_by_description, TransactionFilter,
};
