pub mod category;
pub mod money;
pub mod period;
pub mod transaction;

pub use category::{Category, UNCATEGORIZED};
pub use money::Money;
pub use period::{DateRange, Month};
pub use transaction::{Direction, NormalizedTransaction, Transaction};
