pub mod categorize;
pub mod csv;
pub mod fingerprint;

pub use categorize::KeywordEngine;
pub use csv::{parse_statement, CsvError, MalformedRow, ParsedStatement};
pub use fingerprint::{fingerprint, fingerprint_of};
