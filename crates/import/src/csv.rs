use centimo_core::{Direction, Money, NormalizedTransaction};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Read;
use std::str::FromStr;
use thiserror::Error;

/// Required statement columns, matched against trimmed header names.
pub const DATE_COLUMN: &str = "Fecha valor";
pub const DESCRIPTION_COLUMN: &str = "Concepto";
pub const AMOUNT_COLUMN: &str = "Importe";
/// Optional currency code column, informational only.
pub const CURRENCY_COLUMN: &str = "Divisa";

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
}

/// A row the parser skipped, with enough context for the import summary.
#[derive(Debug, Clone, Serialize)]
pub struct MalformedRow {
    pub line: u64,
    pub reason: String,
}

#[derive(Debug)]
pub struct ParsedStatement {
    pub rows: Vec<NormalizedTransaction>,
    pub malformed: Vec<MalformedRow>,
}

struct ColumnIndex {
    date: usize,
    description: usize,
    amount: usize,
    currency: Option<usize>,
}

/// Parse a bank statement export into normalized transactions.
///
/// Malformed rows are collected, not fatal; only structural problems (unreadable
/// input, missing headers) surface as `CsvError`. A header-only statement parses
/// to zero rows.
pub fn parse_statement<R: Read>(data: R) -> Result<ParsedStatement, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let columns = resolve_columns(&headers)?;

    let mut rows = Vec::new();
    let mut malformed = Vec::new();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                malformed.push(MalformedRow {
                    line,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or_default();
        match normalize_record(&record, &columns) {
            Ok(tx) => rows.push(tx),
            Err(reason) => malformed.push(MalformedRow { line, reason }),
        }
    }

    Ok(ParsedStatement { rows, malformed })
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<ColumnIndex, CsvError> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    Ok(ColumnIndex {
        date: find(DATE_COLUMN).ok_or(CsvError::MissingColumn(DATE_COLUMN))?,
        description: find(DESCRIPTION_COLUMN).ok_or(CsvError::MissingColumn(DESCRIPTION_COLUMN))?,
        amount: find(AMOUNT_COLUMN).ok_or(CsvError::MissingColumn(AMOUNT_COLUMN))?,
        currency: find(CURRENCY_COLUMN),
    })
}

fn normalize_record(
    record: &csv::StringRecord,
    columns: &ColumnIndex,
) -> Result<NormalizedTransaction, String> {
    let date_field = record.get(columns.date).unwrap_or_default();
    let value_date = parse_date(date_field)?;

    let description = record
        .get(columns.description)
        .unwrap_or_default()
        .trim()
        .to_string();
    if description.is_empty() {
        return Err("empty description".to_string());
    }

    let amount_field = record.get(columns.amount).unwrap_or_default();
    let signed = parse_amount(amount_field)?;

    let currency = columns
        .currency
        .and_then(|col| record.get(col))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(NormalizedTransaction {
        value_date,
        description,
        amount: signed.abs(),
        direction: Direction::from_signed(signed),
        currency,
    })
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();

    // Day-first ordering, four- or two-digit years.
    for fmt in &["%d/%m/%Y", "%d/%m/%y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(format!("invalid date: '{s}'"))
}

/// Parse a locale-formatted amount ("−1.234,56 €") into a signed value.
/// The dot is always a thousands separator in this format, never a decimal point.
pub(crate) fn parse_amount(s: &str) -> Result<Money, String> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter_map(|c| match c {
            '\u{2212}' => Some('-'),
            ',' => Some('.'),
            '.' | '€' | ' ' | '\u{a0}' => None,
            other => Some(other),
        })
        .collect();

    let dec = Decimal::from_str(&cleaned).map_err(|_| format!("invalid amount: '{}'", s.trim()))?;
    let money = Money::from_decimal(dec);
    // Decimal parses magnitudes far beyond what fits in i64 cents; reject them
    // here so downstream cents conversion stays infallible.
    if money.checked_to_cents().is_none() {
        return Err(format!("amount out of range: '{}'", s.trim()));
    }
    Ok(money)
}
