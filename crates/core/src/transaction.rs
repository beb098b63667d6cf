use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::category::UNCATEGORIZED;
use super::money::Money;

/// Whether money left or entered the account. Stored amounts are always
/// non-negative; the sign of the raw import lives here instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    pub fn from_signed(amount: Money) -> Self {
        if amount.is_negative() {
            Direction::Debit
        } else {
            Direction::Credit
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Debit => "debit",
            Direction::Credit => "credit",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown direction: '{0}'")]
pub struct ParseDirectionError(String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debit" => Ok(Direction::Debit),
            "credit" => Ok(Direction::Credit),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

/// A statement row after normalization, before fingerprinting and storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    pub value_date: NaiveDate,
    pub description: String,
    /// Magnitude only; see `direction` for the sign.
    pub amount: Money,
    pub direction: Direction,
    /// Currency code from the statement, informational only.
    pub currency: Option<String>,
}

/// A stored transaction. Immutable after insert except for `category`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub fingerprint: String,
    pub value_date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub direction: Direction,
    pub category: String,
    pub uploaded_at: String,
    pub last_modified: String,
}

impl Transaction {
    pub fn is_uncategorized(&self) -> bool {
        self.category == UNCATEGORIZED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_from_signed() {
        assert_eq!(
            Direction::from_signed(Money::from_cents(-2550)),
            Direction::Debit
        );
        assert_eq!(
            Direction::from_signed(Money::from_cents(2550)),
            Direction::Credit
        );
        // Zero is not a debit.
        assert_eq!(
            Direction::from_signed(Money::from_cents(0)),
            Direction::Credit
        );
    }

    #[test]
    fn direction_round_trips_through_str() {
        assert_eq!("debit".parse::<Direction>().unwrap(), Direction::Debit);
        assert_eq!("credit".parse::<Direction>().unwrap(), Direction::Credit);
        assert!("Debit".parse::<Direction>().is_err());
    }

    #[test]
    fn is_uncategorized() {
        let tx = Transaction {
            id: 1,
            fingerprint: "f".into(),
            value_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            description: "MERCADONA".into(),
            amount: Money::from_cents(2550),
            direction: Direction::Debit,
            category: UNCATEGORIZED.into(),
            uploaded_at: String::new(),
            last_modified: String::new(),
        };
        assert!(tx.is_uncategorized());
    }
}
