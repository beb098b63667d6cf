use centimo_core::{Money, NormalizedTransaction};
use chrono::NaiveDate;
use sha2::{Digest, Sha256};

/// Deterministic digest over (date, description, magnitude) used for duplicate
/// detection across re-imports. The description enters the hash verbatim after
/// trimming, so case differences yield distinct fingerprints.
pub fn fingerprint(value_date: NaiveDate, description: &str, amount: Money) -> String {
    let input = format!(
        "{}|{}|{:.2}",
        value_date.format("%Y-%m-%d"),
        description.trim(),
        amount.abs().as_decimal()
    );
    hex::encode(Sha256::digest(input.as_bytes()))
}

pub fn fingerprint_of(tx: &NormalizedTransaction) -> String {
    fingerprint(tx.value_date, &tx.description, tx.amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let a = fingerprint(date(2024, 1, 15), "MERCADONA", Money::from_cents(2550));
        let b = fingerprint(date(2024, 1, 15), "MERCADONA", Money::from_cents(2550));
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn fingerprint_is_case_sensitive_on_description() {
        // Re-exports that change description case must not dedup against the
        // original rows; the hash input is the raw (trimmed) text.
        let upper = fingerprint(date(2024, 1, 15), "MERCADONA", Money::from_cents(2550));
        let mixed = fingerprint(date(2024, 1, 15), "Mercadona", Money::from_cents(2550));
        assert_ne!(upper, mixed);
    }

    #[test]
    fn fingerprint_trims_description() {
        let padded = fingerprint(date(2024, 1, 15), "  MERCADONA ", Money::from_cents(2550));
        let plain = fingerprint(date(2024, 1, 15), "MERCADONA", Money::from_cents(2550));
        assert_eq!(padded, plain);
    }

    #[test]
    fn fingerprint_ignores_sign() {
        // Magnitude goes into the hash; sign lives in the direction field.
        let neg = fingerprint(date(2024, 1, 15), "MERCADONA", Money::from_cents(-2550));
        let pos = fingerprint(date(2024, 1, 15), "MERCADONA", Money::from_cents(2550));
        assert_eq!(neg, pos);
    }

    #[test]
    fn fingerprint_varies_with_each_field() {
        let base = fingerprint(date(2024, 1, 15), "MERCADONA", Money::from_cents(2550));
        assert_ne!(
            base,
            fingerprint(date(2024, 1, 16), "MERCADONA", Money::from_cents(2550))
        );
        assert_ne!(
            base,
            fingerprint(date(2024, 1, 15), "CARREFOUR", Money::from_cents(2550))
        );
        assert_ne!(
            base,
            fingerprint(date(2024, 1, 15), "MERCADONA", Money::from_cents(2551))
        );
    }
}
