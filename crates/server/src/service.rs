use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use centimo_import::{fingerprint_of, parse_statement, CsvError, KeywordEngine, MalformedRow};
use centimo_storage::{
    get_category, get_transaction, insert_transaction, list_categories, list_uncategorized,
    transaction_exists, update_category, update_category_by_description, upsert_category, DbPool,
    StoreError,
};
use centimo_suggest::{SuggestError, SuggestionClient};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Csv(#[from] CsvError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of one CSV import. Per-row problems are counted, never fatal.
#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub inserted: usize,
    pub duplicates: usize,
    pub malformed: usize,
    pub malformed_rows: Vec<MalformedRow>,
}

/// Run a statement through normalize → fingerprint → dedup → categorize → store.
///
/// Categorization uses the keyword table as of the start of the batch; only
/// structural failures (unreadable CSV, store down) abort the import.
pub async fn import_statement(pool: &DbPool, data: &[u8]) -> Result<ImportSummary, ServiceError> {
    let parsed = parse_statement(data)?;
    let categories = list_categories(pool).await?;
    let engine = KeywordEngine::new(&categories);

    let mut inserted = 0usize;
    let mut duplicates = 0usize;

    for row in &parsed.rows {
        let fingerprint = fingerprint_of(row);
        if transaction_exists(pool, &fingerprint).await? {
            duplicates += 1;
            continue;
        }

        let category = engine.categorize(&row.description);
        match insert_transaction(pool, &fingerprint, row, category).await {
            Ok(_) => inserted += 1,
            // The unique index catches what the pre-check missed.
            Err(e) if e.is_duplicate() => duplicates += 1,
            Err(e) => return Err(e.into()),
        }
    }

    let summary = ImportSummary {
        inserted,
        duplicates,
        malformed: parsed.malformed.len(),
        malformed_rows: parsed.malformed,
    };
    info!(
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        malformed = summary.malformed,
        "statement imported"
    );
    Ok(summary)
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SuggestionOutcome {
    Accepted { category: String, confidence: f64 },
    BelowThreshold { confidence: f64 },
    Unavailable { reason: String },
}

#[derive(Debug, Serialize)]
pub struct SuggestionReport {
    pub transaction_id: i64,
    pub description: String,
    pub outcome: SuggestionOutcome,
}

/// Ask the suggestion client about every uncategorized transaction.
///
/// A suggestion is applied only above `threshold`; if its category does not
/// exist yet it is created, seeded with whatever keyword hints came back.
/// Client failures and timeouts are reported per row and the batch continues.
pub async fn categorize_uncategorized<C: SuggestionClient>(
    pool: &DbPool,
    client: &C,
    threshold: f64,
) -> Result<Vec<SuggestionReport>, ServiceError> {
    let pending = list_uncategorized(pool).await?;
    let mut reports = Vec::with_capacity(pending.len());

    for tx in pending {
        let outcome = match client.suggest(&tx.description).await {
            Ok(s) if s.confidence > threshold => {
                if get_category(pool, &s.category).await?.is_none() {
                    upsert_category(pool, &s.category, &s.keywords).await?;
                }
                update_category(pool, tx.id, &s.category).await?;
                SuggestionOutcome::Accepted {
                    category: s.category,
                    confidence: s.confidence,
                }
            }
            Ok(s) => SuggestionOutcome::BelowThreshold {
                confidence: s.confidence,
            },
            Err(e) => {
                warn!(transaction_id = tx.id, "suggestion failed: {e}");
                SuggestionOutcome::Unavailable {
                    reason: suggest_failure_reason(&e),
                }
            }
        };
        reports.push(SuggestionReport {
            transaction_id: tx.id,
            description: tx.description,
            outcome,
        });
    }

    let accepted = reports
        .iter()
        .filter(|r| matches!(r.outcome, SuggestionOutcome::Accepted { .. }))
        .count();
    info!(total = reports.len(), accepted, "AI categorization finished");
    Ok(reports)
}

fn suggest_failure_reason(err: &SuggestError) -> String {
    match err {
        SuggestError::Http(e) if e.is_timeout() => "timed out".to_string(),
        other => other.to_string(),
    }
}

/// Manual category override for one transaction, or for every transaction that
/// shares its description. Returns the number of rows updated. The keyword
/// table is left untouched either way.
pub async fn override_category(
    pool: &DbPool,
    transaction_id: i64,
    new_category: &str,
    apply_to_matching: bool,
) -> Result<u64, ServiceError> {
    let tx = get_transaction(pool, transaction_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("transaction {transaction_id}")))?;

    if apply_to_matching {
        let updated = update_category_by_description(pool, &tx.description, new_category).await?;
        Ok(updated)
    } else {
        update_category(pool, transaction_id, new_category).await?;
        Ok(1)
    }
}
