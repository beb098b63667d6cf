use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use centimo_core::{Category, Month, Transaction};
use centimo_storage::{
    append_keyword, database_stats, list_categories, list_transactions, monthly_summary,
    upsert_category, DatabaseStats, Summary, TransactionFilter,
};

use crate::error::ApiError;
use crate::service;
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/import", post(import_statement))
        .route("/transactions", get(get_transactions))
        .route("/transactions/{id}/category", patch(patch_category))
        .route("/categories", get(get_categories))
        .route("/categories/{name}", put(put_category))
        .route("/categories/{name}/keywords", post(post_keyword))
        .route("/categorize/ai", post(run_ai_categorization))
        .route("/summary", get(get_summary))
        .route("/stats", get(get_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn import_statement(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<service::ImportSummary>, ApiError> {
    let summary = service::import_statement(&state.db, &body).await?;
    Ok(Json(summary))
}

#[derive(Deserialize)]
struct ListParams {
    year: Option<i32>,
    month: Option<u32>,
    search: Option<String>,
}

/// `year` and `month` come as a pair or not at all.
fn month_param(year: Option<i32>, month: Option<u32>) -> Result<Option<Month>, ApiError> {
    match (year, month) {
        (None, None) => Ok(None),
        (Some(y), Some(m)) => Month::new(y, m)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("invalid month: {y}-{m}"))),
        _ => Err(ApiError::BadRequest(
            "year and month must be given together".to_string(),
        )),
    }
}

async fn get_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let filter = TransactionFilter {
        month: month_param(params.year, params.month)?,
        search: params.search,
    };
    let transactions = list_transactions(&state.db, &filter).await?;
    Ok(Json(transactions))
}

#[derive(Deserialize)]
struct CategoryPatch {
    category: String,
    #[serde(default)]
    apply_to_matching: bool,
}

async fn patch_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<CategoryPatch>,
) -> Result<Json<Value>, ApiError> {
    let category = body.category.trim();
    if category.is_empty() {
        return Err(ApiError::BadRequest("category must not be blank".to_string()));
    }
    let updated =
        service::override_category(&state.db, id, category, body.apply_to_matching).await?;
    Ok(Json(json!({ "updated": updated })))
}

async fn get_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = list_categories(&state.db).await?;
    Ok(Json(categories))
}

#[derive(Deserialize)]
struct CategoryPut {
    keywords: Vec<String>,
}

async fn put_category(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(body): Json<CategoryPut>,
) -> Result<Json<Value>, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("category name must not be blank".to_string()));
    }
    upsert_category(&state.db, name, &body.keywords).await?;
    Ok(Json(json!({ "ok": true })))
}

#[derive(Deserialize)]
struct KeywordPost {
    keyword: String,
}

async fn post_keyword(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(body): Json<KeywordPost>,
) -> Result<Json<Value>, ApiError> {
    if body.keyword.trim().is_empty() {
        return Err(ApiError::BadRequest("keyword must not be blank".to_string()));
    }
    let added = append_keyword(&state.db, &name, &body.keyword).await?;
    Ok(Json(json!({ "added": added })))
}

async fn run_ai_categorization(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<service::SuggestionReport>>, ApiError> {
    let client = state
        .suggester
        .as_ref()
        .ok_or_else(|| ApiError::Unavailable("no API key configured".to_string()))?;
    let reports =
        service::categorize_uncategorized(&state.db, client, state.confidence_threshold).await?;
    Ok(Json(reports))
}

#[derive(Deserialize)]
struct SummaryParams {
    year: Option<i32>,
    month: Option<u32>,
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<Summary>, ApiError> {
    let month = month_param(params.year, params.month)?;
    let summary = monthly_summary(&state.db, month).await?;
    Ok(Json(summary))
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<DatabaseStats>, ApiError> {
    let stats = database_stats(&state.db).await?;
    Ok(Json(stats))
}
