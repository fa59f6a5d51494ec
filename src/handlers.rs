use crate::assistant::AssistantClient;
use crate::config::Config;
use crate::errors::AppError;
use crate::insights;
use crate::metrics;
use crate::models::{
    AssistantRequest, AssistantResponse, MetricsBundle, RankingsBundle, SearchParams,
};
use crate::rankings;
use crate::refresh::{self, RefreshOutcome};
use crate::sheet_client::SheetClient;
use crate::store::LeadStore;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use moka::future::Cache;
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Current lead snapshot plus the single-flight refresh slot.
    pub store: Arc<LeadStore>,
    /// Client for the published sheet CSV.
    pub sheet_client: SheetClient,
    /// Text-generation collaborator (optional; absent without an API key).
    pub assistant_client: Option<AssistantClient>,
    /// Metrics bundles memoized per (snapshot fingerprint, reference date).
    pub metrics_cache: Cache<String, Arc<MetricsBundle>>,
    /// Rankings memoized per snapshot fingerprint.
    pub rankings_cache: Cache<String, Arc<RankingsBundle>>,
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "maple-lead-api",
            "version": "0.1.0"
        })),
    )
}

/// GET /api/v1/leads
///
/// The full normalized lead list plus snapshot metadata. Read-only; the
/// set is replaced wholesale by the refresh cycle, never patched.
pub async fn get_leads(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let snapshot = state.store.snapshot();
    Json(json!({
        "count": snapshot.leads.len(),
        "version": snapshot.version,
        "fingerprint": snapshot.fingerprint,
        "fetched_at": snapshot.fetched_at,
        "origin": snapshot.origin,
        "leads": &*snapshot.leads,
    }))
}

/// GET /api/v1/leads/search?q=
pub async fn search_leads(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<serde_json::Value> {
    let snapshot = state.store.snapshot();
    let hits = insights::search_leads(&snapshot.leads, &params.q);
    Json(json!({
        "count": hits.len(),
        "hits": hits,
    }))
}

/// GET /api/v1/metrics
///
/// Metrics for all four standard windows, memoized per snapshot
/// fingerprint and reference date.
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsBundle> {
    Json((*metrics_bundle(&state).await).clone())
}

/// GET /api/v1/rankings/priority
pub async fn get_priority(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let bundle = rankings_bundle(&state).await;
    Json(json!({ "priority": bundle.priority }))
}

/// GET /api/v1/rankings/leaderboard
pub async fn get_leaderboard(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let bundle = rankings_bundle(&state).await;
    Json(json!({ "leaderboard": bundle.leaderboard }))
}

/// GET /api/v1/insights/aging
pub async fn get_aging(State(state): State<Arc<AppState>>) -> Json<insights::AgingBuckets> {
    let snapshot = state.store.snapshot();
    let today = Local::now().date_naive();
    Json(insights::aging_buckets(&snapshot.leads, today))
}

/// GET /api/v1/insights/leakage
pub async fn get_leakage(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let snapshot = state.store.snapshot();
    let today = Local::now().date_naive();
    let alerts = insights::leakage_alerts(&snapshot.leads, today);
    Json(json!({ "alerts": alerts }))
}

/// GET /api/v1/insights/funnel
pub async fn get_funnel(State(state): State<Arc<AppState>>) -> Json<insights::FunnelStats> {
    let snapshot = state.store.snapshot();
    Json(insights::conversion_funnel(&snapshot.leads))
}

/// POST /api/v1/refresh
///
/// Manual refresh trigger; runs the same workflow as the periodic timer.
/// A trigger while a refresh is in flight is rejected with 409.
pub async fn manual_refresh(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RefreshOutcome>) {
    let outcome = refresh::refresh_leads(&state).await;
    let status = match outcome {
        RefreshOutcome::AlreadyRunning => StatusCode::CONFLICT,
        _ => StatusCode::OK,
    };
    (status, Json(outcome))
}

/// POST /api/v1/assistant
///
/// Proxies a chat turn to the text-generation collaborator with the
/// current metrics snapshot as context. Upstream failures come back as a
/// fallback reply, never as an error.
pub async fn assistant_chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AssistantRequest>,
) -> Result<Json<AssistantResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::BadRequest("message cannot be empty".to_string()));
    }

    let client = state.assistant_client.as_ref().ok_or_else(|| {
        AppError::NotConfigured("assistant is not configured on this deployment".to_string())
    })?;

    let snapshot = state.store.snapshot();
    let bundle = metrics_bundle(&state).await;
    let context = AssistantClient::build_context(&bundle, snapshot.leads.len());

    let reply = client
        .generate_reply(&context, &request.history, &request.message)
        .await;

    Ok(Json(AssistantResponse { reply }))
}

/// Metrics bundle for the current snapshot, computed once per
/// (fingerprint, reference date) and served from cache afterwards.
async fn metrics_bundle(state: &AppState) -> Arc<MetricsBundle> {
    let snapshot = state.store.snapshot();
    let today = Local::now().date_naive();
    let cache_key = format!("{}:{}", snapshot.fingerprint, today);

    if let Some(cached) = state.metrics_cache.get(&cache_key).await {
        tracing::debug!("Metrics cache HIT for snapshot v{}", snapshot.version);
        return cached;
    }

    tracing::debug!("Metrics cache MISS for snapshot v{}", snapshot.version);
    let bundle = Arc::new(metrics::compute_bundle(&snapshot.leads, today));
    state.metrics_cache.insert(cache_key, bundle.clone()).await;
    bundle
}

/// Rankings for the current snapshot, memoized per fingerprint.
async fn rankings_bundle(state: &AppState) -> Arc<RankingsBundle> {
    let snapshot = state.store.snapshot();
    let cache_key = snapshot.fingerprint.clone();

    if let Some(cached) = state.rankings_cache.get(&cache_key).await {
        return cached;
    }

    let bundle = Arc::new(rankings::compute_rankings(&snapshot.leads));
    state
        .rankings_cache
        .insert(cache_key, bundle.clone())
        .await;
    bundle
}
