use axum::{
    routing::{get, post},
    Router,
};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use maple_lead_api::assistant::AssistantClient;
use maple_lead_api::config::Config;
use maple_lead_api::handlers::{self, AppState};
use maple_lead_api::refresh;
use maple_lead_api::sheet_client::SheetClient;
use maple_lead_api::store::LeadStore;

/// Main entry point for the application.
///
/// Initializes logging, configuration, the snapshot store and derived
/// caches, starts the background refresh loop, and serves the HTTP API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maple_lead_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Metrics bundles keyed by (snapshot fingerprint, date). New data gets
    // a new key; the TTL only bounds memory for dead keys.
    let metrics_cache = Cache::builder()
        .time_to_live(Duration::from_secs(300))
        .max_capacity(64)
        .build();
    tracing::info!("Metrics cache initialized");

    // Rankings keyed by snapshot fingerprint, same invalidation scheme
    let rankings_cache = Cache::builder()
        .time_to_live(Duration::from_secs(300))
        .max_capacity(64)
        .build();
    tracing::info!("Rankings cache initialized");

    let sheet_client = SheetClient::new(&config);
    tracing::info!("✓ Sheet client initialized");

    let assistant_client = AssistantClient::from_config(&config);
    if assistant_client.is_some() {
        tracing::info!("✓ Assistant client initialized: {}", config.assistant_model);
    }

    // Build application state
    let app_state = Arc::new(AppState {
        config: config.clone(),
        store: Arc::new(LeadStore::new()),
        sheet_client,
        assistant_client,
        metrics_cache,
        rankings_cache,
    });

    // Background refresh loop. The first tick fires immediately, so the
    // initial load and the periodic refresh share one code path; failures
    // degrade to stale or seed data inside the workflow.
    let refresh_state = app_state.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(
            refresh_state.config.refresh_interval_secs,
        ));
        loop {
            ticker.tick().await;
            let outcome = refresh::refresh_leads(&refresh_state).await;
            tracing::debug!("Refresh cycle finished: {:?}", outcome);
        }
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        .route("/api/v1/leads", get(handlers::get_leads))
        .route("/api/v1/leads/search", get(handlers::search_leads))
        .route("/api/v1/metrics", get(handlers::get_metrics))
        .route("/api/v1/rankings/priority", get(handlers::get_priority))
        .route(
            "/api/v1/rankings/leaderboard",
            get(handlers::get_leaderboard),
        )
        .route("/api/v1/insights/aging", get(handlers::get_aging))
        .route("/api/v1/insights/leakage", get(handlers::get_leakage))
        .route("/api/v1/insights/funnel", get(handlers::get_funnel))
        .route("/api/v1/refresh", post(handlers::manual_refresh))
        .route("/api/v1/assistant", post(handlers::assistant_chat))
        .layer(
            ServiceBuilder::new()
                // Request size limit: 1MB max payload (assistant chat is the
                // only body-bearing route)
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
