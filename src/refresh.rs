//! The per-cycle refresh workflow: fetch, parse, normalize, swap.
//!
//! Both the periodic timer and the manual trigger run this exact routine.
//! A refresh never fails the process: fetch or decode problems keep the
//! existing snapshot, and the very first failure installs the seed data so
//! there is always something to display.

use crate::errors::{AppError, ResultExt};
use crate::handlers::AppState;
use crate::models::Lead;
use crate::normalizer;
use crate::seed;
use crate::store::SnapshotOrigin;
use chrono::{Local, NaiveDate};
use serde::Serialize;

/// What a refresh trigger ended up doing.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// A fresh sheet snapshot was installed.
    Refreshed {
        leads: usize,
        version: u64,
        fingerprint: String,
    },
    /// Another refresh holds the single-flight slot; this trigger was
    /// rejected, not queued.
    AlreadyRunning,
    /// The fetch or decode failed; the previous snapshot stays visible.
    KeptExisting { reason: String },
    /// The fetch failed with nothing to fall back on; seed data installed.
    Seeded { leads: usize, reason: String },
}

/// Runs one refresh cycle against the shared state.
pub async fn refresh_leads(state: &AppState) -> RefreshOutcome {
    let _guard = match state.store.try_begin_refresh() {
        Some(guard) => guard,
        None => {
            tracing::warn!("Refresh already in flight, rejecting trigger");
            return RefreshOutcome::AlreadyRunning;
        }
    };

    let today = Local::now().date_naive();

    match fetch_and_parse(state, today).await {
        Ok(leads) => {
            let snapshot = state.store.replace(leads, SnapshotOrigin::Sheet);
            tracing::info!(
                "✓ Refreshed {} leads (version {}, fingerprint {})",
                snapshot.leads.len(),
                snapshot.version,
                &snapshot.fingerprint[..12]
            );
            RefreshOutcome::Refreshed {
                leads: snapshot.leads.len(),
                version: snapshot.version,
                fingerprint: snapshot.fingerprint.clone(),
            }
        }
        Err(e) => {
            let reason = e.to_string();
            if state.store.is_empty() {
                let snapshot = state
                    .store
                    .replace(seed::seed_leads(today), SnapshotOrigin::Seed);
                tracing::warn!(
                    "⚠ {}; installed {} seed leads so the dashboard is not empty",
                    reason,
                    snapshot.leads.len()
                );
                RefreshOutcome::Seeded {
                    leads: snapshot.leads.len(),
                    reason,
                }
            } else {
                tracing::warn!("⚠ {}; keeping existing snapshot", reason);
                RefreshOutcome::KeptExisting { reason }
            }
        }
    }
}

async fn fetch_and_parse(state: &AppState, today: NaiveDate) -> Result<Vec<Lead>, AppError> {
    let text = state
        .sheet_client
        .fetch_csv()
        .await
        .context("refreshing lead snapshot")?;

    let leads = normalizer::parse_sheet(&text, today);
    if leads.is_empty() {
        // A header-only (or empty) payload is treated like a fetch failure
        return Err(AppError::ExternalApiError(
            "sheet contained no data rows".to_string(),
        ));
    }

    Ok(leads)
}
