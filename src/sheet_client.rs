use crate::config::Config;
use crate::errors::AppError;
use reqwest::header::{CACHE_CONTROL, PRAGMA};

/// Client for the published spreadsheet CSV export.
#[derive(Clone)]
pub struct SheetClient {
    client: reqwest::Client,
    csv_url: String,
}

impl SheetClient {
    /// Creates a client for the configured sheet URL.
    ///
    /// No request timeout is set: a hanging fetch ties up that refresh
    /// cycle only, and the next timer tick starts a fresh one.
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            csv_url: config.sheet_csv_url.clone(),
        }
    }

    /// Fetches the current CSV snapshot as UTF-8 text, caching disabled.
    pub async fn fetch_csv(&self) -> Result<String, AppError> {
        tracing::debug!("Fetching lead sheet CSV");

        let response = self
            .client
            .get(&self.csv_url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Sheet request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Sheet returned error {}: {}", status, error_text);
            return Err(AppError::ExternalApiError(format!(
                "Sheet returned status {}: {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Failed to read sheet body: {}", e)))?;

        tracing::debug!("Fetched {} bytes of sheet CSV", body.len());
        Ok(body)
    }
}
