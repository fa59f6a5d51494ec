use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub sheet_csv_url: String,
    pub port: u16,
    pub refresh_interval_secs: u64,
    pub assistant_api_key: Option<String>,
    pub assistant_base_url: String,
    pub assistant_model: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            sheet_csv_url: std::env::var("SHEET_CSV_URL")
                .map_err(|_| anyhow::anyhow!("SHEET_CSV_URL environment variable required"))
                .and_then(|raw| {
                    if raw.trim().is_empty() {
                        anyhow::bail!("SHEET_CSV_URL cannot be empty");
                    }
                    let parsed = url::Url::parse(&raw)
                        .map_err(|e| anyhow::anyhow!("SHEET_CSV_URL is not a valid URL: {}", e))?;
                    if parsed.scheme() != "http" && parsed.scheme() != "https" {
                        anyhow::bail!("SHEET_CSV_URL must start with http:// or https://");
                    }
                    Ok(raw)
                })?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            refresh_interval_secs: std::env::var("REFRESH_INTERVAL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("REFRESH_INTERVAL_SECS must be a positive number"))
                .and_then(|secs: u64| {
                    if secs == 0 {
                        anyhow::bail!("REFRESH_INTERVAL_SECS must be at least 1");
                    }
                    Ok(secs)
                })?,
            assistant_api_key: std::env::var("ASSISTANT_API_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            assistant_base_url: std::env::var("ASSISTANT_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            assistant_model: std::env::var("ASSISTANT_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!(
            "Sheet CSV URL: {}...",
            &config.sheet_csv_url[..40.min(config.sheet_csv_url.len())]
        );
        tracing::debug!("Refresh interval: {}s", config.refresh_interval_secs);
        tracing::debug!("Server Port: {}", config.port);
        if config.assistant_api_key.is_some() {
            tracing::info!("Assistant configured with model {}", config.assistant_model);
        } else {
            tracing::info!("Assistant disabled (no ASSISTANT_API_KEY)");
        }

        Ok(config)
    }
}
