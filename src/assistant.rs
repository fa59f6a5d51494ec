//! External text-generation collaborator.
//!
//! The assistant receives a pre-formatted context string with the current
//! metrics snapshot plus the conversation history and returns free text.
//! Failures of any kind surface as a fixed fallback reply, never as an
//! error response.

use crate::config::Config;
use crate::errors::AppError;
use crate::models::{ChatMessage, MetricsBundle};
use serde_json::{json, Value};
use std::time::Duration;

/// Reply used whenever the upstream call fails or returns an unusable
/// shape.
pub const FALLBACK_REPLY: &str =
    "The assistant is temporarily unavailable. Your conversation is saved - please try again.";

#[derive(Clone)]
pub struct AssistantClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl AssistantClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create assistant client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url,
            api_key,
            model,
        })
    }

    /// Builds a client from config, or `None` when no API key is set.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.assistant_api_key.clone()?;
        match Self::new(
            config.assistant_base_url.clone(),
            api_key,
            config.assistant_model.clone(),
        ) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::error!("Failed to initialize assistant client: {}", e);
                None
            }
        }
    }

    /// Formats the metrics snapshot into the context string the model sees.
    pub fn build_context(bundle: &MetricsBundle, total_leads: usize) -> String {
        format!(
            "SALES PERFORMANCE DATA (REAL-TIME):\n\
             TODAY:\n\
             - Social Media: {}\n\
             - Walk-ins: {}\n\
             - Reference: {}\n\
             - Broker: {}\n\
             - Total Leads: {}\n\
             - Site Visits: {}\n\
             - Ratio: {:.1}%\n\
             \n\
             MTD:\n\
             - Total Leads: {}\n\
             - Site Visits: {}\n\
             - Ratio: {:.1}%\n\
             \n\
             DATABASE TOTAL: {} leads\n\
             \n\
             INSTRUCTIONS:\n\
             1. Use EXACT numbers from the data above.\n\
             2. Provide expert sales analysis.\n\
             3. Identify conversion leaks and suggest concrete follow-up tactics.",
            bundle.today.social_media,
            bundle.today.walkins,
            bundle.today.reference,
            bundle.today.broker,
            bundle.today.total_leads,
            bundle.today.site_visits,
            bundle.today.ratio,
            bundle.mtd.total_leads,
            bundle.mtd.site_visits,
            bundle.mtd.ratio,
            total_leads,
        )
    }

    /// Sends context + history + user message upstream and returns the
    /// reply text. Never fails: transport errors, bad statuses, and
    /// unexpected response shapes all yield the fallback reply.
    pub async fn generate_reply(
        &self,
        context: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> String {
        let mut contents = vec![json!({
            "role": "user",
            "parts": [{ "text": context }],
        })];
        for turn in history {
            let role = if turn.role == "model" { "model" } else { "user" };
            contents.push(json!({
                "role": role,
                "parts": [{ "text": turn.text }],
            }));
        }
        contents.push(json!({
            "role": "user",
            "parts": [{ "text": message }],
        }));

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = match self
            .client
            .post(&url)
            .json(&json!({ "contents": contents }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Assistant request failed: {}", e);
                return FALLBACK_REPLY.to_string();
            }
        };

        if !response.status().is_success() {
            tracing::warn!("Assistant returned status {}", response.status());
            return FALLBACK_REPLY.to_string();
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to parse assistant response: {}", e);
                return FALLBACK_REPLY.to_string();
            }
        };

        body.get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.pointer("/content/parts/0/text"))
            .and_then(|t| t.as_str())
            .map(|t| t.to_string())
            .unwrap_or_else(|| {
                tracing::warn!("Assistant response had no text candidate");
                FALLBACK_REPLY.to_string()
            })
    }
}
