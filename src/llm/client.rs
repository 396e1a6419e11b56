//! HTTP client for an Ollama-style `POST /api/generate` endpoint
//!
//! One request per call, no streaming, no retries. The service is asked
//! for JSON output (`format: "json"`) but the reply is still treated as
//! free text by the parser.

use crate::core::config::BridgeConfig;
use crate::core::error::{BridgeError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Something that turns a prompt into raw model text
///
/// The planner only talks to this trait, so tests can swap in a canned reply.
#[allow(async_fn_in_trait)]
pub trait ActionModel {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

impl<M: ActionModel + ?Sized> ActionModel for &M {
    async fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt).await
    }
}

/// Client for a locally hosted generation service
pub struct OllamaClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    /// Create a client with explicit settings
    ///
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(endpoint: String, model: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BridgeError::ModelError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            model,
        })
    }

    /// Create a client from the resolved bridge configuration
    pub fn from_config(config: &BridgeConfig) -> Result<Self> {
        Self::new(config.endpoint.clone(), config.model.clone(), config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
        }
    }
}

impl ActionModel for OllamaClient {
    /// Send the prompt and return the `response` text
    ///
    /// A body without a `response` key yields an empty string.
    async fn generate(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| BridgeError::ModelError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(BridgeError::ModelError(format!(
                "API error {}: {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| BridgeError::ModelError(e.to_string()))?;
        tracing::debug!(body = %body, "Full model response");

        parse_generate_body(&body)
    }
}

/// Ask the model, turning any failure into an empty reply
///
/// The error is logged; the caller sees "no actions" instead of a failure.
pub async fn generate_or_empty<M: ActionModel>(model: &M, prompt: &str) -> String {
    match model.generate(prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Model call failed, continuing with empty reply");
            String::new()
        }
    }
}

fn parse_generate_body(body: &str) -> Result<String> {
    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| BridgeError::ModelError(format!("response is not JSON: {}", e)))?;
    Ok(parsed.response)
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}
