//! Minimal client for the local Ollama inference endpoint.
//!
//! We only call `/api/generate` with `format=json` and `stream=false` and
//! hand the raw reply text to the parser; this module has no knowledge of
//! exercises or verdicts. Calls are instrumented with model name and
//! payload sizes (not contents).

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::AppError;

#[derive(Clone)]
pub struct Ollama {
  client: reqwest::Client,
  base_url: String,
  model: String,
}

impl Ollama {
  /// Build the client from env, falling back to the standard local endpoint.
  ///
  ///   OLLAMA_BASE_URL : default "http://127.0.0.1:11434"
  ///   OLLAMA_MODEL    : default "llama3.2"
  pub fn from_env() -> Result<Self, AppError> {
    let base_url = std::env::var("OLLAMA_BASE_URL")
      .unwrap_or_else(|_| "http://127.0.0.1:11434".into());
    let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(120))
      .build()
      .map_err(|e| AppError::Gateway(format!("client build failed: {e}")))?;

    Ok(Self { client, base_url, model })
  }

  pub fn base_url(&self) -> &str { &self.base_url }
  pub fn model(&self) -> &str { &self.model }

  /// Single synchronous generation round trip. Returns the raw reply text;
  /// the caller is responsible for parsing it. Transport errors and non-2xx
  /// statuses surface as `AppError::Gateway`. Never retried.
  #[instrument(level = "info", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
  pub async fn generate(&self, prompt: &str) -> Result<String, AppError> {
    let url = format!("{}/api/generate", self.base_url);
    let req = GenerateRequest {
      model: self.model.clone(),
      prompt: prompt.to_string(),
      format: "json".into(),
      stream: false,
    };

    let start = std::time::Instant::now();
    let res = self.client.post(&url)
      .header(CONTENT_TYPE, "application/json")
      .json(&req).send().await
      .map_err(|e| AppError::Gateway(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      return Err(AppError::Gateway(format!("Ollama HTTP {}: {}", status, crate::util::trunc_for_log(&body, 200))));
    }

    let body: GenerateResponse = res.json().await
      .map_err(|e| AppError::Gateway(format!("unreadable Ollama envelope: {e}")))?;

    info!(elapsed = ?start.elapsed(), reply_len = body.response.len(), "Ollama reply received");
    Ok(body.response)
  }
}

// --- Wire DTOs ---

#[derive(Serialize)]
struct GenerateRequest {
  model: String,
  prompt: String,
  format: String,
  stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
  response: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn request_matches_the_ollama_wire_shape() {
    let req = GenerateRequest {
      model: "llama3.2".into(),
      prompt: "hi".into(),
      format: "json".into(),
      stream: false,
    };
    let v: serde_json::Value = serde_json::from_str(&serde_json::to_string(&req).unwrap()).unwrap();
    assert_eq!(v["model"], "llama3.2");
    assert_eq!(v["format"], "json");
    assert_eq!(v["stream"], false);
  }

  #[test]
  fn envelope_exposes_only_the_raw_text() {
    let r: GenerateResponse =
      serde_json::from_str(r#"{"response": "{\"title\":\"t\"}", "done": true}"#).unwrap();
    assert_eq!(r.response, r#"{"title":"t"}"#);
  }
}
