//! # Local Model Bridge
//!
//! This module talks to a locally hosted language-model server (Ollama,
//! LM Studio, llama.cpp and compatible APIs) over plain HTTP. The bridge is
//! deliberately thin: one reachability probe, one generate call, one attempt
//! per user message. Every failure mode (timeout, refused connection,
//! non-success status, unusable response body) surfaces as an error value so
//! the chat flow can fall back to the knowledge base.

mod backend;

pub use backend::LlmBackend;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{Error, Result};

/// Default request deadline in milliseconds
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Sampling options forwarded to the model server
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingOptions {
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling cutoff
    pub top_p: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: 500,
        }
    }
}

/// Configuration for the local model bridge
///
/// Persisted as one settings blob; unknown or missing fields fall back to
/// these defaults when the blob is read back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Whether external answering is attempted at all
    pub enabled: bool,
    /// Base URL of the model server
    pub endpoint: String,
    /// Model name passed through to the server
    pub model: String,
    /// Wire shape the server speaks
    pub backend: LlmBackend,
    /// Request deadline in milliseconds
    pub timeout_ms: u64,
    /// Whether a failed call falls back to the knowledge base
    pub fallback_on_failure: bool,
    /// Sampling options
    pub options: SamplingOptions,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            backend: LlmBackend::Generate,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            fallback_on_failure: true,
            options: SamplingOptions::default(),
        }
    }
}

/// HTTP client for the configured model server
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Create a client for the given configuration
    pub fn new(config: LlmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { config, http })
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        let base = format!("{}/", self.config.endpoint.trim_end_matches('/'));
        let base = Url::parse(&base)
            .map_err(|e| Error::Other(format!("Invalid endpoint URL: {e}")))?;
        base.join(path)
            .map_err(|e| Error::Other(format!("Invalid endpoint path: {e}")))
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_ms: self.config.timeout_ms,
            }
        } else {
            Error::Http(err)
        }
    }

    /// Lightweight reachability check against the server's listing path
    #[instrument(skip(self), level = "debug")]
    pub async fn probe(&self) -> Result<()> {
        let url = self.build_url(self.config.backend.probe_path())?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Endpoint {
                status_code: status.as_u16(),
                message: "reachability probe failed".to_string(),
            })
        }
    }

    /// Ask the model server a question
    ///
    /// Probes the server first, then issues a single generate request. There
    /// is no retry; any failure is reported to the caller, who decides
    /// whether to fall back to the deterministic responder.
    #[instrument(skip(self, context_hint), level = "debug")]
    pub async fn ask(&self, question: &str, context_hint: &str) -> Result<String> {
        if !self.config.enabled {
            return Err(Error::Disabled);
        }

        self.probe().await?;

        let prompt = compose_prompt(question, context_hint);
        let body =
            self.config
                .backend
                .request_body(&self.config.model, &prompt, &self.config.options);
        let url = self.build_url(self.config.backend.generate_path())?;

        debug!("Sending generate request to {}", url);
        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            warn!("Model server returned {}: {}", status, text);
            return Err(Error::Endpoint {
                status_code: status.as_u16(),
                message: text,
            });
        }

        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| Error::UnexpectedResponse(format!("Response is not JSON: {e}")))?;

        self.config
            .backend
            .extract_answer(&value)
            .ok_or_else(|| Error::UnexpectedResponse("Response carries no answer text".to_string()))
    }
}

/// Build the prompt sent to the model server
fn compose_prompt(question: &str, context_hint: &str) -> String {
    if context_hint.trim().is_empty() {
        format!("質問: {question}\n\n日本語で簡潔に回答してください。")
    } else {
        format!("{context_hint}\n\n質問: {question}\n\n日本語で簡潔に回答してください。")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn client(server_url: &str, backend: LlmBackend) -> LlmClient {
        let config = LlmConfig {
            enabled: true,
            endpoint: server_url.to_string(),
            backend,
            ..LlmConfig::default()
        };
        LlmClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn ask_probes_then_generates() {
        let mut server = Server::new_async().await;
        let probe = server
            .mock("GET", "/api/tags")
            .with_status(200)
            .with_body("{\"models\": []}")
            .expect(1)
            .create_async()
            .await;
        let generate = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{\"response\": \"ChromeDriver は Chrome を操作します\"}")
            .expect(1)
            .create_async()
            .await;

        let client = client(&server.url(), LlmBackend::Generate);
        let answer = client.ask("ChromeDriver とは", "").await.unwrap();
        assert_eq!(answer, "ChromeDriver は Chrome を操作します");

        probe.assert_async().await;
        generate.assert_async().await;
    }

    #[tokio::test]
    async fn chat_completion_shape_is_normalized() {
        let mut server = Server::new_async().await;
        let _probe = server
            .mock("GET", "/v1/models")
            .with_status(200)
            .with_body("{\"data\": []}")
            .create_async()
            .await;
        let _generate = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body("{\"choices\": [{\"message\": {\"role\": \"assistant\", \"content\": \"回答\"}}]}")
            .create_async()
            .await;

        let client = client(&server.url(), LlmBackend::ChatCompletion);
        assert_eq!(client.ask("質問", "ヒント").await.unwrap(), "回答");
    }

    #[tokio::test]
    async fn failed_probe_skips_the_generate_call() {
        let mut server = Server::new_async().await;
        let probe = server
            .mock("GET", "/api/tags")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;
        let generate = server
            .mock("POST", "/api/generate")
            .expect(0)
            .create_async()
            .await;

        let client = client(&server.url(), LlmBackend::Generate);
        let result = client.ask("質問", "").await;
        assert!(matches!(result, Err(Error::Endpoint { .. })));

        probe.assert_async().await;
        generate.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_an_error_value() {
        let mut server = Server::new_async().await;
        let _probe = server
            .mock("GET", "/api/tags")
            .with_status(200)
            .create_async()
            .await;
        let _generate = server
            .mock("POST", "/api/generate")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let client = client(&server.url(), LlmBackend::Generate);
        match client.ask("質問", "").await {
            Err(Error::Endpoint { status_code, .. }) => assert_eq!(status_code, 503),
            other => panic!("expected endpoint error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_an_error_value() {
        let mut server = Server::new_async().await;
        let _probe = server
            .mock("GET", "/api/tags")
            .with_status(200)
            .create_async()
            .await;
        let _generate = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_body("{\"unexpected\": true}")
            .create_async()
            .await;

        let client = client(&server.url(), LlmBackend::Generate);
        assert!(matches!(
            client.ask("質問", "").await,
            Err(Error::UnexpectedResponse(_))
        ));
    }

    #[tokio::test]
    async fn disabled_config_never_touches_the_network() {
        let client = LlmClient::new(LlmConfig::default()).unwrap();
        assert!(matches!(
            client.ask("質問", "").await,
            Err(Error::Disabled)
        ));
    }
}
