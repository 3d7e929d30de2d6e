//! The end-to-end chat answer flow
//!
//! Composes the local model bridge with the knowledge-base responder. With
//! the bridge enabled the external model is asked first; on any failure the
//! flow falls back to the deterministic responder (when configured to), so a
//! question always produces a non-empty answer.

use tracing::{debug, warn};

use crate::error::Result;
use crate::kb::KnowledgeBase;
use crate::llm::{LlmClient, LlmConfig};

/// Fixed notice returned when the bridge fails and fallback is disabled
pub const UNAVAILABLE_NOTICE: &str =
    "外部モデルから回答を取得できませんでした。時間をおいて再送信してください。";

/// A chat session answering questions about the documentation
pub struct ChatSession {
    kb: KnowledgeBase,
    client: Option<LlmClient>,
}

impl ChatSession {
    /// Create a session from a knowledge base and bridge configuration
    ///
    /// A disabled configuration skips the bridge entirely; every answer then
    /// comes from the knowledge base.
    pub fn new(kb: KnowledgeBase, config: LlmConfig) -> Result<Self> {
        let client = if config.enabled {
            Some(LlmClient::new(config)?)
        } else {
            None
        };
        Ok(Self { kb, client })
    }

    /// The session's knowledge base
    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Whether answers are attempted through the external bridge first
    pub fn uses_external_model(&self) -> bool {
        self.client.is_some()
    }

    /// Answer a question
    ///
    /// This never fails: bridge errors are logged and resolved to either the
    /// knowledge-base answer or a fixed notice, depending on configuration.
    pub async fn answer(&self, question: &str) -> String {
        let Some(client) = &self.client else {
            return self.kb.respond(question);
        };

        match client.ask(question, &self.kb.context_hint()).await {
            Ok(answer) => {
                debug!("Answered through the external model");
                answer
            }
            Err(err) => {
                warn!("External answer failed: {err}");
                if client.config().fallback_on_failure {
                    self.kb.respond(question)
                } else {
                    UNAVAILABLE_NOTICE.to_string()
                }
            }
        }
    }
}
