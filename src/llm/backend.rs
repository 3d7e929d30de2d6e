//! Wire shapes for the supported local model servers
//!
//! Three server families expose three near-identical request/response
//! shapes. One enum normalizes them to a common prompt-in/text-out contract
//! so the client code never branches on the server family.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::SamplingOptions;

/// The wire shape spoken by the configured endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LlmBackend {
    /// Ollama-style `/api/generate`, answer in `response`
    Generate,
    /// OpenAI-compatible `/v1/chat/completions`, answer in
    /// `choices[0].message.content`
    ChatCompletion,
    /// llama.cpp-style `/completion`, answer in `content`
    Completion,
}

impl LlmBackend {
    /// Path of the text-generation endpoint
    pub fn generate_path(&self) -> &'static str {
        match self {
            Self::Generate => "api/generate",
            Self::ChatCompletion => "v1/chat/completions",
            Self::Completion => "completion",
        }
    }

    /// Path probed with a lightweight GET before generating
    pub fn probe_path(&self) -> &'static str {
        match self {
            Self::Generate => "api/tags",
            Self::ChatCompletion => "v1/models",
            Self::Completion => "health",
        }
    }

    /// Build the request body for this wire shape
    pub fn request_body(&self, model: &str, prompt: &str, options: &SamplingOptions) -> Value {
        match self {
            Self::Generate => json!({
                "model": model,
                "prompt": prompt,
                "stream": false,
                "options": {
                    "temperature": options.temperature,
                    "top_p": options.top_p,
                    "num_predict": options.max_tokens,
                },
            }),
            Self::ChatCompletion => json!({
                "model": model,
                "messages": [{ "role": "user", "content": prompt }],
                "stream": false,
                "temperature": options.temperature,
                "top_p": options.top_p,
                "max_tokens": options.max_tokens,
            }),
            Self::Completion => json!({
                "prompt": prompt,
                "temperature": options.temperature,
                "top_p": options.top_p,
                "n_predict": options.max_tokens,
            }),
        }
    }

    /// Pull the answer text out of a response body, if it has one
    pub fn extract_answer(&self, body: &Value) -> Option<String> {
        let text = match self {
            Self::Generate => serde_json::from_value::<GenerateResponse>(body.clone())
                .ok()
                .map(|r| r.response),
            Self::ChatCompletion => serde_json::from_value::<ChatCompletionResponse>(body.clone())
                .ok()
                .and_then(|r| r.choices.into_iter().next())
                .map(|choice| choice.message.content),
            Self::Completion => serde_json::from_value::<CompletionResponse>(body.clone())
                .ok()
                .map(|r| r.content),
        }?;

        let text = text.trim().to_string();
        if text.is_empty() { None } else { Some(text) }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_body_carries_model_prompt_and_options() {
        let body = LlmBackend::Generate.request_body("llama3", "質問", &SamplingOptions::default());
        assert_eq!(body["model"], "llama3");
        assert_eq!(body["prompt"], "質問");
        assert_eq!(body["stream"], false);
        assert!(body["options"]["temperature"].is_number());
    }

    #[test]
    fn each_backend_extracts_its_own_shape() {
        let generate = json!({ "response": "答えです" });
        assert_eq!(
            LlmBackend::Generate.extract_answer(&generate).as_deref(),
            Some("答えです")
        );

        let chat = json!({
            "choices": [{ "message": { "role": "assistant", "content": "チャット回答" } }]
        });
        assert_eq!(
            LlmBackend::ChatCompletion.extract_answer(&chat).as_deref(),
            Some("チャット回答")
        );

        let completion = json!({ "content": "補完回答" });
        assert_eq!(
            LlmBackend::Completion
                .extract_answer(&completion)
                .as_deref(),
            Some("補完回答")
        );
    }

    #[test]
    fn foreign_or_empty_shapes_extract_nothing() {
        let chat_shape = json!({ "choices": [{ "message": { "content": "x" } }] });
        assert!(LlmBackend::Generate.extract_answer(&chat_shape).is_none());

        let blank = json!({ "response": "   " });
        assert!(LlmBackend::Generate.extract_answer(&blank).is_none());

        let empty_choices = json!({ "choices": [] });
        assert!(
            LlmBackend::ChatCompletion
                .extract_answer(&empty_choices)
                .is_none()
        );
    }
}
