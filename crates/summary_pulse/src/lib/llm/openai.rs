use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{remote_error_message, SummaryError},
    llm::send_cancellable,
    parser,
    types::{Summary, Transcript},
    Summarizer,
};

/// Knobs for a chat completion request.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the service for `response_format: json_object`
    pub structured_output: bool,
    /// Structure free-text responses instead of failing on them
    pub allow_fallback: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: "deepseek-chat".into(),
            temperature: 0.3,
            max_tokens: 2048,
            structured_output: true,
            allow_fallback: true,
        }
    }
}

/// Client for any OpenAI-compatible chat completions API (DeepSeek by
/// default).
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
    options: CompletionOptions,
}

impl OpenAIClient {
    const SYSTEM_PROMPT: &str = include_str!("./prompts/system_0.txt");

    pub const MAX_KEY_POINTS: usize = 5;
    pub const MAX_TOPICS: usize = 3;

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.deepseek.com".into(),
            options: CompletionOptions::default(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    fn user_prompt(transcript: &str) -> String {
        format!(
            "Analyze the following video transcript. Include at most {} key points and at most {} topics.\n\nTranscript:\n{}",
            Self::MAX_KEY_POINTS,
            Self::MAX_TOPICS,
            transcript
        )
    }

    fn completion_body(&self, user_content: String) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.options.model,
            "messages": [
                {
                    "role": "system",
                    "content": Self::SYSTEM_PROMPT
                },
                {
                    "role": "user",
                    "content": user_content
                }
            ],
            "temperature": self.options.temperature,
            "max_tokens": self.options.max_tokens,
            "stream": false
        });

        if self.options.structured_output {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        body
    }

    /// Posts one chat completion and returns the generated text.
    pub async fn send_completion_request(
        &self,
        user_content: impl Into<String>,
        cancel: &CancellationToken,
    ) -> Result<String, SummaryError> {
        let request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.completion_body(user_content.into()));

        let (status, body) = send_cancellable(request, cancel)
            .await
            .ok_or(SummaryError::Cancelled)??;

        if !status.is_success() {
            let message = remote_error_message(&body);
            tracing::error!(
                status = status.as_u16(),
                message = ?message,
                "Completion service returned an error"
            );
            return Err(SummaryError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let response = serde_json::from_str::<CompletionResponse>(&body)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to decode completion response"))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(SummaryError::MissingContent)
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub content: Option<String>,
}

impl Summarizer for OpenAIClient {
    const SERVICE: &'static str = "chat-completions";

    async fn summarize(
        &self,
        transcript: &Transcript,
        cancel: &CancellationToken,
    ) -> Result<Summary, SummaryError> {
        let content = self
            .send_completion_request(Self::user_prompt(transcript.text()), cancel)
            .await?;

        let summary = parser::decode_summary(&content, self.options.allow_fallback)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to parse summary"))?;

        Ok(summary)
    }
}
