use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{remote_error_message, TranscriptError},
    llm::send_cancellable,
    types::{Transcript, VideoReference},
    Transcriber,
};

/// How a video is identified to the transcription service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TranscriptLookup {
    /// Send the URL exactly as the user gave it
    #[default]
    Url,
    /// Send only the extracted video id
    VideoId,
}

/// Client for the Supadata transcript API.
#[derive(Debug, Clone)]
pub struct SupadataClient {
    client: Client,
    api_key: String,
    base_url: String,
    lookup: TranscriptLookup,
}

/// Success body of `GET /youtube/transcript`.
///
/// The transcript text is documented under `content`; `transcript` is
/// accepted too since both have been observed.
#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    #[serde(alias = "transcript")]
    content: Option<Value>,
    lang: Option<String>,
}

impl TranscriptResponse {
    /// Plain text of `content`, joining timed segments when the service
    /// ignored `text=true`.
    fn into_text(self) -> Option<String> {
        match self.content? {
            Value::String(text) => Some(text),
            Value::Array(segments) => Some(
                segments
                    .iter()
                    .filter_map(|seg| seg["text"].as_str())
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            _ => None,
        }
    }
}

impl SupadataClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.supadata.ai/v1".into(),
            lookup: TranscriptLookup::default(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_lookup(mut self, lookup: TranscriptLookup) -> Self {
        self.lookup = lookup;
        self
    }

    fn query_for<'a>(&self, video: &'a VideoReference) -> [(&'static str, &'a str); 2] {
        match self.lookup {
            TranscriptLookup::Url => [("url", video.raw_url()), ("text", "true")],
            TranscriptLookup::VideoId => [("videoId", video.video_id()), ("text", "true")],
        }
    }
}

impl Transcriber for SupadataClient {
    const SERVICE: &'static str = "supadata";

    async fn transcribe(
        &self,
        video: &VideoReference,
        cancel: &CancellationToken,
    ) -> Result<Transcript, TranscriptError> {
        let request = self
            .client
            .get(format!("{}/youtube/transcript", self.base_url))
            .header("x-api-key", &self.api_key)
            .query(&self.query_for(video));

        let (status, body) = send_cancellable(request, cancel)
            .await
            .ok_or(TranscriptError::Cancelled)??;

        if !status.is_success() {
            let message = remote_error_message(&body);
            tracing::error!(
                status = status.as_u16(),
                message = ?message,
                body = %body,
                "Transcript service returned an error"
            );
            return Err(TranscriptError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let response = serde_json::from_str::<TranscriptResponse>(&body)
            .inspect_err(|e| tracing::error!(error = %e, body = %body, "Failed to decode transcript"))
            .map_err(|e| TranscriptError::Decode(e.to_string()))?;

        let lang = response.lang.clone();
        let transcript = response
            .into_text()
            .and_then(Transcript::new)
            .ok_or(TranscriptError::Empty)?
            .for_video(video.video_id())
            .with_lang(lang);

        Ok(transcript)
    }
}
