use serde::{Deserialize, Deserializer, Serialize};

/// A validated hosted-video URL together with its extracted identifier.
///
/// Only constructed by [`crate::yt::validate`], so a `VideoReference` always
/// refers to a recognized host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoReference {
    pub(crate) raw_url: String,
    pub(crate) video_id: String,
}

impl VideoReference {
    pub fn raw_url(&self) -> &str {
        &self.raw_url
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }
}

/// Plain-text transcription of a video. The text is never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    video_id: Option<String>,
    text: String,
    lang: Option<String>,
}

impl Transcript {
    /// Returns `None` when `text` is empty or whitespace only.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }

        Some(Transcript {
            video_id: None,
            text,
            lang: None,
        })
    }

    pub fn for_video(mut self, video_id: impl Into<String>) -> Self {
        self.video_id = Some(video_id.into());
        self
    }

    pub fn with_lang(mut self, lang: Option<String>) -> Self {
        self.lang = lang;
        self
    }

    /// `None` for transcripts submitted directly rather than fetched for a
    /// video.
    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Structured analysis of a transcript.
///
/// The model is asked for at most 5 key points and 3 topics, but those caps
/// are not enforced here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub key_points: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub topics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
}

/// Models sometimes answer `null` for a list they have nothing for.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Summary {
    /// True when the summary carries no content at all.
    pub fn is_empty(&self) -> bool {
        self.summary.trim().is_empty()
            && self.key_points.is_empty()
            && self.topics.is_empty()
            && self.sections.as_ref().is_none_or(Vec::is_empty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: String,
}

/// Everything a completed pipeline invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub video: VideoReference,
    pub transcript: Transcript,
    pub summary: Summary,
}

/// Progress of a single pipeline invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PipelineState {
    #[default]
    Idle,
    Transcribing,
    Summarizing,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineState::Idle => write!(f, "idle"),
            PipelineState::Transcribing => write!(f, "transcribing"),
            PipelineState::Summarizing => write!(f, "summarizing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_transcript_is_rejected() {
        assert!(Transcript::new("").is_none());
        assert!(Transcript::new("  \n\t ").is_none());

        let transcript = Transcript::new("Hello world.").unwrap().for_video("abc12345678");
        assert_eq!(transcript.video_id(), Some("abc12345678"));
        assert_eq!(transcript.text(), "Hello world.");
    }

    #[test]
    fn test_summary_uses_camel_case_keys() {
        let summary = Summary {
            summary: "Greeting video".into(),
            key_points: vec!["Says hello".into()],
            topics: vec!["greeting".into()],
            sections: None,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "summary": "Greeting video",
                "keyPoints": ["Says hello"],
                "topics": ["greeting"]
            })
        );
    }
}
