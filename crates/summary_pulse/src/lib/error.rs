use std::time::Duration;

use serde_json::Value;

/// Coarse classification every stage error maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input, never reached the network
    Validation,
    /// Network failure, timeout or cancellation
    Transport,
    /// Well-formed error response from a dependency
    Remote,
    /// Response body unusable even after fallbacks
    Parse,
    /// Datastore write/read failure
    Persistence,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transcript(#[from] TranscriptError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Transcript(e) => e.kind(),
            Error::Summary(e) => e.kind(),
            Error::Persistence(_) => ErrorKind::Persistence,
        }
    }

    /// The single message shown to the end user.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(e) => e.user_message(),
            Error::Transcript(e) => e.user_message(),
            Error::Summary(e) => e.user_message(),
            Error::Persistence(e) => e.user_message(),
        }
    }

    /// HTTP-equivalent status for the caller surface.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::Transcript(e) => e.status_code(),
            Error::Summary(e) => e.status_code(),
            Error::Persistence(e) => e.status_code(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Not a recognized video URL: {0:?}")]
    InvalidUrl(String),
    #[error("Could not extract a video id from {0:?}")]
    IdExtraction(String),
    #[error("Transcript text is empty")]
    EmptyTranscript,
}

impl ValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::InvalidUrl(_) => "Please enter a valid YouTube URL".into(),
            ValidationError::IdExtraction(_) => "Could not extract the video ID".into(),
            ValidationError::EmptyTranscript => "Transcript is required".into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("Transcript request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Transcript request was cancelled")]
    Cancelled,
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API error: {status} - {}", .message.as_deref().unwrap_or("<no message>"))]
    Remote {
        status: u16,
        message: Option<String>,
    },
    #[error("Transcript service returned no transcript")]
    Empty,
    #[error("Failed to decode transcript response: {0}")]
    Decode(String),
}

impl TranscriptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranscriptError::Timeout(_)
            | TranscriptError::Cancelled
            | TranscriptError::Transport(_) => ErrorKind::Transport,
            TranscriptError::Remote { .. } => ErrorKind::Remote,
            TranscriptError::Empty | TranscriptError::Decode(_) => ErrorKind::Parse,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            TranscriptError::Timeout(_) => {
                "The request took too long. Please try again.".into()
            }
            TranscriptError::Cancelled => "The transcription request was cancelled".into(),
            TranscriptError::Transport(_) => "Error processing the transcription".into(),
            TranscriptError::Remote { message, .. } => message
                .clone()
                .unwrap_or_else(|| "Error fetching the transcript".into()),
            TranscriptError::Empty => "Could not obtain the transcript".into(),
            TranscriptError::Decode(_) => "Error processing the server response".into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            TranscriptError::Timeout(_) => 504,
            TranscriptError::Cancelled => 499,
            TranscriptError::Transport(_) => 502,
            TranscriptError::Remote { status, .. } => *status,
            TranscriptError::Empty => 400,
            TranscriptError::Decode(_) => 500,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("Summary request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Summary request was cancelled")]
    Cancelled,
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API error: {status} - {}", .message.as_deref().unwrap_or("<no message>"))]
    Remote {
        status: u16,
        message: Option<String>,
    },
    #[error("No content in completion response")]
    MissingContent,
    #[error("Failed to parse summary: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SummaryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SummaryError::Timeout(_) | SummaryError::Cancelled | SummaryError::Transport(_) => {
                ErrorKind::Transport
            }
            SummaryError::Remote { .. } => ErrorKind::Remote,
            SummaryError::MissingContent | SummaryError::Parse(_) => ErrorKind::Parse,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            SummaryError::Timeout(_) => {
                "Generating the summary took too long. Please try again.".into()
            }
            SummaryError::Cancelled => "The summary request was cancelled".into(),
            SummaryError::Transport(_) => "Error generating summary".into(),
            SummaryError::Remote { message, .. } => message
                .clone()
                .unwrap_or_else(|| "Error generating summary".into()),
            SummaryError::MissingContent | SummaryError::Parse(_) => {
                "Error parsing summary response".into()
            }
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            SummaryError::Timeout(_) => 504,
            SummaryError::Cancelled => 499,
            SummaryError::Transport(_) => 502,
            SummaryError::Remote { status, .. } => *status,
            SummaryError::MissingContent | SummaryError::Parse(_) => 500,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Datastore error: {message}")]
    Datastore { message: String },
    #[error("Failed to serialize summary: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Stored summary for result {id} is unreadable: {source}")]
    CorruptSummary {
        id: i64,
        #[source]
        source: serde_json::Error,
    },
}

impl PersistenceError {
    pub fn user_message(&self) -> String {
        match self {
            PersistenceError::MissingField(_) => "Missing required fields".into(),
            PersistenceError::Datastore { message } => {
                format!("Datastore request failed: {message}")
            }
            PersistenceError::Serialization(_) => "Error saving result".into(),
            PersistenceError::CorruptSummary { .. } => "Error reading saved results".into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            PersistenceError::MissingField(_) => 400,
            _ => 500,
        }
    }
}

impl From<anyhow::Error> for PersistenceError {
    fn from(err: anyhow::Error) -> Self {
        // the root cause carries the datastore's own diagnostic
        PersistenceError::Datastore {
            message: err.root_cause().to_string(),
        }
    }
}

/// Extracts a human-readable message from a dependency's error body.
///
/// Looks at `error` (string), `error.message`, `message` and `details` in
/// that order; returns `None` for bodies that are not JSON or carry none of
/// them.
pub fn remote_error_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<Value>(body).ok()?;

    let message = [
        &json["error"],
        &json["error"]["message"],
        &json["message"],
        &json["details"],
    ]
    .into_iter()
    .find_map(|v| v.as_str())
    .map(str::trim)
    .filter(|m| !m.is_empty())
    .map(String::from);

    message
}
