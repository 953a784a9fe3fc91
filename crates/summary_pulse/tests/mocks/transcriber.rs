use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use summary_pulse::{
    types::{Transcript, VideoReference},
    Transcriber, TranscriptError,
};
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct MockTranscriber {
    pub response_text: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<(u16, Option<String>)>,
    pub delay: Option<Duration>,
}

impl MockTranscriber {
    pub fn new(response_text: &str) -> Self {
        Self {
            response_text: response_text.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
            delay: None,
        }
    }

    /// Answers with a remote error carrying `status` and `msg`.
    pub fn failing(status: u16, msg: Option<&str>) -> Self {
        Self {
            fail_with: Some((status, msg.map(String::from))),
            ..Self::new("")
        }
    }

    /// Answers only after `delay`.
    pub fn slow(response_text: &str, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(response_text)
        }
    }
}

impl Transcriber for MockTranscriber {
    const SERVICE: &'static str = "mock-transcripts";

    async fn transcribe(
        &self,
        video: &VideoReference,
        cancel: &CancellationToken,
    ) -> Result<Transcript, TranscriptError> {
        self.calls.lock().unwrap().push(video.video_id().to_string());

        if let Some(delay) = self.delay {
            tokio::select! {
                _ = cancel.cancelled() => return Err(TranscriptError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }

        if let Some((status, ref message)) = self.fail_with {
            return Err(TranscriptError::Remote {
                status,
                message: message.clone(),
            });
        }

        Transcript::new(self.response_text.clone())
            .map(|t| t.for_video(video.video_id()))
            .ok_or(TranscriptError::Empty)
    }
}
