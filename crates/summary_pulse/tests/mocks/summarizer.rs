use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use summary_pulse::{
    parser,
    types::{Summary, Transcript},
    Summarizer, SummaryError,
};
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct MockSummarizer {
    /// Raw model output, decoded the same way a real client decodes it
    pub model_output: String,
    pub allow_fallback: bool,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<(u16, Option<String>)>,
    pub delay: Option<Duration>,
    /// Set once a delayed call runs to completion
    pub finished: Arc<AtomicBool>,
}

impl MockSummarizer {
    pub fn new(summary: &Summary) -> Self {
        Self::from_model_output(&serde_json::to_string(summary).unwrap())
    }

    pub fn from_model_output(output: &str) -> Self {
        Self {
            model_output: output.to_string(),
            allow_fallback: true,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
            delay: None,
            finished: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Answers only after `delay`.
    pub fn slow(summary: &Summary, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(summary)
        }
    }

    pub fn failing(status: u16, msg: Option<&str>) -> Self {
        Self {
            fail_with: Some((status, msg.map(String::from))),
            ..Self::from_model_output("")
        }
    }

    pub fn strict(mut self) -> Self {
        self.allow_fallback = false;
        self
    }
}

impl Summarizer for MockSummarizer {
    const SERVICE: &'static str = "mock-llm";

    async fn summarize(
        &self,
        transcript: &Transcript,
        cancel: &CancellationToken,
    ) -> Result<Summary, SummaryError> {
        self.calls.lock().unwrap().push(transcript.text().to_string());

        if let Some(delay) = self.delay {
            tokio::select! {
                _ = cancel.cancelled() => return Err(SummaryError::Cancelled),
                _ = tokio::time::sleep(delay) => self.finished.store(true, Ordering::SeqCst),
            }
        }

        if let Some((status, ref message)) = self.fail_with {
            return Err(SummaryError::Remote {
                status,
                message: message.clone(),
            });
        }

        Ok(parser::decode_summary(&self.model_output, self.allow_fallback)?)
    }
}
