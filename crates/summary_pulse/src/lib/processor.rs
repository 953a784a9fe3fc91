pub mod builder;

use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{Error, ValidationError},
    fetch_transcript, summarize_transcript,
    types::{PipelineOutput, PipelineState, Summary, Transcript, VideoReference},
    yt, Summarizer, Transcriber,
};

/// Receives the progress of a pipeline invocation.
pub trait StateObserver: Send + Sync {
    fn observe(&self, state: PipelineState);
}

impl StateObserver for () {
    fn observe(&self, _state: PipelineState) {}
}

impl StateObserver for watch::Sender<PipelineState> {
    fn observe(&self, state: PipelineState) {
        // keeps the latest state even when nobody is subscribed yet
        self.send_replace(state);
    }
}

/// Puts the observer back to `Idle` however the invocation ends.
struct IdleOnDrop<'a, O: StateObserver>(&'a O);

impl<O: StateObserver> Drop for IdleOnDrop<'_, O> {
    fn drop(&mut self) {
        self.0.observe(PipelineState::Idle);
    }
}

// Video URL -> transcript -> structured summary
#[derive(Debug, Clone)]
pub struct SummaryPipeline<T, S>
where
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    transcriber: T,
    summarizer: S,
    transcript_timeout: Duration,
    summary_timeout: Duration,
}

impl<T, S> SummaryPipeline<T, S>
where
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    pub const DEFAULT_TRANSCRIPT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_SUMMARY_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(transcriber: T, summarizer: S) -> Self {
        SummaryPipeline {
            transcriber,
            summarizer,
            transcript_timeout: Self::DEFAULT_TRANSCRIPT_TIMEOUT,
            summary_timeout: Self::DEFAULT_SUMMARY_TIMEOUT,
        }
    }

    /// Validates `raw_url` and fetches its transcript.
    #[tracing::instrument(skip(self, cancel))]
    pub async fn transcribe(
        &self,
        raw_url: &str,
        cancel: &CancellationToken,
    ) -> Result<(VideoReference, Transcript), Error> {
        let video = yt::validate(raw_url)?;
        let transcript =
            fetch_transcript(&self.transcriber, &video, self.transcript_timeout, cancel).await?;

        Ok((video, transcript))
    }

    /// Summarizes transcript text that did not come out of [`Self::transcribe`].
    #[tracing::instrument(skip_all, fields(chars = text.len()))]
    pub async fn summarize(&self, text: &str, cancel: &CancellationToken) -> Result<Summary, Error> {
        let transcript = Transcript::new(text).ok_or(ValidationError::EmptyTranscript)?;
        let summary =
            summarize_transcript(&self.summarizer, &transcript, self.summary_timeout, cancel)
                .await?;

        Ok(summary)
    }

    /// Runs every stage in order for one URL.
    ///
    /// `observer` sees `Transcribing`, then `Summarizing`, then `Idle`; a
    /// failure skips straight to `Idle` and nothing produced so far is kept.
    /// A URL that fails validation never leaves `Idle`.
    #[tracing::instrument(skip(self, observer, cancel))]
    pub async fn run<O: StateObserver>(
        &self,
        raw_url: &str,
        observer: &O,
        cancel: &CancellationToken,
    ) -> Result<PipelineOutput, Error> {
        let video = yt::validate(raw_url)
            .inspect_err(|e| tracing::warn!(error = %e, "Rejected video URL"))?;

        let _idle = IdleOnDrop(observer);

        observer.observe(PipelineState::Transcribing);
        let transcript =
            fetch_transcript(&self.transcriber, &video, self.transcript_timeout, cancel).await?;

        observer.observe(PipelineState::Summarizing);
        let summary =
            summarize_transcript(&self.summarizer, &transcript, self.summary_timeout, cancel)
                .await?;

        tracing::info!(video_id = %video.video_id(), "Pipeline completed");

        Ok(PipelineOutput {
            video,
            transcript,
            summary,
        })
    }
}
