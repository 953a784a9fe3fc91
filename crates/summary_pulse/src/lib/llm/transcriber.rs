use std::{future::Future, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::{
    deadline::{bounded, Interrupted},
    error::TranscriptError,
    types::{Transcript, VideoReference},
};

pub trait Transcriber {
    /// Service name used in logs
    const SERVICE: &'static str;

    /// One outbound call for `video`. No retries.
    ///
    /// Implementations stop promptly once `cancel` fires and must never
    /// return a blank transcript.
    fn transcribe(
        &self,
        video: &VideoReference,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Transcript, TranscriptError>> + Send;
}

/// Fetches the transcript for `video`, failing with
/// [`TranscriptError::Timeout`] if the service has not answered within
/// `timeout`.
#[tracing::instrument(
    skip_all,
    fields(service = T::SERVICE, video_id = %video.video_id(), timeout = ?timeout)
)]
pub async fn fetch_transcript<T: Transcriber>(
    transcriber: &T,
    video: &VideoReference,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<Transcript, TranscriptError> {
    let token = cancel.child_token();

    let transcript = bounded(timeout, &token, transcriber.transcribe(video, &token))
        .await
        .map_err(|interrupted| match interrupted {
            Interrupted::TimedOut(after) => TranscriptError::Timeout(after),
            Interrupted::Cancelled => TranscriptError::Cancelled,
        })
        .and_then(|result| result)
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch transcript"))?;

    tracing::info!(chars = transcript.text().len(), "Transcript fetched");

    Ok(transcript)
}
