use std::{future::Future, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::{
    deadline::{bounded, Interrupted},
    error::SummaryError,
    types::{Summary, Transcript},
};

pub trait Summarizer {
    /// Service name used in logs
    const SERVICE: &'static str;

    /// One completion call for `transcript`. No retries.
    fn summarize(
        &self,
        transcript: &Transcript,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Summary, SummaryError>> + Send;
}

/// Summarizes `transcript`, failing with [`SummaryError::Timeout`] if the
/// model has not answered within `timeout`.
#[tracing::instrument(
    skip_all,
    fields(service = S::SERVICE, video_id = ?transcript.video_id(), timeout = ?timeout)
)]
pub async fn summarize_transcript<S: Summarizer>(
    summarizer: &S,
    transcript: &Transcript,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<Summary, SummaryError> {
    let token = cancel.child_token();

    let summary = bounded(timeout, &token, summarizer.summarize(transcript, &token))
        .await
        .map_err(|interrupted| match interrupted {
            Interrupted::TimedOut(after) => SummaryError::Timeout(after),
            Interrupted::Cancelled => SummaryError::Cancelled,
        })
        .and_then(|result| result)
        .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize transcript"))?;

    tracing::info!(
        key_points = summary.key_points.len(),
        topics = summary.topics.len(),
        "Summary generated"
    );

    Ok(summary)
}
