pub mod openai;
pub mod summarizer;
pub mod supadata;
pub mod transcriber;

use reqwest::{RequestBuilder, StatusCode};
use tokio_util::sync::CancellationToken;

/// Sends `request` and reads the whole body, giving up as soon as `cancel`
/// fires. `None` means the call was cancelled; the request future is dropped
/// with it.
pub(crate) async fn send_cancellable(
    request: RequestBuilder,
    cancel: &CancellationToken,
) -> Option<reqwest::Result<(StatusCode, String)>> {
    let call = async {
        let resp = request
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;
        let status = resp.status();
        let body = resp.text().await?;
        Ok((status, body))
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        result = call => Some(result),
    }
}
