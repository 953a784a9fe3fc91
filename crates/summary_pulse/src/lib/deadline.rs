use std::{future::Future, time::Duration};

use tokio_util::sync::CancellationToken;

/// Why a bounded call did not produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    TimedOut(Duration),
    Cancelled,
}

/// Runs `call` until it settles, `timeout` elapses or `token` is cancelled.
///
/// On expiry the token is cancelled, so anything else watching it stops too.
/// The call future is dropped on every early exit, which aborts in-flight
/// requests and releases their connections. A value that settles after the
/// token was cancelled is discarded.
pub async fn bounded<F, T>(
    timeout: Duration,
    token: &CancellationToken,
    call: F,
) -> Result<T, Interrupted>
where
    F: Future<Output = T>,
{
    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => Err(Interrupted::Cancelled),
        _ = tokio::time::sleep(timeout) => {
            token.cancel();
            Err(Interrupted::TimedOut(timeout))
        }
        value = call => Ok(value),
    };

    match outcome {
        Ok(_) if token.is_cancelled() => {
            tracing::debug!("Discarding result that settled after cancellation");
            Err(Interrupted::Cancelled)
        }
        other => other,
    }
}
