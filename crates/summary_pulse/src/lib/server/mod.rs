//! # HTTP surface
//!
//! JSON routes over the pipeline and the result archive:
//!
//! | route                    | body                          | success                      |
//! |--------------------------|-------------------------------|------------------------------|
//! | `POST /api/transcribe`   | `{url}`                       | `{videoId, transcript}`      |
//! | `POST /api/summarize`    | `{transcript}`                | `Summary`                    |
//! | `POST /api/process`      | `{url}`                       | `{videoId, transcript, summary}` |
//! | `POST /api/save-result`  | `{url, transcript, summary}`  | `201 {success, data}`        |
//! | `GET /api/saved-results` |                               | `{status, results?}`         |
//!
//! Failures answer `{"error": message}` with the status of the underlying
//! error.

mod error;
mod handlers;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use summary_datastore::DataStore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::ApiError;

use crate::{ResultArchive, Summarizer, SummaryPipeline, Transcriber};

/// Shared, read-only state handed to every request.
pub struct AppState<T, S, D>
where
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    D: DataStore + Send + Sync + 'static,
{
    pub pipeline: Arc<SummaryPipeline<T, S>>,
    pub archive: Arc<ResultArchive<D>>,
}

impl<T, S, D> AppState<T, S, D>
where
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    D: DataStore + Send + Sync + 'static,
{
    pub fn new(pipeline: SummaryPipeline<T, S>, archive: ResultArchive<D>) -> Self {
        AppState {
            pipeline: Arc::new(pipeline),
            archive: Arc::new(archive),
        }
    }
}

impl<T, S, D> Clone for AppState<T, S, D>
where
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    D: DataStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        AppState {
            pipeline: Arc::clone(&self.pipeline),
            archive: Arc::clone(&self.archive),
        }
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

pub fn create_router<T, S, D>(state: AppState<T, S, D>) -> Router
where
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    D: DataStore + Send + Sync + 'static,
{
    let api_routes = Router::new()
        .route("/transcribe", post(handlers::transcribe::<T, S, D>))
        .route("/summarize", post(handlers::summarize::<T, S, D>))
        .route("/process", post(handlers::process::<T, S, D>))
        .route("/save-result", post(handlers::save_result::<T, S, D>))
        .route("/saved-results", get(handlers::saved_results::<T, S, D>));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Serves the router on `addr` until ctrl-c.
pub async fn serve<T, S, D>(addr: SocketAddr, state: AppState<T, S, D>) -> anyhow::Result<()>
where
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    D: DataStore + Send + Sync + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
