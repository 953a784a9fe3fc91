use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use summary_datastore::DataStore;
use tokio_util::sync::CancellationToken;

use super::{ApiError, AppState};
use crate::{
    archive::{SaveRequest, SavedListing, SavedSummary},
    types::Summary,
    Summarizer, Transcriber,
};

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub transcript: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeResponse {
    pub video_id: String,
    pub transcript: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub video_id: String,
    pub transcript: String,
    pub summary: Summary,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub data: SavedSummary,
}

/// Token for one request. Dropped with the handler future, which happens
/// when the client goes away, and then cancels any call still in flight.
fn request_token() -> (CancellationToken, tokio_util::sync::DropGuard) {
    let token = CancellationToken::new();
    let guard = token.clone().drop_guard();
    (token, guard)
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn transcribe<T, S, D>(
    State(state): State<AppState<T, S, D>>,
    payload: Result<Json<UrlRequest>, JsonRejection>,
) -> ApiResult<Json<TranscribeResponse>>
where
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    D: DataStore + Send + Sync + 'static,
{
    let Json(request) = payload?;
    let (cancel, _guard) = request_token();

    let (video, transcript) = state.pipeline.transcribe(&request.url, &cancel).await?;

    Ok(Json(TranscribeResponse {
        video_id: video.video_id().to_string(),
        transcript: transcript.into_text(),
    }))
}

pub async fn summarize<T, S, D>(
    State(state): State<AppState<T, S, D>>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> ApiResult<Json<Summary>>
where
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    D: DataStore + Send + Sync + 'static,
{
    let Json(request) = payload?;
    let (cancel, _guard) = request_token();

    let summary = state.pipeline.summarize(&request.transcript, &cancel).await?;

    Ok(Json(summary))
}

pub async fn process<T, S, D>(
    State(state): State<AppState<T, S, D>>,
    payload: Result<Json<UrlRequest>, JsonRejection>,
) -> ApiResult<Json<ProcessResponse>>
where
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    D: DataStore + Send + Sync + 'static,
{
    let Json(request) = payload?;
    let (cancel, _guard) = request_token();

    let output = state.pipeline.run(&request.url, &(), &cancel).await?;

    Ok(Json(ProcessResponse {
        video_id: output.video.video_id().to_string(),
        transcript: output.transcript.into_text(),
        summary: output.summary,
    }))
}

pub async fn save_result<T, S, D>(
    State(state): State<AppState<T, S, D>>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SaveResponse>)>
where
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    D: DataStore + Send + Sync + 'static,
{
    let Json(request) = payload?;
    let saved = state.archive.save(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SaveResponse {
            success: true,
            data: saved,
        }),
    ))
}

pub async fn saved_results<T, S, D>(
    State(state): State<AppState<T, S, D>>,
) -> ApiResult<Json<SavedListing>>
where
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    D: DataStore + Send + Sync + 'static,
{
    let listing = state.archive.list().await?;
    Ok(Json(listing))
}
