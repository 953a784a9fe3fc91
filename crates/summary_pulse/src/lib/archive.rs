use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use summary_datastore::{DataStore, NewSavedResult, SavedResult};

use crate::{error::PersistenceError, types::Summary};

/// What the caller asks to save.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub summary: Option<Summary>,
}

/// A stored result with its summary decoded again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSummary {
    pub id: i64,
    pub url: String,
    pub transcript: String,
    pub summary: Summary,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SavedResult> for SavedSummary {
    type Error = PersistenceError;

    fn try_from(row: SavedResult) -> Result<Self, Self::Error> {
        let summary = serde_json::from_str::<Summary>(&row.summary)
            .map_err(|source| PersistenceError::CorruptSummary { id: row.id, source })?;

        Ok(SavedSummary {
            id: row.id,
            url: row.url,
            transcript: row.transcript,
            summary,
            created_at: row.created_at,
        })
    }
}

/// Result of listing the archive. An empty archive is reported explicitly
/// rather than as an empty collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "results", rename_all = "snake_case")]
pub enum SavedListing {
    NoResults,
    Results(Vec<SavedSummary>),
}

impl SavedListing {
    pub fn results(&self) -> &[SavedSummary] {
        match self {
            SavedListing::NoResults => &[],
            SavedListing::Results(results) => results,
        }
    }
}

/// Saves pipeline results to, and reads them back from, a [`DataStore`].
#[derive(Debug, Clone)]
pub struct ResultArchive<D>
where
    D: DataStore + Send + Sync + 'static,
{
    store: D,
}

impl<D> ResultArchive<D>
where
    D: DataStore + Send + Sync + 'static,
{
    pub fn new(store: D) -> Self {
        ResultArchive { store }
    }

    /// Persists one url/transcript/summary triple.
    ///
    /// All three fields must be present; otherwise this fails with
    /// [`PersistenceError::MissingField`] without touching the store.
    #[tracing::instrument(skip_all, fields(url = %request.url))]
    pub async fn save(&self, request: SaveRequest) -> Result<SavedSummary, PersistenceError> {
        let SaveRequest {
            url,
            transcript,
            summary,
        } = request;

        if url.trim().is_empty() {
            return Err(PersistenceError::MissingField("url"));
        }
        if transcript.trim().is_empty() {
            return Err(PersistenceError::MissingField("transcript"));
        }
        let summary = summary
            .filter(|s| !s.is_empty())
            .ok_or(PersistenceError::MissingField("summary"))?;

        let row = NewSavedResult::new(url, transcript, serde_json::to_string(&summary)?);

        let saved = self
            .store
            .insert_result(&row)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to save result"))?;

        tracing::info!(id = saved.id, "Result saved");

        SavedSummary::try_from(saved)
    }

    /// Every saved result, most recent first.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<SavedListing, PersistenceError> {
        let rows = self
            .store
            .list_results()
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to list saved results"))?;

        if rows.is_empty() {
            return Ok(SavedListing::NoResults);
        }

        let results = rows
            .into_iter()
            // backends already order rows; ties on created_at are settled by id
            .sorted_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            })
            .map(SavedSummary::try_from)
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| tracing::error!(error = %e, "Failed to decode saved result"))?;

        Ok(SavedListing::Results(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, summary: &str) -> SavedResult {
        SavedResult {
            id,
            url: "https://youtu.be/abc12345678".into(),
            transcript: "Hello world.".into(),
            summary: summary.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_stored_summary_is_decoded() {
        let saved = SavedSummary::try_from(row(
            7,
            r#"{"summary":"Greeting video","keyPoints":["Says hello"],"topics":["greeting"]}"#,
        ))
        .unwrap();

        assert_eq!(saved.id, 7);
        assert_eq!(saved.summary.summary, "Greeting video");
        assert_eq!(saved.summary.topics, vec!["greeting"]);
    }

    #[test]
    fn test_unreadable_stored_summary() {
        let err = SavedSummary::try_from(row(3, "not json")).unwrap_err();
        assert!(matches!(err, PersistenceError::CorruptSummary { id: 3, .. }));
    }

    #[test]
    fn test_listing_serializes_with_status_tag() {
        assert_eq!(
            serde_json::to_value(SavedListing::NoResults).unwrap(),
            serde_json::json!({ "status": "no_results" })
        );

        let listing = SavedListing::Results(vec![SavedSummary::try_from(row(
            1,
            r#"{"summary":"s"}"#,
        ))
        .unwrap()]);
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["status"], "results");
        assert_eq!(json["results"][0]["summary"]["summary"], "s");
        assert!(json["results"][0]["createdAt"].is_string());
    }
}
