use anyhow::Context;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::{datastore::DataStore, NewSavedResult, SavedResult, TableName};

/// Hosted PostgREST store (Supabase).
#[derive(Debug, Clone)]
pub struct SupabaseDataStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: TableName,
}

#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

impl SupabaseDataStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, table: TableName) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            table,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    /// Surfaces the PostgREST diagnostic message when the body carries one.
    async fn error_for_status(resp: Response) -> anyhow::Error {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<PostgrestError>(&body)
            .ok()
            .and_then(|e| e.message.or(e.details).or(e.hint))
            .unwrap_or_else(|| format!("datastore responded with status {status}"));

        anyhow::anyhow!(message)
    }
}

impl DataStore for SupabaseDataStore {
    #[tracing::instrument(skip_all, fields(table = %self.table, url = %result.url))]
    async fn insert_result(&self, result: &NewSavedResult) -> anyhow::Result<SavedResult> {
        let resp = self
            .client
            .post(self.table_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .json(&[result])
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))
            .context("Failed to reach datastore")?;

        if !resp.status().is_success() {
            let err = Self::error_for_status(resp).await;
            tracing::error!(error = %err, "Failed to insert saved result");
            return Err(err.context("Failed to insert saved result"));
        }

        let mut rows = resp
            .json::<Vec<SavedResult>>()
            .await
            .context("Failed to decode inserted row")?;

        if rows.is_empty() {
            anyhow::bail!("Datastore returned no row for the insert");
        }

        Ok(rows.swap_remove(0))
    }

    #[tracing::instrument(skip_all, fields(table = %self.table))]
    async fn list_results(&self) -> anyhow::Result<Vec<SavedResult>> {
        let resp = self
            .client
            .get(self.table_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[("select", "*"), ("order", "created_at.desc,id.desc")])
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))
            .context("Failed to reach datastore")?;

        if !resp.status().is_success() {
            let err = Self::error_for_status(resp).await;
            tracing::error!(error = %err, "Failed to fetch saved results");
            return Err(err.context("Failed to fetch saved results"));
        }

        resp.json::<Vec<SavedResult>>()
            .await
            .context("Failed to decode saved results")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn row(id: i64, created_at: &str) -> serde_json::Value {
        json!({
            "id": id,
            "url": "https://www.youtube.com/watch?v=abc12345678",
            "transcript": "Hello world.",
            "summary": "{\"summary\":\"Greeting video\",\"keyPoints\":[],\"topics\":[]}",
            "created_at": created_at,
        })
    }

    #[tokio::test]
    async fn test_insert_returns_stored_row() {
        let server = MockServer::start().await;
        let new = NewSavedResult::new(
            "https://www.youtube.com/watch?v=abc12345678",
            "Hello world.",
            "{\"summary\":\"Greeting video\",\"keyPoints\":[],\"topics\":[]}",
        );

        Mock::given(method("POST"))
            .and(path("/rest/v1/video_summaries"))
            .and(header("apikey", "anon-key"))
            .and(header("Authorization", "Bearer anon-key"))
            .and(header("Prefer", "return=representation"))
            .and(body_json(json!([new])))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!([row(1, "2024-05-01T10:00:00+00:00")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = SupabaseDataStore::new(server.uri(), "anon-key", TableName::default());
        let saved = store.insert_result(&new).await.expect("insert should succeed");

        assert_eq!(saved.id, 1);
        assert_eq!(saved.transcript, "Hello world.");
    }

    #[tokio::test]
    async fn test_list_requests_recency_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/video_summaries"))
            .and(query_param("select", "*"))
            .and(query_param("order", "created_at.desc,id.desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                row(2, "2024-05-02T10:00:00+00:00"),
                row(1, "2024-05-01T10:00:00+00:00"),
            ])))
            .mount(&server)
            .await;

        let store = SupabaseDataStore::new(server.uri(), "anon-key", TableName::default());
        let rows = store.list_results().await.expect("list should succeed");

        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_list_empty_table_is_ok() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/video_summaries"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let store = SupabaseDataStore::new(server.uri(), "anon-key", TableName::default());
        assert!(store.list_results().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remote_diagnostic_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/video_summaries"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": "42P01",
                "details": null,
                "hint": null,
                "message": "relation \"public.video_summaries\" does not exist"
            })))
            .mount(&server)
            .await;

        let store = SupabaseDataStore::new(server.uri(), "anon-key", TableName::default());
        let err = store
            .insert_result(&NewSavedResult::new("u", "t", "s"))
            .await
            .unwrap_err();

        assert!(
            format!("{err:#}").contains("relation \"public.video_summaries\" does not exist"),
            "got: {err:#}"
        );
    }

    #[tokio::test]
    async fn test_non_json_error_falls_back_to_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/video_summaries"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let store = SupabaseDataStore::new(server.uri(), "anon-key", TableName::default());
        let err = store.list_results().await.unwrap_err();

        assert!(format!("{err:#}").contains("status 503"), "got: {err:#}");
    }
}
