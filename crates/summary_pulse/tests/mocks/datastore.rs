use std::sync::{Arc, Mutex};
use summary_datastore::{DataStore, NewSavedResult, SavedResult};

#[derive(Clone, Default)]
pub struct MockDataStore {
    pub rows: Arc<Mutex<Vec<SavedResult>>>,
    pub calls: Arc<Mutex<Vec<&'static str>>>,
    pub fail_with: Option<String>,
}

impl MockDataStore {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    /// Preloads rows exactly as given; `list_results` hands them back in
    /// this order.
    pub fn with_rows(rows: Vec<SavedResult>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
            ..Default::default()
        }
    }
}

impl DataStore for MockDataStore {
    async fn insert_result(&self, result: &NewSavedResult) -> anyhow::Result<SavedResult> {
        self.calls.lock().unwrap().push("insert");
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg).context("Failed to insert saved result"));
        }

        let mut rows = self.rows.lock().unwrap();
        let row = SavedResult {
            id: rows.len() as i64 + 1,
            url: result.url.clone(),
            transcript: result.transcript.clone(),
            summary: result.summary.clone(),
            created_at: result.created_at,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn list_results(&self) -> anyhow::Result<Vec<SavedResult>> {
        self.calls.lock().unwrap().push("list");
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg).context("Failed to list saved results"));
        }

        Ok(self.rows.lock().unwrap().clone())
    }
}
