use std::{fmt, ops::Deref, sync::LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub(crate) static TABLE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").unwrap());

/// A persisted pipeline result.
///
/// `summary` holds the serialized summary object; the store itself never
/// interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SavedResult {
    pub id: i64,
    pub url: String,
    pub transcript: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

/// The row handed to [`crate::DataStore::insert_result`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSavedResult {
    pub url: String,
    pub transcript: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl NewSavedResult {
    pub fn new(
        url: impl Into<String>,
        transcript: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            transcript: transcript.into(),
            summary: summary.into(),
            created_at: Utc::now(),
        }
    }
}

/// A table name that is safe to interpolate into SQL and REST paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    pub const DEFAULT: &str = "video_summaries";

    pub fn parse(name: impl Into<String>) -> anyhow::Result<Self> {
        let name = name.into();
        if !TABLE_NAME_RE.is_match(&name) {
            anyhow::bail!("Invalid table name: {name:?}");
        }
        Ok(TableName(name))
    }
}

impl Default for TableName {
    fn default() -> Self {
        TableName(Self::DEFAULT.to_string())
    }
}

impl Deref for TableName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
