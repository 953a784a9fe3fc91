use anyhow::Context;
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};

use crate::{datastore::DataStore, NewSavedResult, SavedResult, TableName};

static MIGRATOR: Migrator = sqlx::migrate!();

#[derive(Debug, Clone)]
pub struct PgDataStore {
    pub pool: PgPool,
    table: TableName,
}

impl PgDataStore {
    /// Establish connection to database and create the default
    /// `video_summaries` table if not exists
    pub async fn init(database_url: &str, table: TableName) -> anyhow::Result<Self> {
        ensure_migrated_table(&table)?;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .inspect_err(
                |e| tracing::error!(error = ?e, "Failed to establish connection to database"),
            )
            .context("Failed to connect to postgres database")?;

        MIGRATOR
            .run(&pool)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to run database migrations"))
            .context("Failed to run database migrations")?;

        Ok(PgDataStore { pool, table })
    }
}

/// The embedded migration only knows about the default table.
fn ensure_migrated_table(table: &TableName) -> anyhow::Result<()> {
    if &**table != TableName::DEFAULT {
        anyhow::bail!(
            "Postgres backend only supports the migrated `{}` table, got `{table}`",
            TableName::DEFAULT
        );
    }
    Ok(())
}

impl DataStore for PgDataStore {
    #[tracing::instrument(skip_all, fields(table = %self.table, url = %result.url))]
    async fn insert_result(&self, result: &NewSavedResult) -> anyhow::Result<SavedResult> {
        // table name is validated by `TableName::parse`
        let query = format!(
            r#"
            INSERT INTO {} (url, transcript, summary, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, url, transcript, summary, created_at
            "#,
            self.table
        );

        let saved = sqlx::query_as::<_, SavedResult>(&query)
            .bind(&result.url)
            .bind(&result.transcript)
            .bind(&result.summary)
            .bind(result.created_at)
            .fetch_one(&self.pool)
            .await
            .inspect_err(|err| tracing::error!(error = ?err, "Failed to insert saved result"))
            .context("Failed to insert saved result")?;

        Ok(saved)
    }

    #[tracing::instrument(skip_all, fields(table = %self.table))]
    async fn list_results(&self) -> anyhow::Result<Vec<SavedResult>> {
        let query = format!(
            "SELECT id, url, transcript, summary, created_at FROM {} ORDER BY created_at DESC, id DESC",
            self.table
        );

        let rows = sqlx::query_as::<_, SavedResult>(&query)
            .fetch_all(&self.pool)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to fetch saved results"))
            .context("Failed to fetch saved results")?;

        Ok(rows)
    }
}
