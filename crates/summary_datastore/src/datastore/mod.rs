use std::future::Future;

use crate::{NewSavedResult, PgDataStore, SavedResult, SupabaseDataStore};

pub mod postgres;
pub mod supabase;

pub trait DataStore {
    /// Inserts one row and returns it as stored, including the
    /// store-assigned `id`.
    fn insert_result(
        &self,
        result: &NewSavedResult,
    ) -> impl Future<Output = anyhow::Result<SavedResult>> + Send;

    /// All saved rows, most recent first.
    fn list_results(&self) -> impl Future<Output = anyhow::Result<Vec<SavedResult>>> + Send;
}

impl<T: DataStore + Send + Sync> DataStore for &T {
    async fn insert_result(&self, result: &NewSavedResult) -> anyhow::Result<SavedResult> {
        (**self).insert_result(result).await
    }

    async fn list_results(&self) -> anyhow::Result<Vec<SavedResult>> {
        (**self).list_results().await
    }
}

/// Backend picked at startup from configuration.
#[derive(Debug, Clone)]
pub enum AnyDataStore {
    Postgres(PgDataStore),
    Supabase(SupabaseDataStore),
}

impl DataStore for AnyDataStore {
    async fn insert_result(&self, result: &NewSavedResult) -> anyhow::Result<SavedResult> {
        match self {
            AnyDataStore::Postgres(store) => store.insert_result(result).await,
            AnyDataStore::Supabase(store) => store.insert_result(result).await,
        }
    }

    async fn list_results(&self) -> anyhow::Result<Vec<SavedResult>> {
        match self {
            AnyDataStore::Postgres(store) => store.list_results().await,
            AnyDataStore::Supabase(store) => store.list_results().await,
        }
    }
}

impl From<PgDataStore> for AnyDataStore {
    fn from(store: PgDataStore) -> Self {
        AnyDataStore::Postgres(store)
    }
}

impl From<SupabaseDataStore> for AnyDataStore {
    fn from(store: SupabaseDataStore) -> Self {
        AnyDataStore::Supabase(store)
    }
}
