//! # DataStore Module
//!
//! Storage for saved video summaries: the source URL, the transcript and the
//! serialized summary of a single pipeline run.
//!
//! Two backends are provided behind the [`DataStore`] trait: a Postgres store
//! driven by sqlx, and a hosted PostgREST (Supabase) store reached over HTTP.

mod datastore;
mod domain;

pub use datastore::postgres::PgDataStore;
pub use datastore::supabase::SupabaseDataStore;
pub use datastore::{AnyDataStore, DataStore};
pub use domain::{NewSavedResult, SavedResult, TableName};
