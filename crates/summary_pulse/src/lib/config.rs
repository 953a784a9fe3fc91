use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use clap::Args;
use summary_datastore::{AnyDataStore, PgDataStore, SupabaseDataStore, TableName};

use crate::{
    llm::openai::CompletionOptions, OpenAIClient, SupadataClient, SummaryPipeline,
    SummaryPipelineBuilder, TranscriptLookup,
};

/// Credentials and knobs for the two remote services. Only the commands
/// that call them ask for these.
#[derive(Debug, Clone, Args)]
pub struct PipelineSettings {
    #[command(flatten)]
    pub transcription: TranscriptionSettings,

    #[command(flatten)]
    pub llm: LlmSettings,
}

#[derive(Debug, Clone, Args)]
pub struct TranscriptionSettings {
    /// Supadata API key
    #[arg(long, env = "SUPADATA_API_KEY", hide_env_values = true)]
    pub supadata_api_key: String,

    #[arg(long, env = "SUPADATA_BASE_URL", default_value = "https://api.supadata.ai/v1")]
    pub supadata_base_url: String,

    /// Identify videos to the transcript service by URL or by video id
    #[arg(long, env = "TRANSCRIPT_LOOKUP", value_enum, default_value_t = TranscriptLookup::Url)]
    pub transcript_lookup: TranscriptLookup,

    #[arg(long, env = "TRANSCRIPT_TIMEOUT_SECS", default_value = "30")]
    pub transcript_timeout_secs: u64,
}

#[derive(Debug, Clone, Args)]
pub struct LlmSettings {
    /// API key for the chat completions service
    #[arg(long, env = "LLM_API_KEY", hide_env_values = true)]
    pub llm_api_key: String,

    #[arg(long, env = "LLM_BASE_URL", default_value = "https://api.deepseek.com")]
    pub llm_base_url: String,

    #[arg(long, env = "LLM_MODEL", default_value = "deepseek-chat")]
    pub llm_model: String,

    #[arg(long, env = "LLM_TEMPERATURE", default_value = "0.3")]
    pub llm_temperature: f32,

    #[arg(long, env = "LLM_MAX_TOKENS", default_value = "2048")]
    pub llm_max_tokens: u32,

    /// Request `json_object` responses from the model
    #[arg(long, env = "LLM_STRUCTURED_OUTPUT", default_value_t = true, action = clap::ArgAction::Set)]
    pub llm_structured_output: bool,

    /// Structure free-text model responses instead of failing on them
    #[arg(long, env = "SUMMARY_FALLBACK", default_value_t = true, action = clap::ArgAction::Set)]
    pub summary_fallback: bool,

    #[arg(long, env = "SUMMARY_TIMEOUT_SECS", default_value = "60")]
    pub summary_timeout_secs: u64,
}

#[derive(Debug, Clone, Args)]
pub struct DatastoreSettings {
    /// Postgres connection URL; takes precedence over Supabase
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    pub supabase_anon_key: Option<String>,

    #[arg(long, env = "SUMMARY_TABLE", default_value = TableName::DEFAULT)]
    pub summary_table: String,
}

#[derive(Debug, Clone, Args)]
pub struct ServerSettings {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

impl PipelineSettings {
    pub fn pipeline(&self) -> SummaryPipeline<SupadataClient, OpenAIClient> {
        let transcription = &self.transcription;
        let llm = &self.llm;

        let transcriber = SupadataClient::new(&transcription.supadata_api_key)
            .with_base_url(&transcription.supadata_base_url)
            .with_lookup(transcription.transcript_lookup);

        let summarizer = OpenAIClient::new(&llm.llm_api_key)
            .with_base_url(&llm.llm_base_url)
            .with_options(CompletionOptions {
                model: llm.llm_model.clone(),
                temperature: llm.llm_temperature,
                max_tokens: llm.llm_max_tokens,
                structured_output: llm.llm_structured_output,
                allow_fallback: llm.summary_fallback,
            });

        SummaryPipelineBuilder::new()
            .transcriber(transcriber)
            .summarizer(summarizer)
            .transcript_timeout(Duration::from_secs(transcription.transcript_timeout_secs))
            .summary_timeout(Duration::from_secs(llm.summary_timeout_secs))
            .build()
    }
}

impl DatastoreSettings {
    /// Connects to the configured backend. Postgres wins when both are set.
    pub async fn connect(&self) -> anyhow::Result<AnyDataStore> {
        let table = TableName::parse(&self.summary_table)?;

        if let Some(database_url) = &self.database_url {
            tracing::info!(%table, "Using Postgres datastore");
            let store = PgDataStore::init(database_url, table).await?;
            return Ok(store.into());
        }

        match (&self.supabase_url, &self.supabase_anon_key) {
            (Some(url), Some(key)) => {
                tracing::info!(%table, "Using Supabase datastore");
                Ok(SupabaseDataStore::new(url, key, table).into())
            }
            _ => anyhow::bail!(
                "No datastore configured: set DATABASE_URL or both SUPABASE_URL and SUPABASE_ANON_KEY"
            ),
        }
    }
}
