pub mod archive;
pub mod config;
mod deadline;
pub mod error;
mod llm;
pub mod parser;
mod processor;
pub mod server;
pub mod tracing;
pub mod types;
pub mod yt;

pub use archive::{ResultArchive, SaveRequest, SavedListing, SavedSummary};
pub use deadline::{bounded, Interrupted};
pub use error::{Error, ErrorKind, PersistenceError, SummaryError, TranscriptError, ValidationError};
pub use llm::{openai, supadata};
pub use llm::{
    openai::{CompletionOptions, OpenAIClient},
    summarizer::{summarize_transcript, Summarizer},
    supadata::{SupadataClient, TranscriptLookup},
    transcriber::{fetch_transcript, Transcriber},
};
pub use processor::{builder::SummaryPipelineBuilder, StateObserver, SummaryPipeline};
