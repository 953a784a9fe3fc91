use std::time::Duration;

use crate::{SummaryPipeline, Summarizer, Transcriber};

pub struct SummaryPipelineBuilder<T = (), S = ()> {
    transcriber: T,
    summarizer: S,
    transcript_timeout: Duration,
    summary_timeout: Duration,
}

impl SummaryPipelineBuilder {
    pub fn new() -> Self {
        Self {
            transcriber: (),
            summarizer: (),
            transcript_timeout: Duration::from_secs(30),
            summary_timeout: Duration::from_secs(60),
        }
    }
}

impl Default for SummaryPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> SummaryPipelineBuilder<T, S> {
    pub fn transcriber<T2: Transcriber + Send + Sync + 'static>(
        self,
        transcriber: T2,
    ) -> SummaryPipelineBuilder<T2, S> {
        SummaryPipelineBuilder {
            transcriber,
            summarizer: self.summarizer,
            transcript_timeout: self.transcript_timeout,
            summary_timeout: self.summary_timeout,
        }
    }

    pub fn summarizer<S2: Summarizer + Send + Sync + 'static>(
        self,
        summarizer: S2,
    ) -> SummaryPipelineBuilder<T, S2> {
        SummaryPipelineBuilder {
            transcriber: self.transcriber,
            summarizer,
            transcript_timeout: self.transcript_timeout,
            summary_timeout: self.summary_timeout,
        }
    }

    pub fn transcript_timeout(mut self, timeout: Duration) -> Self {
        self.transcript_timeout = timeout;
        self
    }

    pub fn summary_timeout(mut self, timeout: Duration) -> Self {
        self.summary_timeout = timeout;
        self
    }
}

impl<T, S> SummaryPipelineBuilder<T, S>
where
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    pub fn build(self) -> SummaryPipeline<T, S> {
        SummaryPipeline {
            transcriber: self.transcriber,
            summarizer: self.summarizer,
            transcript_timeout: self.transcript_timeout,
            summary_timeout: self.summary_timeout,
        }
    }
}
