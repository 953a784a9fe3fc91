use std::sync::Mutex;
use summary_pulse::{types::PipelineState, StateObserver};

/// Records every state the pipeline reports.
#[derive(Default)]
pub struct RecordingObserver {
    pub states: Mutex<Vec<PipelineState>>,
}

impl RecordingObserver {
    pub fn states(&self) -> Vec<PipelineState> {
        self.states.lock().unwrap().clone()
    }
}

impl StateObserver for RecordingObserver {
    fn observe(&self, state: PipelineState) {
        self.states.lock().unwrap().push(state);
    }
}
