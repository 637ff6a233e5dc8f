mod orchestrator;
mod types;

pub use orchestrator::{run_filter, run_focal_stack, run_focal_stack_reported};
pub use types::{FocalStackOutput, PipelineStage, ProgressReporter};
