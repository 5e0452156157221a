mod batch;
mod main;

pub use batch::{BatchReport, BatchRunner, print_summary};
pub use main::{MediaPipeline, PipelineOutcome};
