//! Document analysis pipeline.

mod defaults;
mod pipeline;
mod types;

pub use defaults::{
    extraction_default, service_default, EXTRACTION_DEFAULT_SCORE, SERVICE_DEFAULT_SCORE,
};
pub use pipeline::{AnalysisPipeline, PipelineOptions};
pub use types::{AnalysisOutcome, DegradedReason, PipelineEvent};
