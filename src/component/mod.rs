//! 功能元件模組
//!
//! 每個子模組負責流程中的一個階段，`media_pipeline` 依序串起所有階段

pub mod adaptive_transcoder;
pub mod audio_normalizer;
pub mod media_pipeline;
pub mod metadata_probe;
pub mod remux_planner;
pub mod stream_extractor;
pub mod track_classifier;

pub use adaptive_transcoder::AdaptiveTranscoder;
pub use audio_normalizer::AudioNormalizer;
pub use media_pipeline::{BatchReport, BatchRunner, MediaPipeline, PipelineOutcome};
pub use metadata_probe::MetadataProbe;
pub use remux_planner::RemuxPlanner;
pub use stream_extractor::StreamExtractor;
