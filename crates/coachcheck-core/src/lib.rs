//! Coachcheck Core Library
//!
//! Core functionality for turning recorded coaching sessions into structured
//! plans and validating them against pedagogical principles with
//! semantic-similarity evidence.

pub mod chunk;
pub mod detect;
pub mod embedding;
pub mod error;
pub mod format;
pub mod metrics;
pub mod parser;
pub mod patterns;
pub mod plan;
pub mod provider;
pub mod segmenter;
pub mod types;
pub mod validator;

// Re-export commonly used items at crate root
pub use chunk::split_into_chunks;
pub use detect::{detect_format, is_transcript};
pub use embedding::{EmbeddingProvider, HashingEmbedder, cosine_similarity};
pub use error::{Result, ValidatorError};
pub use format::format_validation_readable;
pub use metrics::{ActivitySpace, SessionEvaluation, evaluate_activity, evaluate_session};
pub use parser::{extract_transcript_text, parse_transcript};
pub use patterns::{LanguagePatterns, extract_patterns};
pub use plan::{derive_session_plan, session_plan_to_text};
pub use provider::{Provider, ProviderConfig, RemoteEmbedder};
pub use segmenter::segment_activities;
pub use types::{
    Activity, CheckEvidence, CheckStatus, CoachingLanguage, DerivedSessionPlan, Principle,
    PrincipleResult, SearchHit, Segment, Transcript, TranscriptFormat, ValidationResult,
    ValidationSummary,
};
pub use validator::{Route, classify_route, validate_session};
