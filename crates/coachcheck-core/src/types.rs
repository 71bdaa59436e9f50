use serde::{Deserialize, Serialize};

/// Source format a transcript was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptFormat {
    Json,
    Srt,
    Vtt,
}

impl TranscriptFormat {
    pub fn name(&self) -> &'static str {
        match self {
            TranscriptFormat::Json => "json",
            TranscriptFormat::Srt => "srt",
            TranscriptFormat::Vtt => "vtt",
        }
    }
}

/// A timed span of transcript text. `start <= end`, seconds from session start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub language: Option<String>,
    pub format: TranscriptFormat,
}

/// A contiguous run of segments treated as one coaching exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub time_range: String,
    pub duration: String,
    pub description: String,
    pub coaching_quotes: Vec<String>,
    pub key_points: Vec<String>,
}

/// Coaching-language examples extracted across the whole session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoachingLanguage {
    pub feedback_examples: Vec<String>,
    pub questioning_examples: Vec<String>,
    pub instruction_examples: Vec<String>,
}

/// Structured reconstruction of a session's design, synthesized from a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedSessionPlan {
    pub overview: String,
    pub activities: Vec<Activity>,
    pub coaching_language: CoachingLanguage,
}

/// A named pedagogical criterion with one or more yes/no check questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principle {
    pub name: String,
    pub description: String,
    pub checks: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
}

/// Outcome of one check question: best similarity score, derived status,
/// and the chunk excerpts that support it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckEvidence {
    pub question: String,
    pub score: f64,
    pub status: CheckStatus,
    pub evidence: Vec<String>,
}

/// A reference passage returned by the collaborator's corpus search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipleResult {
    pub name: String,
    pub status: CheckStatus,
    pub confidence: f64,
    pub findings: Vec<CheckEvidence>,
    pub suggestions: Vec<String>,
    pub supporting_passages: Vec<SearchHit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub passed: usize,
    pub warnings: usize,
    pub failed: usize,
    pub confidence: f64,
}

/// Top-level result of one validation call. Constructed fresh per call,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub message: String,
    pub summary: ValidationSummary,
    pub principles: Vec<PrincipleResult>,
}
