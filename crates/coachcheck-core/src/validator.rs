use tracing::{debug, info};

use crate::{
    chunk::split_into_chunks,
    detect::is_transcript,
    embedding::{EmbeddingProvider, rank_by_similarity},
    error::Result,
    parser::{extract_transcript_text, parse_transcript},
    plan::{derive_session_plan, session_plan_to_text},
    types::{
        CheckEvidence, CheckStatus, Principle, PrincipleResult, ValidationResult,
        ValidationSummary,
    },
};

const PASS_THRESHOLD: f64 = 0.55;
const WARNING_THRESHOLD: f64 = 0.40;
const TOP_CHUNKS_PER_CHECK: usize = 3;
const SUPPORTING_PASSAGES: usize = 3;
const MAX_EVIDENCE_CHARS: usize = 200;

/// Principles about what the coach said out loud evaluate against the
/// transcript view. Hand-tuned lexicon, matched as case-insensitive
/// substrings of name + description; disjoint from PLAN_KEYWORDS.
const TRANSCRIPT_KEYWORDS: &[&str] = &[
    "feedback",
    "praise",
    "questioning",
    "verbal",
    "communication",
    "cue",
    "wait time",
    "encouragement",
    "talk",
    "voice",
    "demonstration",
];

/// Principles about session design evaluate against the derived-plan view.
const PLAN_KEYWORDS: &[&str] = &[
    "design",
    "constraint",
    "activity",
    "progression",
    "spatial",
    "layout",
    "equipment",
    "zone",
    "area",
    "space",
    "structure",
    "organisation",
];

/// Which text view a principle's checks are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Transcript,
    Plan,
    Both,
}

/// Classify a principle by scanning name + description against the two
/// keyword sets. Only transcript keywords -> transcript view; only plan
/// keywords -> plan view; both or neither -> both views.
pub fn classify_route(principle: &Principle) -> Route {
    let haystack = format!("{} {}", principle.name, principle.description).to_lowercase();
    let transcript_hit = TRANSCRIPT_KEYWORDS.iter().any(|kw| haystack.contains(kw));
    let plan_hit = PLAN_KEYWORDS.iter().any(|kw| haystack.contains(kw));
    match (transcript_hit, plan_hit) {
        (true, false) => Route::Transcript,
        (false, true) => Route::Plan,
        _ => Route::Both,
    }
}

fn status_for_score(score: f64) -> CheckStatus {
    if score >= PASS_THRESHOLD {
        CheckStatus::Pass
    } else if score >= WARNING_THRESHOLD {
        CheckStatus::Warning
    } else {
        CheckStatus::Fail
    }
}

fn excerpt(chunk: &str) -> String {
    if chunk.chars().count() <= MAX_EVIDENCE_CHARS {
        return chunk.to_string();
    }
    let truncated: String = chunk.chars().take(MAX_EVIDENCE_CHARS).collect();
    format!("{}...", truncated)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One text view with its chunk embeddings, computed once per validation
/// call and shared across all principles routed to it.
struct ChunkSet {
    chunks: Vec<String>,
    vectors: Vec<Vec<f32>>,
}

impl ChunkSet {
    async fn build(provider: &dyn EmbeddingProvider, text: &str) -> Result<Self> {
        let chunks = split_into_chunks(text);
        let mut vectors = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            vectors.push(provider.embed(chunk).await?);
        }
        Ok(Self { chunks, vectors })
    }

    fn concat(a: &ChunkSet, b: &ChunkSet) -> ChunkSet {
        ChunkSet {
            chunks: a.chunks.iter().chain(b.chunks.iter()).cloned().collect(),
            vectors: a.vectors.iter().chain(b.vectors.iter()).cloned().collect(),
        }
    }
}

async fn evaluate_check(
    provider: &dyn EmbeddingProvider,
    question: &str,
    chunk_set: &ChunkSet,
) -> Result<CheckEvidence> {
    // Degenerate chunk set: lowest-confidence outcome, never an error.
    if chunk_set.chunks.is_empty() {
        return Ok(CheckEvidence {
            question: question.to_string(),
            score: 0.0,
            status: CheckStatus::Fail,
            evidence: Vec::new(),
        });
    }

    let question_vector = provider.embed(question).await?;
    let ranked = rank_by_similarity(&question_vector, &chunk_set.vectors);
    let top: Vec<(usize, f64)> = ranked
        .into_iter()
        .take(TOP_CHUNKS_PER_CHECK)
        .map(|(i, score)| (i, score as f64))
        .collect();

    let top_score = top.first().map(|(_, s)| *s).unwrap_or(0.0);
    let evidence = top
        .iter()
        .filter(|(_, score)| *score >= WARNING_THRESHOLD)
        .map(|(i, _)| excerpt(&chunk_set.chunks[*i]))
        .collect();

    Ok(CheckEvidence {
        question: question.to_string(),
        score: top_score,
        status: status_for_score(top_score),
        evidence,
    })
}

fn aggregate_principle(
    principle: &Principle,
    findings: Vec<CheckEvidence>,
    supporting_passages: Vec<crate::types::SearchHit>,
) -> PrincipleResult {
    // A principle with zero checks degrades to fail/0.0 rather than
    // dividing by zero.
    if findings.is_empty() {
        return PrincipleResult {
            name: principle.name.clone(),
            status: CheckStatus::Fail,
            confidence: 0.0,
            findings,
            suggestions: Vec::new(),
            supporting_passages,
        };
    }

    let total = findings.len();
    let majority = total.div_ceil(2);
    let pass_count = findings.iter().filter(|f| f.status == CheckStatus::Pass).count();
    let fail_count = findings.iter().filter(|f| f.status == CheckStatus::Fail).count();

    let status = if pass_count >= majority {
        CheckStatus::Pass
    } else if fail_count >= majority {
        CheckStatus::Fail
    } else {
        CheckStatus::Warning
    };

    let confidence = round2(findings.iter().map(|f| f.score).sum::<f64>() / total as f64);

    let suggestions = findings
        .iter()
        .filter_map(|f| match f.status {
            CheckStatus::Fail => Some(format!("Missing: {}", f.question)),
            CheckStatus::Warning => Some(format!("Strengthen: {}", f.question)),
            CheckStatus::Pass => None,
        })
        .collect();

    PrincipleResult {
        name: principle.name.clone(),
        status,
        confidence,
        findings,
        suggestions,
        supporting_passages,
    }
}

/// Evaluate every principle against the session. Plain text is treated as a
/// session plan and used for both views; transcript input is parsed, a plan
/// is derived, and each principle is routed to the view it speaks about.
pub async fn validate_session(
    provider: &dyn EmbeddingProvider,
    principles: &[Principle],
    input: &str,
) -> Result<ValidationResult> {
    let transcript_input = is_transcript(input);

    let (transcript_set, plan_set) = if transcript_input {
        let transcript = parse_transcript(input)?;
        let plan = derive_session_plan(&transcript);
        let transcript_text = extract_transcript_text(&transcript);
        let plan_text = session_plan_to_text(&plan);
        (
            ChunkSet::build(provider, &transcript_text).await?,
            Some(ChunkSet::build(provider, &plan_text).await?),
        )
    } else {
        (ChunkSet::build(provider, input).await?, None)
    };

    let mut results = Vec::with_capacity(principles.len());
    for principle in principles {
        let route = if transcript_input {
            classify_route(principle)
        } else {
            Route::Both
        };
        debug!(principle = %principle.name, ?route, "evaluating principle");

        // Plain-text input has a single chunk set, so "both" is that set.
        let combined;
        let chunk_set: &ChunkSet = match (&plan_set, route) {
            (Some(plan), Route::Plan) => plan,
            (Some(plan), Route::Both) => {
                combined = ChunkSet::concat(&transcript_set, plan);
                &combined
            }
            _ => &transcript_set,
        };

        let mut findings = Vec::with_capacity(principle.checks.len());
        for question in &principle.checks {
            findings.push(evaluate_check(provider, question, chunk_set).await?);
        }

        let supporting_passages = provider
            .search(
                &format!("{} {}", principle.name, principle.description),
                SUPPORTING_PASSAGES,
            )
            .await?;

        results.push(aggregate_principle(principle, findings, supporting_passages));
    }

    let passed = results.iter().filter(|r| r.status == CheckStatus::Pass).count();
    let warnings = results.iter().filter(|r| r.status == CheckStatus::Warning).count();
    let failed = results.iter().filter(|r| r.status == CheckStatus::Fail).count();
    let confidence = if results.is_empty() {
        0.0
    } else {
        round2(results.iter().map(|r| r.confidence).sum::<f64>() / results.len() as f64)
    };

    let mut message = if failed == 0 {
        "Session aligns well with the configured coaching principles.".to_string()
    } else {
        format!("{failed} principle(s) need attention.")
    };
    if transcript_input {
        message.push_str(" Transcript input was evaluated both as delivered (transcript view) and as designed (derived plan view).");
    }

    info!(passed, warnings, failed, confidence, "validation complete");
    Ok(ValidationResult {
        message,
        summary: ValidationSummary {
            passed,
            warnings,
            failed,
            confidence,
        },
        principles: results,
    })
}
