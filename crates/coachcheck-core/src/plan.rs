use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{
    parser::extract_transcript_text,
    patterns::extract_patterns,
    segmenter::segment_activities,
    types::{Activity, CoachingLanguage, DerivedSessionPlan, Transcript},
};

const MAX_DESCRIPTION_CHARS: usize = 300;
const MAX_QUOTES: usize = 5;
const MAX_KEY_POINTS: usize = 5;
const MIN_KEY_POINT_CHARS: usize = 15;
const MAX_KEY_POINT_CHARS: usize = 150;

/// Ordered activity-naming rules, first match wins. Reordering changes
/// output, so the table is configuration, not an unordered rule set.
static ACTIVITY_NAME_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\bwarm[\s-]?up\b", "Warm-Up"),
        (r"(?i)\bstretch(?:ing|es)?\b", "Stretching"),
        (r"(?i)\bdiv(?:e|ing)\b", "Diving Practice"),
        (r"(?i)\bshot[\s-]?stopping\b|\bsaves?\b", "Shot-Stopping"),
        (r"(?i)\b1\s?v\s?1\b|\bone[\s-]on[\s-]one\b", "1v1 Scenarios"),
        (r"(?i)\bcross(?:es|ing)?\b|\bhigh ball\b", "Dealing with Crosses"),
        (r"(?i)\bdistribution\b|\bthrow(?:ing)?\b|\bgoal kick\b", "Distribution"),
        (r"(?i)\bfootwork\b", "Footwork"),
        (r"(?i)\bcool[\s-]?down\b", "Cool-Down"),
        (r"(?i)\bdebrief\b|\bbring it in\b|\brecap\b", "Debrief"),
    ]
    .into_iter()
    .map(|(pattern, name)| (Regex::new(pattern).expect("valid activity name regex"), name))
    .collect()
});

/// Sentence-fragment patterns that tend to carry a coaching point. Ordered,
/// hand-tuned configuration like the naming rules.
static KEY_POINT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bremember[^.!?]*",
        r"(?i)\bfocus on[^.!?]*",
        r"(?i)\bimportant[^.!?]*",
        r"(?i)\bmake sure[^.!?]*",
        r"(?i)\bkey (?:thing|point)[^.!?]*",
        r"(?i)\balways [^.!?]*",
        r"(?i)\bnever [^.!?]*",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("valid key point regex"))
    .collect()
});

/// Format seconds as M:SS (minutes unpadded).
pub fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

fn rounded_minutes(seconds: f64) -> u64 {
    (seconds.max(0.0) / 60.0).round() as u64
}

fn name_activity(text: &str, index: usize) -> String {
    for (pattern, name) in ACTIVITY_NAME_RULES.iter() {
        if pattern.is_match(text) {
            return (*name).to_string();
        }
    }
    format!("Activity {}", index + 1)
}

fn extract_key_points(text: &str) -> Vec<String> {
    let mut points = Vec::new();
    for pattern in KEY_POINT_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            let fragment = m.as_str().trim();
            let len = fragment.chars().count();
            if len < MIN_KEY_POINT_CHARS || len > MAX_KEY_POINT_CHARS {
                continue;
            }
            points.push(fragment.to_string());
            if points.len() >= MAX_KEY_POINTS {
                return points;
            }
        }
    }
    points
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let truncated: String = text.chars().take(limit).collect();
    format!("{}...", truncated)
}

/// Synthesize a structured session plan from a transcript: one activity per
/// segmenter range, plus session-wide coaching language.
pub fn derive_session_plan(transcript: &Transcript) -> DerivedSessionPlan {
    let ranges = segment_activities(transcript);
    let mut activities = Vec::with_capacity(ranges.len());

    for (index, range) in ranges.iter().enumerate() {
        let slice = &transcript.segments[range.clone()];
        let text = slice
            .iter()
            .map(|seg| seg.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let patterns = extract_patterns(&text);
        let mut quotes: Vec<String> = patterns.instructions.iter().take(3).cloned().collect();
        quotes.extend(patterns.feedback.iter().take(2).cloned());
        quotes.truncate(MAX_QUOTES);

        let start = slice.first().map(|s| s.start).unwrap_or(0.0);
        let end = slice.last().map(|s| s.end).unwrap_or(start);

        activities.push(Activity {
            name: name_activity(&text, index),
            time_range: format!("{} - {}", format_clock(start), format_clock(end)),
            duration: format!("{} min", rounded_minutes(end - start)),
            description: truncate_chars(&text, MAX_DESCRIPTION_CHARS),
            coaching_quotes: quotes,
            key_points: extract_key_points(&text),
        });
    }

    let total_start = transcript.segments.first().map(|s| s.start).unwrap_or(0.0);
    let total_end = transcript.segments.last().map(|s| s.end).unwrap_or(0.0);
    let mut names: Vec<&str> = Vec::new();
    for activity in &activities {
        if !names.contains(&activity.name.as_str()) {
            names.push(&activity.name);
        }
    }
    let overview = format!(
        "{} min session: {}",
        rounded_minutes(total_end - total_start),
        names.join(", ")
    );

    // Session-wide coaching language comes from one pass over the whole
    // transcript, independent of the per-activity extractions.
    let session_patterns = extract_patterns(&extract_transcript_text(transcript));
    let coaching_language = CoachingLanguage {
        feedback_examples: session_patterns.feedback,
        questioning_examples: session_patterns.questions,
        instruction_examples: session_patterns.instructions,
    };

    debug!(activities = activities.len(), "derived session plan");
    DerivedSessionPlan {
        overview,
        activities,
        coaching_language,
    }
}

/// Deterministic flattening of a derived plan, used as the plan-side text
/// view during validation. Same plan always yields the same text.
pub fn session_plan_to_text(plan: &DerivedSessionPlan) -> String {
    let mut output = String::new();

    output.push_str("Session Overview\n");
    output.push_str(&plan.overview);
    output.push_str("\n\n");

    for activity in &plan.activities {
        output.push_str(&format!(
            "{} ({}, {})\n",
            activity.name, activity.time_range, activity.duration
        ));
        output.push_str(&activity.description);
        output.push('\n');
        if !activity.coaching_quotes.is_empty() {
            output.push_str("Coaching quotes:\n");
            for quote in &activity.coaching_quotes {
                output.push_str(&format!("\"{}\"\n", quote));
            }
        }
        if !activity.key_points.is_empty() {
            output.push_str("Key points:\n");
            for point in &activity.key_points {
                output.push_str(&format!("- {}\n", point));
            }
        }
        output.push('\n');
    }

    output.push_str("Coaching Language Patterns\n");
    output.push_str("Feedback examples:\n");
    for example in &plan.coaching_language.feedback_examples {
        output.push_str(&format!("- {}\n", example));
    }
    output.push_str("Questions:\n");
    for example in &plan.coaching_language.questioning_examples {
        output.push_str(&format!("- {}\n", example));
    }
    output.push_str("Instructions:\n");
    for example in &plan.coaching_language.instruction_examples {
        output.push_str(&format!("- {}\n", example));
    }

    output
}
