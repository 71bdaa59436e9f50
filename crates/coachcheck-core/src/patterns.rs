use std::sync::LazyLock;

use regex::Regex;

/// Coaching-language sentences bucketed by function.
#[derive(Debug, Clone, Default)]
pub struct LanguagePatterns {
    pub feedback: Vec<String>,
    pub questions: Vec<String>,
    pub instructions: Vec<String>,
}

const MIN_SENTENCE_CHARS: usize = 10;
const MAX_SENTENCE_CHARS: usize = 200;

const MAX_FEEDBACK: usize = 15;
const MAX_QUESTIONS: usize = 10;
const MAX_INSTRUCTIONS: usize = 15;

/// Affective feedback markers. Ordered, case-insensitive, matched on word
/// boundaries; membership is hand-tuned configuration.
const FEEDBACK_MARKERS: &[&str] = &[
    "well done",
    "good job",
    "good work",
    "nice",
    "great",
    "good",
    "excellent",
    "brilliant",
    "perfect",
    "exactly",
    "that's it",
    "lovely",
    "much better",
    "keep it up",
    "super",
];

/// Directive instruction markers, same conventions as the feedback list.
const INSTRUCTION_MARKERS: &[&str] = &[
    "make sure",
    "remember",
    "keep",
    "try to",
    "focus",
    "position",
    "hands",
    "feet",
    "body",
    "step",
    "push",
    "drive",
    "stay",
    "hold",
    "watch",
    "don't",
    "set yourself",
    "get your",
    "move your",
];

fn marker_regex(markers: &[&str]) -> Regex {
    let alternation = markers
        .iter()
        .map(|m| regex::escape(m))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("valid marker regex")
}

static FEEDBACK_MATCHER: LazyLock<Regex> = LazyLock::new(|| marker_regex(FEEDBACK_MARKERS));
static INSTRUCTION_MATCHER: LazyLock<Regex> = LazyLock::new(|| marker_regex(INSTRUCTION_MARKERS));

/// A run of text up to and including its terminator(s), or a trailing
/// unterminated run. The regex crate has no lookbehind, so sentences are
/// matched rather than split.
static SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]*").expect("valid sentence regex"));

/// Split text into trimmed sentences on terminator punctuation.
pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Classify each usable sentence into exactly one bucket by priority:
/// question mark, then feedback lexicon, then instruction lexicon. Sentences
/// matching nothing are discarded. Buckets are capped, encounter order kept.
pub fn extract_patterns(text: &str) -> LanguagePatterns {
    let mut patterns = LanguagePatterns::default();

    for sentence in split_sentences(text) {
        let len = sentence.chars().count();
        if len < MIN_SENTENCE_CHARS || len > MAX_SENTENCE_CHARS {
            continue;
        }

        if sentence.contains('?') {
            if patterns.questions.len() < MAX_QUESTIONS {
                patterns.questions.push(sentence);
            }
        } else if FEEDBACK_MATCHER.is_match(&sentence) {
            if patterns.feedback.len() < MAX_FEEDBACK {
                patterns.feedback.push(sentence);
            }
        } else if INSTRUCTION_MATCHER.is_match(&sentence) {
            if patterns.instructions.len() < MAX_INSTRUCTIONS {
                patterns.instructions.push(sentence);
            }
        }
    }

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminators() {
        let sentences = split_sentences("Great save! Now reset. Ready again?");
        assert_eq!(sentences, vec!["Great save!", "Now reset.", "Ready again?"]);
    }

    #[test]
    fn question_wins_over_feedback_marker() {
        let patterns = extract_patterns("Was that a good dive into the corner?");
        assert_eq!(patterns.questions.len(), 1);
        assert!(patterns.feedback.is_empty());
    }

    #[test]
    fn feedback_wins_over_instruction_marker() {
        let patterns = extract_patterns("Well done, keep your hands strong.");
        assert_eq!(patterns.feedback.len(), 1);
        assert!(patterns.instructions.is_empty());
    }

    #[test]
    fn instruction_bucket_catches_directives() {
        let patterns = extract_patterns("Make sure your feet are set before the shot.");
        assert_eq!(patterns.instructions.len(), 1);
    }

    #[test]
    fn unmatched_and_short_sentences_are_discarded() {
        let patterns = extract_patterns("Yes. The weather is quite pleasant this evening here.");
        assert!(patterns.feedback.is_empty());
        assert!(patterns.questions.is_empty());
        assert!(patterns.instructions.is_empty());
    }

    #[test]
    fn overlong_sentences_are_discarded() {
        let long = format!("Keep going {}.", "and going ".repeat(30));
        assert!(long.chars().count() > 200);
        let patterns = extract_patterns(&long);
        assert!(patterns.instructions.is_empty());
    }

    #[test]
    fn buckets_are_capped_in_encounter_order() {
        let text = (0..20)
            .map(|i| format!("Is attempt number {i} looking sharp enough?"))
            .collect::<Vec<_>>()
            .join(" ");
        let patterns = extract_patterns(&text);
        assert_eq!(patterns.questions.len(), 10);
        assert!(patterns.questions[0].contains("number 0"));
        assert!(patterns.questions[9].contains("number 9"));
    }
}
