use std::{ops::Range, sync::LazyLock};

use regex::Regex;
use tracing::debug;

use crate::types::Transcript;

/// A silence longer than this between consecutive segments suggests the
/// group moved to a different exercise.
const GAP_THRESHOLD_SECS: f64 = 10.0;

/// Minimum segments per activity. Candidate boundaries inside this window
/// are rejected so back-to-back trigger phrases cannot shred one activity
/// into fragments.
const MIN_SEGMENTS_PER_ACTIVITY: usize = 10;

/// Coach phrases that mark the start of a new exercise. Hand-tuned list;
/// membership and order are configuration, matched case-insensitively on
/// word boundaries.
const TRANSITION_PHRASES: &[&str] = &[
    "let's start",
    "let's begin",
    "let's move on",
    "moving on",
    "next drill",
    "next exercise",
    "next activity",
    "on to the next",
    "rotate",
    "switch sides",
    "switch over",
    "bring it in",
    "gather round",
    "gather around",
    "water break",
    "cool down",
    "warm up time",
    "last drill",
];

static TRANSITION_MATCHER: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = TRANSITION_PHRASES
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("valid transition phrase regex")
});

fn is_transition(text: &str) -> bool {
    TRANSITION_MATCHER.is_match(text)
}

/// Partition a transcript into activity index ranges. Ranges cover every
/// segment exactly once, in original order, non-overlapping. Index 0 is
/// always an implicit boundary.
pub fn segment_activities(transcript: &Transcript) -> Vec<Range<usize>> {
    let segments = &transcript.segments;
    if segments.is_empty() {
        return Vec::new();
    }

    let mut boundaries = vec![0usize];
    for i in 1..segments.len() {
        let gap = segments[i].start - segments[i - 1].end;
        let candidate = gap > GAP_THRESHOLD_SECS || is_transition(&segments[i].text);
        if !candidate {
            continue;
        }
        let since_last = i - boundaries.last().copied().unwrap_or(0);
        if since_last >= MIN_SEGMENTS_PER_ACTIVITY {
            boundaries.push(i);
        }
    }

    let mut ranges = Vec::with_capacity(boundaries.len());
    for (idx, &start) in boundaries.iter().enumerate() {
        let end = boundaries
            .get(idx + 1)
            .copied()
            .unwrap_or(segments.len());
        ranges.push(start..end);
    }

    debug!(activities = ranges.len(), "segmented transcript");
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Segment, Transcript, TranscriptFormat};

    fn transcript(segments: Vec<Segment>) -> Transcript {
        Transcript {
            segments,
            language: None,
            format: TranscriptFormat::Json,
        }
    }

    fn seg(start: f64, end: f64, text: &str) -> Segment {
        Segment {
            start,
            end,
            text: text.to_string(),
        }
    }

    #[test]
    fn single_activity_without_triggers() {
        let t = transcript((0..20).map(|i| seg(i as f64, i as f64 + 1.0, "keep going")).collect());
        let ranges = segment_activities(&t);
        assert_eq!(ranges, vec![0..20]);
    }

    #[test]
    fn time_gap_opens_a_boundary() {
        let mut segments: Vec<Segment> =
            (0..12).map(|i| seg(i as f64, i as f64 + 1.0, "passing")).collect();
        // 30 second silence before the 13th segment
        for i in 0..10 {
            let base = 43.0 + i as f64;
            segments.push(seg(base, base + 1.0, "shooting"));
        }
        let ranges = segment_activities(&transcript(segments));
        assert_eq!(ranges, vec![0..12, 12..22]);
    }

    #[test]
    fn transition_phrase_opens_a_boundary() {
        let mut segments: Vec<Segment> =
            (0..15).map(|i| seg(i as f64, i as f64 + 1.0, "good work")).collect();
        segments.push(seg(15.0, 16.0, "Okay, bring it in everyone"));
        for i in 0..12 {
            let base = 16.0 + i as f64;
            segments.push(seg(base, base + 1.0, "debrief talk"));
        }
        let ranges = segment_activities(&transcript(segments));
        assert_eq!(ranges, vec![0..15, 15..28]);
    }

    #[test]
    fn boundaries_respect_the_cooldown_window() {
        // A trigger phrase on every segment must still yield activities of
        // at least MIN_SEGMENTS_PER_ACTIVITY segments.
        let segments: Vec<Segment> = (0..35)
            .map(|i| seg(i as f64, i as f64 + 1.0, "rotate now"))
            .collect();
        let ranges = segment_activities(&transcript(segments));
        assert_eq!(ranges, vec![0..10, 10..20, 20..30, 30..35]);
        for pair in ranges.windows(2) {
            assert!(pair[0].len() >= MIN_SEGMENTS_PER_ACTIVITY);
        }
    }

    #[test]
    fn ranges_cover_all_segments_exactly_once() {
        let segments: Vec<Segment> = (0..27)
            .map(|i| {
                let gap = if i % 7 == 0 { 20.0 } else { 0.0 };
                seg(i as f64 * 2.0 + gap, i as f64 * 2.0 + gap + 1.0, "drill")
            })
            .collect();
        let t = transcript(segments);
        let ranges = segment_activities(&t);
        let mut covered = 0;
        for range in &ranges {
            assert_eq!(range.start, covered);
            covered = range.end;
        }
        assert_eq!(covered, t.segments.len());
    }

    #[test]
    fn empty_transcript_yields_no_activities() {
        assert!(segment_activities(&transcript(Vec::new())).is_empty());
    }
}
