use std::sync::LazyLock;

use regex::Regex;

use crate::{parser, types::TranscriptFormat};

/// An SRT file opens with a numeric cue index on its own line followed by a
/// timestamp line. Comma or dot decimal separators are both in the wild.
static SRT_PROBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\d+\s*\r?\n\s*\d{1,2}:\d{2}:\d{2}[,.]\d{3}\s*-->\s*\d{1,2}:\d{2}:\d{2}[,.]\d{3}")
        .expect("valid SRT probe regex")
});

/// Classify raw input. Checks run in a fixed priority order, first match wins:
/// JSON shape probe, then the WEBVTT header, then the SRT cue pattern.
/// `None` means the input is a plain-text session plan, not a transcript.
pub fn detect_format(input: &str) -> Option<TranscriptFormat> {
    if parser::probe_json(input) {
        return Some(TranscriptFormat::Json);
    }
    if input.trim_start().starts_with("WEBVTT") {
        return Some(TranscriptFormat::Vtt);
    }
    if SRT_PROBE.is_match(input) {
        return Some(TranscriptFormat::Srt);
    }
    None
}

pub fn is_transcript(input: &str) -> bool {
    detect_format(input).is_some()
}
