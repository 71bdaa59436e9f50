use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::{
    detect::detect_format,
    error::{Result, ValidatorError},
    types::{Segment, Transcript, TranscriptFormat},
};

/// Typed shape of one segment in a JSON (Whisper-style) transcript.
/// `end` is optional; a missing value collapses to the start time.
#[derive(Debug, Deserialize)]
struct JsonSegment {
    start: f64,
    #[serde(default)]
    end: Option<f64>,
    text: String,
}

#[derive(Debug, Deserialize)]
struct JsonTranscriptDoc {
    segments: Vec<JsonSegment>,
    #[serde(default)]
    language: Option<String>,
}

/// Either accepted JSON transcript layout, tried in order: an object
/// carrying a `segments` array, or a bare array of segments.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonTranscriptInput {
    Document(JsonTranscriptDoc),
    Segments(Vec<JsonSegment>),
}

impl JsonTranscriptInput {
    fn into_parts(self) -> (Vec<JsonSegment>, Option<String>) {
        match self {
            JsonTranscriptInput::Document(doc) => (doc.segments, doc.language),
            JsonTranscriptInput::Segments(segments) => (segments, None),
        }
    }

}

#[derive(Debug, Deserialize)]
struct ProbeDoc {
    segments: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProbeInput {
    Document(ProbeDoc),
    Segments(Vec<serde_json::Value>),
}

/// Shape check used by the format detector: parse failures are swallowed.
/// Classification only requires valid JSON with a non-empty segment list
/// whose first element carries `text` and `start`; malformed later entries
/// are the parser's problem, not the detector's.
pub(crate) fn probe_json(input: &str) -> bool {
    let Ok(doc) = serde_json::from_str::<ProbeInput>(input) else {
        return false;
    };
    let segments = match &doc {
        ProbeInput::Document(doc) => &doc.segments,
        ProbeInput::Segments(segments) => segments,
    };
    segments
        .first()
        .is_some_and(|first| serde_json::from_value::<JsonSegment>(first.clone()).is_ok())
}

static SRT_TIMESTAMP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})")
        .expect("valid SRT timestamp regex")
});

// Long form tried first: HH:MM:SS.mmm, then MM:SS.mmm.
static VTT_TIMESTAMP_LONG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2})[.,](\d{3})$").expect("valid VTT long timestamp regex")
});
static VTT_TIMESTAMP_SHORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2})[.,](\d{3})$").expect("valid VTT short timestamp regex")
});

static VTT_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid VTT markup regex"));

/// Parse raw input into a uniform transcript. Dispatches on the detected
/// format; non-transcript input is a hard error, not an empty transcript.
pub fn parse_transcript(input: &str) -> Result<Transcript> {
    let format = detect_format(input).ok_or_else(|| ValidatorError::ParseFailed {
        format: "unknown".to_string(),
        reason: "input does not match any supported transcript format (json, srt, vtt)".to_string(),
    })?;

    let transcript = match format {
        TranscriptFormat::Json => parse_json(input)?,
        TranscriptFormat::Srt => parse_srt(input)?,
        TranscriptFormat::Vtt => parse_vtt(input)?,
    };

    if transcript.segments.is_empty() {
        return Err(ValidatorError::EmptyTranscript {
            format: format.name().to_string(),
        });
    }

    debug!(
        format = format.name(),
        segments = transcript.segments.len(),
        "parsed transcript"
    );
    Ok(transcript)
}

fn parse_json(input: &str) -> Result<Transcript> {
    let doc: JsonTranscriptInput =
        serde_json::from_str(input).map_err(|e| ValidatorError::ParseFailed {
            format: "json".to_string(),
            reason: e.to_string(),
        })?;
    let (raw_segments, language) = doc.into_parts();

    let segments = raw_segments
        .into_iter()
        .map(|seg| Segment {
            start: seg.start,
            end: seg.end.unwrap_or(seg.start),
            text: seg.text.trim().to_string(),
        })
        .collect();

    Ok(Transcript {
        segments,
        language,
        format: TranscriptFormat::Json,
    })
}

fn parse_srt(input: &str) -> Result<Transcript> {
    let normalized = input.replace("\r\n", "\n");
    let mut segments = Vec::new();

    for block in normalized.split("\n\n") {
        let lines: Vec<&str> = block
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        // index line, timestamp line, at least one text line
        if lines.len() < 3 {
            continue;
        }
        let Some(caps) = SRT_TIMESTAMP_LINE.captures(lines[1]) else {
            continue;
        };
        let start = srt_time_from_caps(&caps, 1);
        let end = srt_time_from_caps(&caps, 5);

        let text = lines[2..].join(" ").trim().to_string();
        if text.is_empty() {
            continue;
        }
        segments.push(Segment { start, end, text });
    }

    Ok(Transcript {
        segments,
        language: None,
        format: TranscriptFormat::Srt,
    })
}

fn srt_time_from_caps(caps: &regex::Captures<'_>, base: usize) -> f64 {
    let field = |i: usize| caps[base + i].parse::<f64>().unwrap_or(0.0);
    field(0) * 3600.0 + field(1) * 60.0 + field(2) + field(3) / 1000.0
}

/// Parse a single VTT timestamp token, long form first.
fn parse_vtt_timestamp(token: &str) -> Option<f64> {
    if let Some(caps) = VTT_TIMESTAMP_LONG.captures(token) {
        let field = |i: usize| caps[i].parse::<f64>().unwrap_or(0.0);
        return Some(field(1) * 3600.0 + field(2) * 60.0 + field(3) + field(4) / 1000.0);
    }
    if let Some(caps) = VTT_TIMESTAMP_SHORT.captures(token) {
        let field = |i: usize| caps[i].parse::<f64>().unwrap_or(0.0);
        return Some(field(1) * 60.0 + field(2) + field(3) / 1000.0);
    }
    None
}

fn is_cue_identifier(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c.is_ascii_digit())
}

fn clean_vtt_text(line: &str) -> String {
    VTT_MARKUP
        .replace_all(line, "")
        .replace("&nbsp;", " ")
        .trim()
        .to_string()
}

fn parse_vtt(input: &str) -> Result<Transcript> {
    let lines: Vec<&str> = input.lines().collect();
    let mut segments = Vec::new();

    // Everything before the first cue timing line is header/metadata.
    let mut i = 0;
    while i < lines.len() && !lines[i].contains("-->") {
        i += 1;
    }

    while i < lines.len() {
        let line = lines[i].trim();
        if !line.contains("-->") {
            i += 1;
            continue;
        }

        let mut halves = line.splitn(2, "-->");
        let start_token = halves.next().unwrap_or("").trim();
        // Cue settings may trail the end timestamp; keep the first token only.
        let end_token = halves
            .next()
            .unwrap_or("")
            .trim()
            .split_whitespace()
            .next()
            .unwrap_or("");

        let (Some(start), Some(end)) = (
            parse_vtt_timestamp(start_token),
            parse_vtt_timestamp(end_token),
        ) else {
            i += 1;
            continue;
        };

        i += 1;
        let mut body = Vec::new();
        while i < lines.len() {
            let text_line = lines[i].trim();
            if text_line.is_empty() || text_line.contains("-->") {
                break;
            }
            if !is_cue_identifier(text_line) {
                let cleaned = clean_vtt_text(text_line);
                if !cleaned.is_empty() {
                    body.push(cleaned);
                }
            }
            i += 1;
        }

        let text = body.join(" ");
        if !text.is_empty() {
            segments.push(Segment { start, end, text });
        }
    }

    Ok(Transcript {
        segments,
        language: None,
        format: TranscriptFormat::Vtt,
    })
}

/// Flatten a transcript back to plain text, segment texts joined by spaces.
pub fn extract_transcript_text(transcript: &Transcript) -> String {
    transcript
        .segments
        .iter()
        .map(|seg| seg.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip_text() {
        let input = r#"{"segments": [
            {"start": 0.0, "end": 2.0, "text": "Hello"},
            {"start": 2.0, "end": 4.0, "text": "world"}
        ]}"#;
        let transcript = parse_transcript(input).unwrap();
        assert_eq!(transcript.format, TranscriptFormat::Json);
        assert_eq!(extract_transcript_text(&transcript), "Hello world");
    }

    #[test]
    fn json_bare_array_parses() {
        let input = r#"[{"start": 1.5, "text": "No end field"}]"#;
        let transcript = parse_transcript(input).unwrap();
        assert_eq!(transcript.segments.len(), 1);
        assert_eq!(transcript.segments[0].end, 1.5);
    }

    #[test]
    fn json_with_malformed_later_entry_is_a_parse_failure() {
        let input = r#"{"segments": [
            {"start": 0, "end": 1, "text": "hello there everyone"},
            {"oops": true}
        ]}"#;
        let err = parse_transcript(input).unwrap_err();
        assert!(matches!(err, ValidatorError::ParseFailed { .. }));
    }

    #[test]
    fn srt_timestamp_seconds() {
        let caps = SRT_TIMESTAMP_LINE
            .captures("00:01:02,500 --> 00:01:04,000")
            .unwrap();
        assert_eq!(srt_time_from_caps(&caps, 1), 62.5);
        assert_eq!(srt_time_from_caps(&caps, 5), 64.0);
    }

    #[test]
    fn srt_blocks_parse_and_join_text_lines() {
        let input = "1\n00:00:00,000 --> 00:00:02,000\nGreat save!\nKeep your hands up.\n\n2\n00:00:05,000 --> 00:00:07,500\nNext drill.\n";
        let transcript = parse_transcript(input).unwrap();
        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].text, "Great save! Keep your hands up.");
        assert_eq!(transcript.segments[1].start, 5.0);
        assert_eq!(transcript.segments[1].end, 7.5);
    }

    #[test]
    fn srt_accepts_dot_millis() {
        let input = "1\n00:00:01.250 --> 00:00:03.750\nWell done.\n";
        let transcript = parse_transcript(input).unwrap();
        assert_eq!(transcript.segments[0].start, 1.25);
        assert_eq!(transcript.segments[0].end, 3.75);
    }

    #[test]
    fn vtt_short_and_long_timestamps() {
        let input = "WEBVTT\nKind: captions\n\n00:05.000 --> 00:07.000\nShort form cue\n\n00:01:10.000 --> 00:01:12.000\nLong form cue\n";
        let transcript = parse_transcript(input).unwrap();
        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].start, 5.0);
        assert_eq!(transcript.segments[1].start, 70.0);
    }

    #[test]
    fn vtt_strips_markup_and_cue_identifiers() {
        let input = "WEBVTT\n\n1\n00:00.000 --> 00:02.000\n<v Coach>Good&nbsp;work</v>\n42\n";
        let transcript = parse_transcript(input).unwrap();
        assert_eq!(transcript.segments.len(), 1);
        assert_eq!(transcript.segments[0].text, "Good work");
    }

    #[test]
    fn vtt_with_no_cues_is_empty_transcript_error() {
        let err = parse_transcript("WEBVTT\nKind: captions\n").unwrap_err();
        assert!(matches!(err, ValidatorError::EmptyTranscript { .. }));
    }

    #[test]
    fn plain_text_is_a_parse_failure() {
        let err = parse_transcript("Just a session plan").unwrap_err();
        assert!(matches!(err, ValidatorError::ParseFailed { .. }));
    }
}
