use crate::patterns::split_sentences;

/// Soft cap on chunk size. Oversized paragraphs fall back to sentence
/// accumulation up to this cap.
const CHUNK_SOFT_CAP: usize = 300;

/// Chunks shorter than this after trimming carry no usable signal.
const MIN_CHUNK_CHARS: usize = 20;

/// Split a paragraph further at newlines that lead into an uppercase line,
/// a cheap heading/list-item heuristic for plan text.
fn split_on_uppercase_lines(paragraph: &str) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for line in paragraph.lines() {
        let starts_upper = line
            .trim_start()
            .chars()
            .next()
            .is_some_and(|c| c.is_uppercase());
        match parts.last_mut() {
            Some(current) if !starts_upper => {
                current.push(' ');
                current.push_str(line.trim());
            }
            _ => parts.push(line.trim().to_string()),
        }
    }
    parts
}

fn accumulate_sentences(paragraph: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for sentence in split_sentences(paragraph) {
        if !current.is_empty()
            && current.chars().count() + sentence.chars().count() + 1 > CHUNK_SOFT_CAP
        {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&sentence);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Split a text view into the semantic chunks the validator compares
/// against. Paragraph-first, sentence fallback for oversized paragraphs,
/// sub-minimum chunks dropped.
pub fn split_into_chunks(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");
    let mut chunks = Vec::new();

    for block in normalized.split("\n\n") {
        for paragraph in split_on_uppercase_lines(block) {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }
            if paragraph.chars().count() <= CHUNK_SOFT_CAP {
                chunks.push(paragraph.to_string());
            } else {
                chunks.extend(accumulate_sentences(paragraph));
            }
        }
    }

    chunks.retain(|chunk| chunk.trim().chars().count() >= MIN_CHUNK_CHARS);
    chunks
}
