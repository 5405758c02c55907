//! Bounded, overlapping window splitting for narrative and OCR content.
//!
//! Table statements never pass through here: they are atomic by invariant
//! and map 1:1 to chunks in the pipeline.

use docint_config::ChunkingConfig;

/// Splits text into overlapping windows, preferring paragraph boundaries,
/// then sentence boundaries, then a hard cut.
///
/// Every produced window is at most `max_size + overlap` characters.
#[derive(Debug, Clone)]
pub struct Splitter {
    max_size: usize,
    overlap: usize,
}

impl Splitter {
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            max_size: config.max_size,
            overlap: config.overlap,
        }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        if trimmed.chars().count() <= self.max_size {
            return vec![trimmed.to_string()];
        }

        // Decompose into segments no longer than max_size, splitting along
        // progressively harder boundaries.
        let mut segments: Vec<String> = Vec::new();
        for paragraph in trimmed.split("\n\n") {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }

            if paragraph.chars().count() <= self.max_size {
                segments.push(paragraph.to_string());
                continue;
            }

            for sentence in split_sentences(paragraph) {
                if sentence.chars().count() <= self.max_size {
                    segments.push(sentence.to_string());
                } else {
                    segments.extend(self.hard_cut(sentence));
                }
            }
        }

        self.pack(segments)
    }

    /// Pack segments into windows, carrying an overlap tail between them.
    fn pack(&self, segments: Vec<String>) -> Vec<String> {
        let mut windows = Vec::new();
        let mut current = String::new();
        // The first append after a carry goes in unconditionally; the carry
        // is at most `overlap` chars and each segment at most `max_size`,
        // which keeps every window within max_size + overlap.
        let mut fresh_carry = false;

        for segment in segments {
            let current_len = current.chars().count();
            let segment_len = segment.chars().count();

            if !fresh_carry && current_len > 0 && current_len + segment_len + 1 > self.max_size {
                windows.push(current.clone());
                current = self.overlap_tail(&current);
                fresh_carry = true;
            }

            if fresh_carry || current.is_empty() {
                current.push_str(&segment);
            } else {
                current.push(' ');
                current.push_str(&segment);
            }
            fresh_carry = false;
        }

        if !current.trim().is_empty() {
            windows.push(current);
        }

        windows
    }

    /// The last `overlap` characters of a window.
    fn overlap_tail(&self, window: &str) -> String {
        if self.overlap == 0 {
            return String::new();
        }
        let chars: Vec<char> = window.chars().collect();
        let skip = chars.len().saturating_sub(self.overlap);
        chars[skip..].iter().collect()
    }

    /// Cut text with no usable boundaries into max_size pieces.
    fn hard_cut(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut pieces = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = std::cmp::min(start + self.max_size, chars.len());
            pieces.push(chars[start..end].iter().collect());
            start = end;
        }

        pieces
    }
}

/// Split text at sentence punctuation followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if c == '.' || c == '!' || c == '?' {
            let next_idx = i + c.len_utf8();
            if next_idx >= text.len()
                || text[next_idx..].starts_with(' ')
                || text[next_idx..].starts_with('\n')
            {
                sentences.push(text[start..next_idx].trim());
                start = next_idx;
            }
        }
    }

    if start < text.len() {
        let remaining = text[start..].trim();
        if !remaining.is_empty() {
            sentences.push(remaining);
        }
    }

    if sentences.is_empty() && !text.trim().is_empty() {
        sentences.push(text.trim());
    }

    sentences
}
