//! Word-boundary offsets for word-at-a-time reveal.

use super::slice::plain_text;
use super::span::Span;

/// Cumulative visible-character offsets, one per whitespace-delimited word,
/// each marking where that word ends.
///
/// The list is strictly ascending and, for non-empty text, always ends at the
/// total plain length so a word-mode reveal finishes on the trailing
/// whitespace too. Text without any visible characters yields an empty list.
pub fn word_boundaries(spans: &[Span]) -> Vec<usize> {
    let text = plain_text(spans);
    let mut boundaries = Vec::new();
    let mut offset = 0usize;
    let mut in_word = false;

    for c in text.chars() {
        let whitespace = c.is_whitespace();
        if in_word && whitespace {
            boundaries.push(offset);
        }
        in_word = !whitespace;
        offset += 1;
    }

    if offset > boundaries.last().copied().unwrap_or(0) {
        boundaries.push(offset);
    }

    boundaries
}
