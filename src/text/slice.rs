//! Visible-length arithmetic over span lists.

use super::span::Span;

/// Total count of visible characters across `spans`.
pub fn plain_length(spans: &[Span]) -> usize {
    spans.iter().map(Span::len).sum()
}

/// Concatenated visible text of `spans`, markup removed.
pub fn plain_text(spans: &[Span]) -> String {
    let mut out = String::with_capacity(spans.iter().map(|s| s.text.len()).sum());
    for span in spans {
        out.push_str(&span.text);
    }
    out
}

/// Returns the prefix of `spans` holding at most `budget` visible characters.
///
/// Spans that fit are copied unchanged; the span that straddles the budget is
/// truncated with its kind preserved, and nothing after it is emitted. A
/// budget at or beyond [`plain_length`] returns the full list.
pub fn slice_at(spans: &[Span], budget: usize) -> Vec<Span> {
    let mut remaining = budget;
    let mut visible = Vec::new();

    for span in spans {
        if remaining == 0 {
            break;
        }
        let len = span.len();
        if len <= remaining {
            visible.push(span.clone());
            remaining -= len;
        } else {
            visible.push(span.truncated(remaining));
            remaining = 0;
        }
    }

    visible
}
