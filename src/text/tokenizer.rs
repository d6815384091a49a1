//! Inline markup tokenizer.
//!
//! Recognizes exactly five inline forms: bold (`**x**`, `__x__`), italic
//! (`*x*`, `_x_`), inline code (`` `x` ``), strikethrough (`~~x~~`) and links
//! (`[label](url)`). Every pattern is scanned independently over the whole
//! input; the pooled matches are then resolved left to right with
//! first-match-wins. Anything that does not complete a pattern stays plain.

use std::sync::LazyLock;

use regex::Regex;

use super::span::{Span, SpanKind};

// Pattern bodies are lazy, non-empty and never cross a line terminator.
const BODY: &str = r"([^\n\r\x{2028}\x{2029}]+?)";

static BOLD_ASTERISK: LazyLock<Regex> = LazyLock::new(|| compile(&format!(r"\*\*{BODY}\*\*")));
static BOLD_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| compile(&format!(r"__{BODY}__")));
static CODE: LazyLock<Regex> = LazyLock::new(|| compile(&format!(r"`{BODY}`")));
static STRIKETHROUGH: LazyLock<Regex> = LazyLock::new(|| compile(&format!(r"~~{BODY}~~")));
static LINK: LazyLock<Regex> = LazyLock::new(|| compile(&format!(r"\[{BODY}\]\({BODY}\)")));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in markup pattern must compile")
}

/// One pattern hit over the raw source, in byte offsets.
#[derive(Debug)]
struct MarkupMatch {
    start: usize,
    end: usize,
    span: Span,
}

/// Pattern priority. Matches that start at the same offset keep this order,
/// so bold always beats italic for the same delimiter character.
#[derive(Clone, Copy, Debug)]
enum Pattern {
    BoldAsterisk,
    BoldUnderscore,
    ItalicAsterisk,
    ItalicUnderscore,
    Code,
    Strikethrough,
    Link,
}

const PATTERNS: [Pattern; 7] = [
    Pattern::BoldAsterisk,
    Pattern::BoldUnderscore,
    Pattern::ItalicAsterisk,
    Pattern::ItalicUnderscore,
    Pattern::Code,
    Pattern::Strikethrough,
    Pattern::Link,
];

impl Pattern {
    fn collect(self, source: &str, out: &mut Vec<MarkupMatch>) {
        match self {
            Pattern::BoldAsterisk => collect_regex(&BOLD_ASTERISK, SpanKind::Bold, source, out),
            Pattern::BoldUnderscore => {
                collect_regex(&BOLD_UNDERSCORE, SpanKind::Bold, source, out)
            }
            Pattern::ItalicAsterisk => collect_single_delimited(b'*', source, out),
            Pattern::ItalicUnderscore => collect_single_delimited(b'_', source, out),
            Pattern::Code => collect_regex(&CODE, SpanKind::Code, source, out),
            Pattern::Strikethrough => {
                collect_regex(&STRIKETHROUGH, SpanKind::Strikethrough, source, out)
            }
            Pattern::Link => {
                for caps in LINK.captures_iter(source) {
                    let (Some(whole), Some(label), Some(url)) =
                        (caps.get(0), caps.get(1), caps.get(2))
                    else {
                        continue;
                    };
                    out.push(MarkupMatch {
                        start: whole.start(),
                        end: whole.end(),
                        span: Span::link(label.as_str(), url.as_str()),
                    });
                }
            }
        }
    }
}

fn collect_regex(regex: &Regex, kind: SpanKind, source: &str, out: &mut Vec<MarkupMatch>) {
    for caps in regex.captures_iter(source) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push(MarkupMatch {
            start: whole.start(),
            end: whole.end(),
            span: Span::new(kind.clone(), body.as_str()),
        });
    }
}

#[inline]
fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Italic with a single delimiter. A delimiter only counts when it is not
/// adjacent to another copy of itself, so `**bold**` never yields italics.
/// The body is lazy: it ends at the first qualifying closing delimiter.
fn collect_single_delimited(delim: u8, source: &str, out: &mut Vec<MarkupMatch>) {
    let bytes = source.as_bytes();
    let isolated = |idx: usize| {
        bytes[idx] == delim
            && (idx == 0 || bytes[idx - 1] != delim)
            && bytes.get(idx + 1) != Some(&delim)
    };

    let mut pos = 0;
    while pos < bytes.len() {
        let Some(open) = (pos..bytes.len()).find(|&idx| isolated(idx)) else {
            break;
        };

        let body_start = open + 1;
        let mut close = None;
        for (offset, c) in source[body_start..].char_indices() {
            let idx = body_start + offset;
            if offset > 0 && isolated(idx) {
                close = Some(idx);
                break;
            }
            if is_line_terminator(c) {
                break;
            }
        }

        match close {
            Some(close) => {
                out.push(MarkupMatch {
                    start: open,
                    end: close + 1,
                    span: Span::italic(&source[body_start..close]),
                });
                pos = close + 1;
            }
            None => pos = open + 1,
        }
    }
}

/// Parses `source` into an ordered, non-overlapping list of spans.
///
/// Concatenating the text of the returned spans yields the source with every
/// recognized markup delimiter removed. Empty input yields an empty list.
pub fn tokenize(source: &str) -> Vec<Span> {
    if source.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for pattern in PATTERNS {
        pattern.collect(source, &mut matches);
    }
    // Stable: equal starts keep pattern priority.
    matches.sort_by_key(|m| m.start);

    let mut spans = Vec::with_capacity(matches.len() * 2 + 1);
    let mut pos = 0;
    for m in matches {
        if m.start < pos {
            continue;
        }
        if m.start > pos {
            spans.push(Span::plain(&source[pos..m.start]));
        }
        spans.push(m.span);
        pos = m.end;
    }

    if pos < source.len() {
        spans.push(Span::plain(&source[pos..]));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_no_spans() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn plain_text_is_single_span() {
        assert_eq!(tokenize("just words"), vec![Span::plain("just words")]);
    }

    #[test]
    fn bold_inside_sentence() {
        assert_eq!(
            tokenize("Hello **world**!"),
            vec![Span::plain("Hello "), Span::bold("world"), Span::plain("!")]
        );
    }

    #[test]
    fn link_keeps_label_and_url() {
        assert_eq!(
            tokenize("Check [docs](https://x.io) now"),
            vec![
                Span::plain("Check "),
                Span::link("docs", "https://x.io"),
                Span::plain(" now"),
            ]
        );
    }

    #[test]
    fn every_inline_form_is_recognized() {
        let spans = tokenize("**a** __b__ *c* _d_ `e` ~~f~~ [g](h)");
        assert_eq!(
            spans,
            vec![
                Span::bold("a"),
                Span::plain(" "),
                Span::bold("b"),
                Span::plain(" "),
                Span::italic("c"),
                Span::plain(" "),
                Span::italic("d"),
                Span::plain(" "),
                Span::code("e"),
                Span::plain(" "),
                Span::strikethrough("f"),
                Span::plain(" "),
                Span::link("g", "h"),
            ]
        );
    }

    #[test]
    fn bold_wins_over_nested_italic() {
        assert_eq!(tokenize("**a*b*c**"), vec![Span::bold("a*b*c")]);
    }

    #[test]
    fn repeated_bold_markers_use_first_balanced_pair() {
        assert_eq!(
            tokenize("**a**b**"),
            vec![Span::bold("a"), Span::plain("b**")]
        );
    }

    #[test]
    fn lone_delimiters_stay_plain() {
        assert_eq!(tokenize("2 * 3 = 6"), vec![Span::plain("2 * 3 = 6")]);
        assert_eq!(tokenize("snake_case"), vec![Span::plain("snake_case")]);
        assert_eq!(tokenize("[open"), vec![Span::plain("[open")]);
        assert_eq!(tokenize("****"), vec![Span::plain("****")]);
    }

    #[test]
    fn markup_does_not_cross_newlines() {
        assert_eq!(tokenize("*one\ntwo*"), vec![Span::plain("*one\ntwo*")]);
        assert_eq!(
            tokenize("**a\nb** `x`"),
            vec![Span::plain("**a\nb** "), Span::code("x")]
        );
    }

    #[test]
    fn italic_skips_doubled_delimiters() {
        assert_eq!(
            tokenize("__x__ and _y_"),
            vec![Span::bold("x"), Span::plain(" and "), Span::italic("y")]
        );
    }

    #[test]
    fn italic_body_may_contain_doubled_delimiter() {
        assert_eq!(tokenize("*a**b*"), vec![Span::italic("a**b")]);
    }

    #[test]
    fn overlapping_later_match_is_discarded() {
        // Code starts inside the bold span and is dropped.
        assert_eq!(
            tokenize("**a `b** c`"),
            vec![Span::bold("a `b"), Span::plain(" c`")]
        );
    }

    #[test]
    fn multibyte_text_around_markup() {
        assert_eq!(
            tokenize("café **thé** ✨"),
            vec![Span::plain("café "), Span::bold("thé"), Span::plain(" ✨")]
        );
    }

    #[test]
    fn plain_text_never_longer_than_source() {
        let sources = [
            "",
            "a",
            "**b**",
            "*x* _y_ ~~z~~",
            "[l](u) `c`",
            "***",
            "_*_*",
        ];
        for source in sources {
            let visible: usize = tokenize(source).iter().map(Span::len).sum();
            assert!(visible <= source.chars().count(), "{source:?}");
        }
    }
}
