//! Typed spans produced by the inline markup tokenizer.
//!
//! A [`Span`] is a contiguous run of visible text together with the
//! [`SpanKind`] that says how it should be rendered. Markup delimiters are
//! never part of a span's text.
//!
//! # Examples
//!
//! ```
//! use chatreveal::text::span::{Span, SpanKind};
//!
//! let link = Span::link("docs", "https://x.io");
//! assert!(link.kind.is_link());
//! assert_eq!(link.kind.link_meta().map(|m| m.href()), Some("https://x.io"));
//! assert_eq!(link.len(), 4);
//!
//! let partial = Span::bold("world").truncated(3);
//! assert_eq!(partial, Span::new(SpanKind::Bold, "wor"));
//! ```

use std::sync::Arc;

/// How a span's text is meant to be rendered.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpanKind {
    /// Unformatted text, including any unmatched markup characters.
    Plain,
    Bold,
    Italic,
    /// Inline code delimited by single backticks.
    Code,
    Strikethrough,
    /// A `[label](url)` link; the span text is the label.
    Link(LinkMeta),
}

impl SpanKind {
    #[inline]
    pub fn is_plain(&self) -> bool {
        matches!(self, SpanKind::Plain)
    }

    #[inline]
    pub fn is_link(&self) -> bool {
        matches!(self, SpanKind::Link(_))
    }

    #[inline]
    pub fn link_meta(&self) -> Option<&LinkMeta> {
        match self {
            SpanKind::Link(meta) => Some(meta),
            _ => None,
        }
    }

    #[inline]
    pub fn link(href: impl Into<String>) -> Self {
        SpanKind::Link(LinkMeta::new(href))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpanKind::Plain => "plain",
            SpanKind::Bold => "bold",
            SpanKind::Italic => "italic",
            SpanKind::Code => "code",
            SpanKind::Strikethrough => "strikethrough",
            SpanKind::Link(_) => "link",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LinkMeta {
    href: Arc<str>,
}

impl LinkMeta {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Arc::<str>::from(href.into()),
        }
    }

    pub fn href(&self) -> &str {
        &self.href
    }
}

/// A typed run of visible text.
///
/// Spans are recomputed from scratch on every tokenize call and carry no
/// identity beyond their position in the list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub kind: SpanKind,
    pub text: String,
}

impl Span {
    pub fn new(kind: SpanKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(SpanKind::Plain, text)
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self::new(SpanKind::Bold, text)
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self::new(SpanKind::Italic, text)
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self::new(SpanKind::Code, text)
    }

    pub fn strikethrough(text: impl Into<String>) -> Self {
        Self::new(SpanKind::Strikethrough, text)
    }

    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self::new(SpanKind::link(href), label)
    }

    /// Number of visible characters (Unicode scalar values) in this span.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns a copy holding at most `chars` visible characters, keeping the
    /// kind (and link target) intact.
    pub fn truncated(&self, chars: usize) -> Self {
        let end = self
            .text
            .char_indices()
            .nth(chars)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len());
        Self {
            kind: self.kind.clone(),
            text: self.text[..end].to_string(),
        }
    }
}
