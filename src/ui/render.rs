//! Turns span snapshots into styled terminal lines.
//!
//! Lines are pre-wrapped to the terminal width here rather than by
//! `Paragraph`'s wrapping so the caller knows exactly how many rows a bubble
//! occupies before drawing it.

use std::mem;

use ratatui::text::{Line, Span as TuiSpan};
use unicode_width::UnicodeWidthChar;

use crate::core::message::{MessageEntry, Role};
use crate::text::Span;
use crate::ui::theme::Theme;

/// Drawn after the visible text while a reveal is running.
pub const CURSOR_GLYPH: &str = "▌";
/// Body of a loading placeholder.
pub const LOADING_TEXT: &str = "…";

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "Assistant",
        Role::Teacher => "Teacher",
    }
}

/// Logical lines for one bubble: a role label (omitted for chained
/// follow-ons), then the visible text split on newlines.
pub fn render_entry(
    entry: &MessageEntry,
    visible: &[Span],
    show_cursor: bool,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if !entry.is_sub_message {
        lines.push(Line::from(TuiSpan::styled(
            role_label(entry.role),
            theme.label_style(entry.role),
        )));
    }

    if entry.is_loading {
        lines.push(Line::from(TuiSpan::styled(LOADING_TEXT, theme.loading_style)));
        return lines;
    }

    let base = theme.text_style(entry.role);
    let mut current: Vec<TuiSpan<'static>> = Vec::new();
    for span in visible {
        let style = theme.span_style(base, &span.kind);
        for (i, part) in span.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Line::from(mem::take(&mut current)));
            }
            if !part.is_empty() {
                current.push(TuiSpan::styled(part.to_string(), style));
            }
        }
    }
    if show_cursor {
        current.push(TuiSpan::styled(CURSOR_GLYPH, theme.cursor_style));
    }
    lines.push(Line::from(current));
    lines
}

/// Hard-wraps `lines` at `width` display columns, keeping span styles.
pub fn prewrap_lines(lines: &[Line<'static>], width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut wrapped = Vec::with_capacity(lines.len());

    for line in lines {
        let mut row: Vec<TuiSpan<'static>> = Vec::new();
        let mut row_width = 0usize;
        for span in &line.spans {
            let mut chunk = String::new();
            for c in span.content.chars() {
                let char_width = c.width().unwrap_or(0);
                if row_width > 0 && row_width + char_width > width {
                    if !chunk.is_empty() {
                        row.push(TuiSpan::styled(mem::take(&mut chunk), span.style));
                    }
                    wrapped.push(Line::from(mem::take(&mut row)));
                    row_width = 0;
                }
                chunk.push(c);
                row_width += char_width;
            }
            if !chunk.is_empty() {
                row.push(TuiSpan::styled(chunk, span.style));
            }
        }
        wrapped.push(Line::from(row));
    }

    wrapped
}
