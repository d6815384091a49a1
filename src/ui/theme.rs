use ratatui::style::{Color, Modifier, Style};

use crate::core::message::Role;
use crate::text::SpanKind;

#[derive(Debug, Clone)]
pub struct Theme {
    // Role labels above each bubble
    pub user_label_style: Style,
    pub assistant_label_style: Style,
    pub teacher_label_style: Style,

    // Message body
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub loading_style: Style,

    // Inline markup, patched over the body style
    pub bold_style: Style,
    pub italic_style: Style,
    pub code_style: Style,
    pub strikethrough_style: Style,
    pub link_style: Style,

    // Typing cursor shown while a reveal is running
    pub cursor_style: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark_default()
    }
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            user_label_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            assistant_label_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            teacher_label_style: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),

            user_text_style: Style::default().fg(Color::Cyan),
            assistant_text_style: Style::default().fg(Color::White),
            loading_style: Style::default().fg(Color::DarkGray),

            bold_style: Style::default().add_modifier(Modifier::BOLD),
            italic_style: Style::default().add_modifier(Modifier::ITALIC),
            code_style: Style::default().fg(Color::LightYellow).bg(Color::DarkGray),
            strikethrough_style: Style::default().add_modifier(Modifier::CROSSED_OUT),
            link_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),

            cursor_style: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::SLOW_BLINK),
        }
    }

    /// Theme without colors, for terminals that can't show them.
    pub fn monochrome() -> Self {
        Theme {
            user_label_style: Style::default().add_modifier(Modifier::BOLD),
            assistant_label_style: Style::default().add_modifier(Modifier::BOLD),
            teacher_label_style: Style::default().add_modifier(Modifier::BOLD),
            user_text_style: Style::default(),
            assistant_text_style: Style::default(),
            loading_style: Style::default().add_modifier(Modifier::DIM),
            bold_style: Style::default().add_modifier(Modifier::BOLD),
            italic_style: Style::default().add_modifier(Modifier::ITALIC),
            code_style: Style::default().add_modifier(Modifier::REVERSED),
            strikethrough_style: Style::default().add_modifier(Modifier::CROSSED_OUT),
            link_style: Style::default().add_modifier(Modifier::UNDERLINED),
            cursor_style: Style::default().add_modifier(Modifier::SLOW_BLINK),
        }
    }

    pub fn label_style(&self, role: Role) -> Style {
        match role {
            Role::User => self.user_label_style,
            Role::Assistant => self.assistant_label_style,
            Role::Teacher => self.teacher_label_style,
        }
    }

    pub fn text_style(&self, role: Role) -> Style {
        match role {
            Role::User => self.user_text_style,
            Role::Assistant | Role::Teacher => self.assistant_text_style,
        }
    }

    /// Style for a span of `kind` inside a bubble whose body uses `base`.
    pub fn span_style(&self, base: Style, kind: &SpanKind) -> Style {
        match kind {
            SpanKind::Plain => base,
            SpanKind::Bold => base.patch(self.bold_style),
            SpanKind::Italic => base.patch(self.italic_style),
            SpanKind::Code => base.patch(self.code_style),
            SpanKind::Strikethrough => base.patch(self.strikethrough_style),
            SpanKind::Link(_) => base.patch(self.link_style),
        }
    }
}
