//! Feedback markup to styled terminal lines.
//!
//! Understands exactly what the feedback formatter emits: `<strong>`,
//! `</strong>`, `<br>` and the `&amp;`/`&lt;`/`&gt;` entities. Anything else is
//! shown literally.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::sanitize::sanitize_terminal_text;

const TOKENS: &[(&str, Token)] = &[
    ("<strong>", Token::BoldOn),
    ("</strong>", Token::BoldOff),
    ("<br>", Token::Break),
    ("&amp;", Token::Literal('&')),
    ("&lt;", Token::Literal('<')),
    ("&gt;", Token::Literal('>')),
];

#[derive(Debug, Clone, Copy)]
enum Token {
    BoldOn,
    BoldOff,
    Break,
    Literal(char),
}

struct LineBuilder {
    base: Style,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    text: String,
    bold: bool,
}

impl LineBuilder {
    fn style(&self) -> Style {
        if self.bold {
            self.base.add_modifier(Modifier::BOLD)
        } else {
            self.base
        }
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = sanitize_terminal_text(&self.text).into_owned();
        self.text.clear();
        self.spans.push(Span::styled(text, self.style()));
    }

    fn set_bold(&mut self, bold: bool) {
        self.flush_text();
        self.bold = bold;
    }

    fn break_line(&mut self) {
        self.flush_text();
        let spans = std::mem::take(&mut self.spans);
        self.lines.push(Line::from(spans));
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.break_line();
        self.lines
    }
}

/// Convert markup into lines, one per `<br>`.
#[must_use]
pub fn markup_to_lines(markup: &str, base: Style) -> Vec<Line<'static>> {
    let mut builder = LineBuilder {
        base,
        lines: Vec::new(),
        spans: Vec::new(),
        text: String::new(),
        bold: false,
    };

    let mut rest = markup;
    while let Some(ch) = rest.chars().next() {
        if matches!(ch, '<' | '&')
            && let Some((literal, token)) = TOKENS.iter().find(|(lit, _)| rest.starts_with(*lit))
        {
            match token {
                Token::BoldOn => builder.set_bold(true),
                Token::BoldOff => builder.set_bold(false),
                Token::Break => builder.break_line(),
                Token::Literal(c) => builder.text.push(*c),
            }
            rest = &rest[literal.len()..];
            continue;
        }
        builder.text.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    builder.finish()
}
