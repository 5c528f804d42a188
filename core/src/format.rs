//! Inline formatting of feedback text.

use std::sync::OnceLock;

use regex::Regex;

fn emphasis_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // `.` does not cross newlines, so emphasis never spans lines.
    PATTERN.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("emphasis pattern is valid"))
}

/// Turn feedback content into display markup.
///
/// `**text**` becomes `<strong>text</strong>` and each `\n` becomes `<br>`.
/// `&`, `<` and `>` are escaped first, so the only tags in the output are the
/// ones produced here.
#[must_use]
pub fn render_feedback_markup(content: &str) -> String {
    let escaped = escape_html(content);
    let emphasized = emphasis_pattern().replace_all(&escaped, "<strong>${1}</strong>");
    emphasized.replace('\n', "<br>")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
