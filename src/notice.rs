//! Styled terminal output
//!
//! Engines never touch the terminal directly. They queue [`Notice`]s and the
//! session prints them after each callback.

use serde::Serialize;

/// Visual tone of a span, mapped to an `output-*` CSS class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tone {
    Plain,
    Accent,
    Muted,
    Error,
    Success,
}

impl Tone {
    pub fn class(&self) -> Option<&'static str> {
        match self {
            Tone::Plain => None,
            Tone::Accent => Some("output-accent"),
            Tone::Muted => Some("output-muted"),
            Tone::Error => Some("output-error"),
            Tone::Success => Some("output-success"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub tone: Tone,
    pub text: String,
}

/// One printed line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub spans: Vec<Span>,
    pub blank_before: bool,
    pub blank_after: bool,
}

impl Notice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-span line
    pub fn line(tone: Tone, text: impl Into<String>) -> Self {
        Self::new().push(tone, text)
    }

    pub fn push(mut self, tone: Tone, text: impl Into<String>) -> Self {
        self.spans.push(Span {
            tone,
            text: text.into(),
        });
        self
    }

    pub fn plain(self, text: impl Into<String>) -> Self {
        self.push(Tone::Plain, text)
    }

    pub fn accent(self, text: impl Into<String>) -> Self {
        self.push(Tone::Accent, text)
    }

    pub fn muted(self, text: impl Into<String>) -> Self {
        self.push(Tone::Muted, text)
    }

    pub fn error(self, text: impl Into<String>) -> Self {
        self.push(Tone::Error, text)
    }

    pub fn success(self, text: impl Into<String>) -> Self {
        self.push(Tone::Success, text)
    }

    /// Blank line before this one
    pub fn spaced_before(mut self) -> Self {
        self.blank_before = true;
        self
    }

    /// Blank line after this one
    pub fn spaced_after(mut self) -> Self {
        self.blank_after = true;
        self
    }

    /// Concatenated text without markup
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Terminal markup, text HTML-escaped
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if self.blank_before {
            out.push('\n');
        }
        for span in &self.spans {
            let text = escape_html(&span.text);
            match span.tone.class() {
                Some(class) => {
                    out.push_str(&format!("<span class=\"{}\">{}</span>", class, text));
                }
                None => out.push_str(&text),
            }
        }
        if self.blank_after {
            out.push('\n');
        }
        out
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Pending notices owned by an engine
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    pending: Vec<Notice>,
}

impl Outbox {
    pub fn send(&mut self, notice: Notice) {
        self.pending.push(notice);
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_over_markup() {
        let notice = Notice::new()
            .error("Game Over!")
            .plain(" Score: ")
            .accent("120")
            .spaced_before();
        assert_eq!(
            notice.to_html(),
            "\n<span class=\"output-error\">Game Over!</span> Score: <span class=\"output-accent\">120</span>"
        );
        assert_eq!(notice.text(), "Game Over! Score: 120");
    }

    #[test]
    fn test_text_is_escaped() {
        let notice = Notice::line(Tone::Muted, "Type \"snake\" to play <again>").spaced_after();
        assert_eq!(
            notice.to_html(),
            "<span class=\"output-muted\">Type &quot;snake&quot; to play &lt;again&gt;</span>\n"
        );
    }

    #[test]
    fn test_outbox_drains_once() {
        let mut outbox = Outbox::default();
        outbox.send(Notice::line(Tone::Success, "ok"));
        assert_eq!(outbox.drain().len(), 1);
        assert!(outbox.is_empty());
        assert!(outbox.drain().is_empty());
    }
}
