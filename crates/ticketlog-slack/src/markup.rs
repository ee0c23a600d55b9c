//! Markdown to Slack mrkdwn conversion

use regex::Regex;

/// Escape the characters Slack treats as control sequences
pub fn escape_control_chars(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Converts markdown to Slack markup.
///
/// Links become `<url|text>`, headings and `**bold**` become `*bold*`.
#[derive(Debug, Clone)]
pub struct MarkupConverter {
    link: Regex,
    heading: Regex,
    bold: Regex,
}

impl MarkupConverter {
    /// Compile the conversion patterns
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            link: Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)")?,
            heading: Regex::new(r"(?m)^#{1,6}[ \t]+(.+?)[ \t]*$")?,
            bold: Regex::new(r"\*\*([^*]+)\*\*")?,
        })
    }

    /// Convert a markdown message
    pub fn convert(&self, markdown: &str) -> String {
        let escaped = escape_control_chars(markdown);
        let linked = self.link.replace_all(&escaped, "<$2|$1>");
        let headed = self.heading.replace_all(&linked, "*$1*");
        self.bold.replace_all(&headed, "*$1*").into_owned()
    }
}
