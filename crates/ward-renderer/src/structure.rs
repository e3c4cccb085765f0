//! Line level structure: headings, horizontal rules and blockquotes.
//!
//! Runs on escaped text, so blockquote markers appear as `&gt;`.

use std::sync::LazyLock;

use regex::Regex;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,4}) (.+)$").unwrap());

static BLOCKQUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((?:&gt;)+)\s?(.*)$").unwrap());

const HORIZONTAL_RULE: &str = r#"<hr class="border-white/10" />"#;

fn heading_class(level: usize) -> &'static str {
    match level {
        1 => "text-4xl font-bold mb-6 mt-8",
        2 => "text-3xl font-bold mb-4 mt-8",
        3 => "text-2xl font-bold mb-4 mt-6",
        _ => "text-xl font-bold mb-4 mt-4",
    }
}

/// Consecutive blockquote lines at the same nesting depth.
struct QuoteGroup {
    level: usize,
    lines: Vec<String>,
}

impl QuoteGroup {
    fn render(&self) -> String {
        let margin = if self.level > 1 {
            format!(" ml-{}", self.level * 4)
        } else {
            String::new()
        };
        format!(
            r#"<blockquote class="border-l-4 border-gray-300 pl-4 italic text-gray-600 my-4{margin}">{}</blockquote>"#,
            self.lines.join("<br />")
        )
    }
}

/// Convert a non-quote line: heading, rule or unchanged.
fn process_line(line: &str) -> String {
    let trimmed = line.trim();
    if trimmed == "---" {
        return HORIZONTAL_RULE.to_owned();
    }
    if let Some(caps) = HEADING_RE.captures(trimmed) {
        let level = caps[1].len();
        return format!(
            r#"<h{level} class="{}">{}</h{level}>"#,
            heading_class(level),
            &caps[2]
        );
    }
    line.to_owned()
}

/// Apply heading, rule and blockquote detection to every line.
///
/// A change of nesting depth or any non-quote line closes the open
/// blockquote group.
pub(crate) fn process(escaped: &str) -> String {
    let mut output: Vec<String> = Vec::new();
    let mut quote: Option<QuoteGroup> = None;

    for line in escaped.split('\n') {
        let Some(caps) = BLOCKQUOTE_RE.captures(line.trim()) else {
            if let Some(group) = quote.take() {
                output.push(group.render());
            }
            output.push(process_line(line));
            continue;
        };

        let level = caps[1].len() / "&gt;".len();
        let content = caps[2].to_owned();
        if let Some(group) = quote.as_mut().filter(|group| group.level == level) {
            group.lines.push(content);
            continue;
        }
        if let Some(group) = quote.replace(QuoteGroup {
            level,
            lines: vec![content],
        }) {
            output.push(group.render());
        }
    }

    if let Some(group) = quote {
        output.push(group.render());
    }

    output.join("\n")
}
