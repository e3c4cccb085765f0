//! Shared utility functions for markdown rendering.

/// Escape special HTML characters.
///
/// # Examples
///
/// ```
/// use ward_renderer::escape_html;
///
/// assert_eq!(escape_html("<a href='x'>&</a>"), "&lt;a href=&#039;x&#039;&gt;&amp;&lt;/a&gt;");
/// ```
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#039;"),
            _ => result.push(c),
        }
    }
    result
}

/// Convert `\r\n` and lone `\r` to `\n`.
pub(crate) fn normalize_line_endings(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

/// Number of leading whitespace characters.
pub(crate) fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}
