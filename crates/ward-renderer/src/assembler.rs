//! Block assembly.
//!
//! Lines are classified into a [`LineKind`] and fed through a small state
//! machine whose state is the currently open [`BlockKind`]. [`transition`]
//! is the only place that decides when the open block is flushed.

use std::sync::LazyLock;

use regex::Regex;

use crate::code_block::PLACEHOLDER_RE;
use crate::util::indent_width;

static TABLE_ROW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\|(.+)\|$").unwrap());
static TABLE_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|\s*[-:]+\s*(\|\s*[-:]+\s*)*\|$").unwrap());
static CHECKBOX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*]\s+)?\[([ xX])\]\s+(.+)$").unwrap());
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[*\-]\s+(.+)$").unwrap());
static ORDERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+\.\s+(.+)$").unwrap());

const BLOCK_TAGS: [&str; 10] = [
    "<h1",
    "<h2",
    "<h3",
    "<h4",
    "<h5",
    "<h6",
    "<hr",
    "<pre",
    "<blockquote",
    "<img",
];

/// Kind of the block currently being accumulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BlockKind {
    Paragraph,
    Table,
    Checklist,
    BulletList,
    OrderedList,
}

/// Classification of one input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    Blank,
    TableSeparator,
    TableRow(&'a str),
    Checkbox { checked: bool, content: &'a str },
    Bullet { level: usize, content: &'a str },
    Ordered { level: usize, content: &'a str },
    /// Already rendered block element or code placeholder, emitted as-is.
    Block(&'a str),
    Text(&'a str),
}

impl LineKind<'_> {
    /// Block this line belongs to, `None` if it stands alone.
    fn block_kind(&self) -> Option<BlockKind> {
        match self {
            Self::Blank | Self::Block(_) => None,
            Self::TableSeparator | Self::TableRow(_) => Some(BlockKind::Table),
            Self::Checkbox { .. } => Some(BlockKind::Checklist),
            Self::Bullet { .. } => Some(BlockKind::BulletList),
            Self::Ordered { .. } => Some(BlockKind::OrderedList),
            Self::Text(_) => Some(BlockKind::Paragraph),
        }
    }
}

/// Outcome of feeding one line to the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Transition {
    /// Close the open block before handling the line.
    pub flush: bool,
    /// Block open after the line has been handled.
    pub next: Option<BlockKind>,
}

/// Decide what happens to the open block when `line` arrives.
pub(crate) fn transition(current: Option<BlockKind>, line: &LineKind<'_>) -> Transition {
    match (current, line) {
        // A separator belongs to an open table; without one it is dropped.
        (Some(BlockKind::Table), LineKind::TableSeparator) => Transition {
            flush: false,
            next: current,
        },
        (_, LineKind::TableSeparator) => Transition {
            flush: current.is_some(),
            next: None,
        },
        _ => {
            let next = line.block_kind();
            Transition {
                flush: current.is_some() && current != next,
                next,
            }
        }
    }
}

/// Classify a line after inline formatting.
pub(crate) fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if TABLE_ROW_RE.is_match(trimmed) {
        if TABLE_SEPARATOR_RE.is_match(trimmed) {
            return LineKind::TableSeparator;
        }
        return LineKind::TableRow(trimmed);
    }
    if let Some(caps) = CHECKBOX_RE.captures(line) {
        let checked = caps[1].eq_ignore_ascii_case("x");
        let content = caps.get(2).map_or("", |m| m.as_str());
        return LineKind::Checkbox { checked, content };
    }
    if let Some(content) = BULLET_RE.captures(line).and_then(|c| c.get(1)) {
        return LineKind::Bullet {
            level: indent_width(line) / 2,
            content: content.as_str(),
        };
    }
    if let Some(content) = ORDERED_RE.captures(line).and_then(|c| c.get(1)) {
        return LineKind::Ordered {
            level: indent_width(line) / 2,
            content: content.as_str(),
        };
    }
    if BLOCK_TAGS.iter().any(|tag| trimmed.starts_with(tag)) || is_placeholder(trimmed) {
        return LineKind::Block(line);
    }
    LineKind::Text(line)
}

fn is_placeholder(trimmed: &str) -> bool {
    PLACEHOLDER_RE
        .find(trimmed)
        .is_some_and(|m| m.start() == 0 && m.end() == trimmed.len())
}

fn margin_class(level: usize) -> String {
    match level {
        0 => String::new(),
        1 => " ml-6".to_owned(),
        2 => " ml-12".to_owned(),
        3 => " ml-18".to_owned(),
        4 => " ml-24".to_owned(),
        _ => format!(" ml-{}", level * 6),
    }
}

fn list_item(level: usize, content: &str) -> String {
    format!(r#"<li class="mb-2{}">{content}</li>"#, margin_class(level))
}

fn checkbox_item(checked: bool, content: &str) -> String {
    let checked = if checked { "checked " } else { "" };
    format!(
        r#"<li class="mb-2 flex items-start"><input type="checkbox" {checked}disabled class="mr-2 align-middle" /><span>{content}</span></li>"#
    )
}

fn table_cells(row: &str, header: bool) -> String {
    let inner = row.strip_prefix('|').unwrap_or(row);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner
        .split('|')
        .map(str::trim)
        .map(|cell| {
            if header {
                format!(r#"<th class="border border-gray-300 px-4 py-2 font-bold">{cell}</th>"#)
            } else {
                format!(r#"<td class="border border-gray-300 px-4 py-2">{cell}</td>"#)
            }
        })
        .collect()
}

/// Block assembler state.
#[derive(Debug, Default)]
struct Assembler {
    current: Option<BlockKind>,
    items: Vec<String>,
    output: Vec<String>,
}

impl Assembler {
    fn feed(&mut self, line: &LineKind<'_>) {
        let step = transition(self.current, line);
        if step.flush {
            self.flush();
        }
        self.current = step.next;

        match *line {
            LineKind::Blank | LineKind::TableSeparator => {}
            LineKind::Block(html) => self.output.push(html.to_owned()),
            LineKind::TableRow(row) => {
                let header = self.items.is_empty();
                self.items.push(format!("<tr>{}</tr>", table_cells(row, header)));
            }
            LineKind::Checkbox { checked, content } => {
                self.items.push(checkbox_item(checked, content));
            }
            LineKind::Bullet { level, content } | LineKind::Ordered { level, content } => {
                self.items.push(list_item(level, content));
            }
            LineKind::Text(text) => self.items.push(text.to_owned()),
        }
    }

    fn flush(&mut self) {
        let Some(kind) = self.current else {
            return;
        };
        let items = std::mem::take(&mut self.items);
        if items.is_empty() {
            return;
        }

        let html = match kind {
            BlockKind::Paragraph => format!(r#"<p class="mb-4">{}</p>"#, items.join("<br />")),
            BlockKind::Table => {
                let (head, body) = items.split_at(1);
                format!(
                    r#"<table class="table-auto border-collapse border border-gray-300 my-4 w-full"><thead>{}</thead><tbody>{}</tbody></table>"#,
                    head.concat(),
                    body.concat()
                )
            }
            BlockKind::Checklist => {
                format!(r#"<ul class="list-none mb-4 space-y-1">{}</ul>"#, items.concat())
            }
            BlockKind::BulletList => {
                format!(r#"<ul class="list-disc mb-4 space-y-1">{}</ul>"#, items.concat())
            }
            BlockKind::OrderedList => {
                format!(r#"<ol class="list-decimal mb-4 space-y-1">{}</ol>"#, items.concat())
            }
        };
        self.output.push(html);
    }

    fn finish(mut self) -> String {
        self.flush();
        self.output.join("\n")
    }
}

/// Group lines into paragraphs, lists, checklists and tables.
pub(crate) fn assemble(text: &str) -> String {
    let mut assembler = Assembler::default();
    for line in text.split('\n') {
        assembler.feed(&classify(line));
    }
    assembler.finish()
}
