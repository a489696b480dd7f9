//! Markdown → ANSI-styled terminal text.
//!
//! Thin wrapper around `pulldown_cmark` that folds markdown events into
//! styled lines. Headings, bold, italic, inline code, fenced code blocks,
//! lists, blockquotes, rules, and links.

use crossterm::style::{Color, Stylize};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Render markdown into a ready-to-print string with ANSI styling.
pub fn render(source: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut w = Writer::new();
    for event in Parser::new_ext(source, opts) {
        w.handle(event);
    }
    w.lines.join("\n")
}

// ── Style state ─────────────────────────────────────────────────────────────

/// Inline style in effect for the current span. Entries compose via
/// `overlay` so nested bold+italic works.
#[derive(Debug, Clone, Copy, Default)]
struct Style {
    bold: bool,
    italic: bool,
    underline: bool,
    dim: bool,
    strikethrough: bool,
    fg: Option<Color>,
}

impl Style {
    fn overlay(self, other: Style) -> Style {
        Style {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
            dim: self.dim || other.dim,
            strikethrough: self.strikethrough || other.strikethrough,
            fg: other.fg.or(self.fg),
        }
    }

    fn apply(self, text: &str) -> String {
        let mut styled = text.stylize();
        if self.bold {
            styled = styled.bold();
        }
        if self.italic {
            styled = styled.italic();
        }
        if self.underline {
            styled = styled.underlined();
        }
        if self.dim {
            styled = styled.dim();
        }
        if self.strikethrough {
            styled = styled.crossed_out();
        }
        if let Some(color) = self.fg {
            styled = styled.with(color);
        }
        styled.to_string()
    }
}

// ── Writer ──────────────────────────────────────────────────────────────────

struct Writer {
    lines: Vec<String>,
    /// Inline style stack (bold, italic, heading text, etc.).
    styles: Vec<Style>,
    /// Per-line prefix strings (blockquote `│`, code block border).
    line_prefixes: Vec<String>,
    /// List nesting: None = unordered, Some(n) = ordered at index n.
    list_indices: Vec<Option<u64>>,
    /// True inside a fenced code block.
    in_code_block: bool,
    /// Stored link URL, appended after the link text closes.
    link_url: Option<String>,
    /// Whether the next block element should be preceded by a blank line.
    needs_newline: bool,
}

impl Writer {
    fn new() -> Self {
        Self {
            lines: vec![],
            styles: vec![],
            line_prefixes: vec![],
            list_indices: vec![],
            in_code_block: false,
            link_url: None,
            needs_newline: false,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().overlay(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn push_line(&mut self) {
        let prefix: String = self.line_prefixes.concat();
        self.lines.push(prefix);
    }

    fn push_span(&mut self, span: String) {
        if let Some(line) = self.lines.last_mut() {
            line.push_str(&span);
        } else {
            self.push_line();
            if let Some(line) = self.lines.last_mut() {
                line.push_str(&span);
            }
        }
    }

    fn blank_line_if_needed(&mut self) {
        if self.needs_newline {
            self.push_line();
            self.needs_newline = false;
        }
    }

    // ── Event dispatch ──────────────────────────────────────────────────

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => self.inline_code(c),
            Event::SoftBreak => self.push_span(" ".to_string()),
            Event::HardBreak => self.push_line(),
            Event::Rule => {
                self.blank_line_if_needed();
                self.push_line();
                self.push_span("─".repeat(40).with(Color::DarkGrey).to_string());
                self.needs_newline = true;
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_span(marker.to_string());
            }
            _ => {} // HTML, footnotes, math — skip
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            // ── Block elements ──────────────────────────────────────────
            Tag::Paragraph => {
                self.blank_line_if_needed();
                self.push_line();
            }
            Tag::Heading { level, .. } => {
                self.blank_line_if_needed();
                let style = heading_style(level);
                self.push_line();
                self.push_span(style.apply(&format!("{} ", "#".repeat(heading_depth(level)))));
                self.push_style(style);
            }
            Tag::BlockQuote(_) => {
                self.blank_line_if_needed();
                self.line_prefixes
                    .push("│ ".with(Color::DarkGrey).to_string());
                self.push_style(Style { dim: true, italic: true, ..Style::default() });
            }
            Tag::CodeBlock(kind) => {
                if !self.lines.is_empty() {
                    self.push_line();
                }
                let lang = match &kind {
                    CodeBlockKind::Fenced(l) => l.as_ref(),
                    CodeBlockKind::Indented => "",
                };
                self.push_line();
                let top = if lang.is_empty() {
                    "╭──".with(Color::DarkGrey).to_string()
                } else {
                    format!(
                        "{}{}{}",
                        "╭── ".with(Color::DarkGrey),
                        lang.bold().with(Color::DarkGrey),
                        " ──".with(Color::DarkGrey)
                    )
                };
                self.push_span(top);
                self.line_prefixes
                    .push("│ ".with(Color::DarkGrey).to_string());
                self.in_code_block = true;
            }
            Tag::List(start) => {
                if self.list_indices.is_empty() {
                    self.blank_line_if_needed();
                }
                self.list_indices.push(start);
            }
            Tag::Item => {
                self.push_line();
                let depth = self.list_indices.len().saturating_sub(1);
                let indent = "  ".repeat(depth);
                if let Some(idx) = self.list_indices.last_mut() {
                    let marker = match idx {
                        None => format!("{indent}- "),
                        Some(n) => {
                            let s = format!("{indent}{n}. ");
                            *n += 1;
                            s
                        }
                    };
                    self.push_span(marker.with(Color::DarkGrey).to_string());
                }
            }

            // ── Inline elements ─────────────────────────────────────────
            Tag::Emphasis => self.push_style(Style { italic: true, ..Style::default() }),
            Tag::Strong => self.push_style(Style { bold: true, ..Style::default() }),
            Tag::Strikethrough => {
                self.push_style(Style { strikethrough: true, ..Style::default() })
            }
            Tag::Link { dest_url, .. } => {
                self.link_url = Some(dest_url.to_string());
                self.push_style(Style {
                    underline: true,
                    fg: Some(Color::Cyan),
                    ..Style::default()
                });
            }
            _ => {} // Tables, images, definitions — skip
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.needs_newline = true,
            TagEnd::Heading(_) => {
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::BlockQuote(_) => {
                self.line_prefixes.pop();
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.line_prefixes.pop(); // remove │ prefix before bottom border
                self.push_line();
                self.push_span("╰──".with(Color::DarkGrey).to_string());
                self.needs_newline = true;
            }
            TagEnd::List(_) => {
                self.list_indices.pop();
                self.needs_newline = true;
            }
            TagEnd::Item => {}
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_url.take() {
                    self.push_span(" (".to_string());
                    self.push_span(url.with(Color::Cyan).underlined().to_string());
                    self.push_span(")".to_string());
                }
            }
            _ => {}
        }
    }

    // ── Content handlers ────────────────────────────────────────────────

    fn text(&mut self, cow: CowStr<'_>) {
        // Expand tabs → 4 spaces for predictable alignment
        let raw = cow.to_string();
        let text = if raw.contains('\t') {
            raw.replace('\t', "    ")
        } else {
            raw
        };

        if self.in_code_block {
            for line in text.lines() {
                self.push_line();
                self.push_span(line.with(Color::White).to_string());
            }
            return;
        }

        let styled = self.style().apply(&text);
        self.push_span(styled);
    }

    fn inline_code(&mut self, cow: CowStr<'_>) {
        self.push_span(
            cow.as_ref()
                .with(Color::White)
                .on(Color::DarkGrey)
                .to_string(),
        );
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn heading_style(level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style { bold: true, underline: true, ..Style::default() },
        HeadingLevel::H2 => Style { bold: true, ..Style::default() },
        _ => Style { bold: true, italic: true, ..Style::default() },
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
