//! Markdown to styled terminal lines.
//!
//! Articles arrive as raw markdown text; this module folds the
//! pulldown-cmark event stream into `StyledLine`s that every view can draw,
//! and provides unicode-aware word wrapping for them.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::Theme;

/// A run of text with one style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledSpan {
    pub text: String,
    pub style: Style,
}

/// A line of styled spans.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        let mut line = Self::new();
        line.push(text.into(), style);
        line
    }

    pub fn push(&mut self, text: String, style: Style) {
        self.spans.push(StyledSpan { text, style });
    }

    /// Concatenated text of all spans, styles dropped.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn width(&self) -> usize {
        self.spans
            .iter()
            .map(|s| UnicodeWidthStr::width(s.text.as_str()))
            .sum()
    }
}

/// Parse markdown into styled lines.
pub fn parse_markdown(text: &str, theme: &Theme) -> Vec<StyledLine> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(text, options);
    let mut lines: Vec<StyledLine> = vec![StyledLine::new()];

    // Style stack for nested formatting
    let mut style_stack: Vec<Style> = vec![Style::default().fg(theme.fg)];
    let mut in_code_block = false;
    let mut quote_depth: usize = 0;

    let base = Style::default();
    let top = |stack: &[Style]| *stack.last().unwrap_or(&base);
    let blank_if_needed = |lines: &mut Vec<StyledLine>| {
        if !lines.last().map(|l| l.spans.is_empty()).unwrap_or(true) {
            lines.push(StyledLine::new());
        }
    };

    for event in parser {
        match event {
            Event::Start(tag) => match tag {
                Tag::Strong => {
                    style_stack.push(top(&style_stack).add_modifier(Modifier::BOLD));
                }
                Tag::Emphasis => {
                    style_stack.push(top(&style_stack).add_modifier(Modifier::ITALIC));
                }
                Tag::Strikethrough => {
                    style_stack.push(top(&style_stack).add_modifier(Modifier::CROSSED_OUT));
                }
                Tag::Heading { .. } => {
                    blank_if_needed(&mut lines);
                    style_stack
                        .push(top(&style_stack).add_modifier(Modifier::BOLD).fg(theme.heading));
                }
                Tag::Link { .. } | Tag::Image { .. } => {
                    style_stack
                        .push(top(&style_stack).add_modifier(Modifier::UNDERLINED).fg(theme.accent));
                }
                Tag::CodeBlock(_) => {
                    in_code_block = true;
                    blank_if_needed(&mut lines);
                }
                Tag::BlockQuote(_) => {
                    quote_depth += 1;
                    blank_if_needed(&mut lines);
                }
                Tag::List(_) | Tag::Item => {
                    blank_if_needed(&mut lines);
                    if matches!(tag, Tag::Item) {
                        if let Some(line) = lines.last_mut() {
                            line.push("• ".to_string(), Style::default().fg(theme.dim));
                        }
                    }
                }
                Tag::Paragraph => {
                    // Start paragraphs on a new line once there is prior content
                    if lines.iter().any(|l| !l.spans.is_empty()) {
                        lines.push(StyledLine::new());
                    }
                    if quote_depth > 0 {
                        if let Some(line) = lines.last_mut() {
                            line.push("│ ".repeat(quote_depth), Style::default().fg(theme.dim));
                        }
                    }
                }
                _ => {}
            },
            Event::End(tag_end) => match tag_end {
                TagEnd::Strong
                | TagEnd::Emphasis
                | TagEnd::Strikethrough
                | TagEnd::Link
                | TagEnd::Image => {
                    style_stack.pop();
                }
                TagEnd::Heading(_) => {
                    style_stack.pop();
                    lines.push(StyledLine::new());
                }
                TagEnd::CodeBlock => {
                    in_code_block = false;
                    lines.push(StyledLine::new());
                }
                TagEnd::BlockQuote(_) => {
                    quote_depth = quote_depth.saturating_sub(1);
                }
                TagEnd::Paragraph => {
                    lines.push(StyledLine::new());
                }
                _ => {}
            },
            Event::Text(text) => {
                let style = if in_code_block {
                    Style::default().fg(theme.code_fg).bg(theme.code_bg)
                } else {
                    top(&style_stack)
                };
                for (i, part) in text.split('\n').enumerate() {
                    if i > 0 {
                        lines.push(StyledLine::new());
                    }
                    if !part.is_empty() {
                        if let Some(line) = lines.last_mut() {
                            line.push(part.to_string(), style);
                        }
                    }
                }
            }
            Event::Code(code) => {
                let style = Style::default().fg(theme.code_fg).bg(theme.code_bg);
                if let Some(line) = lines.last_mut() {
                    line.push(format!("`{code}`"), style);
                }
            }
            Event::SoftBreak => {
                if let Some(line) = lines.last_mut() {
                    line.push(" ".to_string(), top(&style_stack));
                }
            }
            Event::HardBreak => {
                lines.push(StyledLine::new());
            }
            Event::Rule => {
                blank_if_needed(&mut lines);
                if let Some(line) = lines.last_mut() {
                    line.push("─".repeat(40), Style::default().fg(theme.dim));
                }
                lines.push(StyledLine::new());
            }
            _ => {}
        }
    }

    while lines.last().map(|l| l.spans.is_empty()).unwrap_or(false) {
        lines.pop();
    }

    lines
}

/// Word-wrap a plain text line to `max_width` columns. Breaks at spaces when
/// possible, mid-word when a single word is wider than the line.
pub fn wrap_text_line(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![text.to_string()];
    }

    let mut result = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in split_keeping_spaces(text) {
        let word_width = UnicodeWidthStr::width(word.as_str());
        if current_width + word_width <= max_width {
            current.push_str(&word);
            current_width += word_width;
        } else if current.is_empty() {
            // Single word wider than the line: break mid-word
            for ch in word.chars() {
                let w = UnicodeWidthChar::width(ch).unwrap_or(1);
                if current_width + w > max_width && !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += w;
            }
        } else {
            result.push(std::mem::take(&mut current));
            let trimmed = word.trim_start();
            current_width = UnicodeWidthStr::width(trimmed);
            current = trimmed.to_string();
        }
    }

    if !current.is_empty() || result.is_empty() {
        result.push(current);
    }
    result
}

/// Word-wrap styled lines, preserving span styles across breaks.
pub fn wrap_styled_lines(lines: &[StyledLine], max_width: usize) -> Vec<StyledLine> {
    if max_width == 0 {
        return lines.to_vec();
    }

    let mut result = Vec::new();
    for line in lines {
        if line.width() <= max_width {
            result.push(line.clone());
            continue;
        }

        // Flatten spans into (segment, style) at word boundaries
        let mut segments: Vec<(String, Style)> = Vec::new();
        for span in &line.spans {
            for seg in split_keeping_spaces(&span.text) {
                segments.push((seg, span.style));
            }
        }

        let mut current = StyledLine::new();
        let mut current_width = 0;
        for (segment, style) in segments {
            let seg_width = UnicodeWidthStr::width(segment.as_str());
            if current_width + seg_width <= max_width {
                current.push(segment, style);
                current_width += seg_width;
            } else if current_width == 0 {
                // Segment alone is too wide: hard-break by character
                let mut remaining = segment.as_str();
                while !remaining.is_empty() {
                    let mut take_bytes = 0;
                    let mut take_width = 0;
                    for (idx, ch) in remaining.char_indices() {
                        let w = UnicodeWidthChar::width(ch).unwrap_or(1);
                        if take_width + w > max_width && take_width > 0 {
                            break;
                        }
                        take_width += w;
                        take_bytes = idx + ch.len_utf8();
                    }
                    let (head, tail) = remaining.split_at(take_bytes);
                    current.push(head.to_string(), style);
                    remaining = tail;
                    if !remaining.is_empty() {
                        result.push(std::mem::take(&mut current));
                    }
                }
                current_width = current.width();
            } else {
                result.push(std::mem::take(&mut current));
                let trimmed = segment.trim_start().to_string();
                current_width = UnicodeWidthStr::width(trimmed.as_str());
                if !trimmed.is_empty() {
                    current.push(trimmed, style);
                }
            }
        }
        if !current.spans.is_empty() {
            result.push(current);
        }
    }
    result
}

/// Split text into alternating space/word segments, spaces attached to the
/// front of the following word.
fn split_keeping_spaces(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut chars = text.chars().peekable();
    while chars.peek().is_some() {
        let mut seg = String::new();
        while let Some(&ch) = chars.peek() {
            if ch != ' ' {
                break;
            }
            seg.push(ch);
            chars.next();
        }
        while let Some(&ch) = chars.peek() {
            if ch == ' ' {
                break;
            }
            seg.push(ch);
            chars.next();
        }
        if !seg.is_empty() {
            segments.push(seg);
        }
    }
    segments
}
