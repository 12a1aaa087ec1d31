//! Compose page rendering: the new-post form and its live markdown preview.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::model::post::NewPost;
use super::markdown::parse_markdown;
use super::theme::Theme;

/// Which form field receives typed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeField {
    #[default]
    Title,
    Summary,
    Content,
}

impl ComposeField {
    pub fn next(self) -> Self {
        match self {
            ComposeField::Title => ComposeField::Summary,
            ComposeField::Summary => ComposeField::Content,
            ComposeField::Content => ComposeField::Title,
        }
    }
}

fn field_block<'a>(title: &'a str, focused: bool, theme: &Theme) -> Block<'a> {
    let border = if focused { theme.accent } else { theme.border };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
}

pub fn render_compose(
    frame: &mut Frame,
    area: Rect,
    draft: &NewPost,
    focus: ComposeField,
    preview: bool,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(area);

    let title = field_block("title", focus == ComposeField::Title, theme);
    let title_inner = title.inner(chunks[0]);
    frame.render_widget(title, chunks[0]);
    frame.render_widget(Paragraph::new(draft.title.clone()), title_inner);

    let summary = field_block("summary", focus == ComposeField::Summary, theme);
    let summary_inner = summary.inner(chunks[1]);
    frame.render_widget(summary, chunks[1]);
    frame.render_widget(Paragraph::new(draft.summary.clone()), summary_inner);

    if preview {
        let body = field_block("preview", false, theme);
        let body_inner = body.inner(chunks[2]);
        frame.render_widget(body, chunks[2]);
        if draft.content.trim().is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "nothing to preview yet",
                    Style::default().fg(theme.dim),
                )),
                body_inner,
            );
            return;
        }
        let lines: Vec<Line> = parse_markdown(&draft.content, theme)
            .iter()
            .take(body_inner.height as usize)
            .map(|styled| {
                Line::from(
                    styled
                        .spans
                        .iter()
                        .map(|s| Span::styled(s.text.clone(), s.style))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), body_inner);
    } else {
        let body = field_block("content (markdown)", focus == ComposeField::Content, theme);
        let body_inner = body.inner(chunks[2]);
        frame.render_widget(body, chunks[2]);
        frame.render_widget(
            Paragraph::new(draft.content.clone()).wrap(Wrap { trim: false }),
            body_inner,
        );
    }
}
