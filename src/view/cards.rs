//! Card list rendering.
//!
//! The blog page stacks its cards vertically; the expanded card grows in
//! place and pushes the rest of the list down. The gallery page shows the
//! same cards as a compact strip and leaves the detail to the lightbox.

use std::collections::HashSet;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::controller::CardDetailController;
use crate::model::card::{Card, CardId, DetailState};
use super::markdown::wrap_styled_lines;
use super::theme::Theme;

/// Lines for one card at its current expansion state.
pub fn card_lines(card: &Card, selected: bool, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let marker = if selected { "> " } else { "  " };
    let title_style = if selected {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.fg).add_modifier(Modifier::BOLD)
    };
    let mut header = vec![Span::styled(marker.to_string(), title_style)];
    header.push(Span::styled(card.title.clone(), title_style));
    lines.push(Line::from(header));

    if !card.subtitle.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {}", card.subtitle),
            Style::default().fg(theme.dim),
        )));
    }

    match &card.detail {
        DetailState::Absent => {}
        DetailState::Loading { .. } => {
            lines.push(Line::from(Span::styled(
                "  loading...".to_string(),
                Style::default().fg(theme.dim).add_modifier(Modifier::ITALIC),
            )));
        }
        DetailState::Ready { lines: detail } => {
            lines.push(Line::default());
            let wrapped = wrap_styled_lines(detail, width.saturating_sub(4));
            for styled in wrapped {
                let mut spans = vec![Span::raw("    ")];
                spans.extend(
                    styled
                        .spans
                        .iter()
                        .map(|s| Span::styled(s.text.clone(), s.style)),
                );
                lines.push(Line::from(spans));
            }
            lines.push(Line::default());
        }
        DetailState::Failed { message } => {
            lines.push(Line::from(Span::styled(
                format!("  {message}"),
                Style::default().fg(theme.error),
            )));
        }
    }

    lines
}

/// The blog list: every card's lines concatenated, scrolled by whole lines.
pub fn render_card_list(
    frame: &mut Frame,
    area: Rect,
    controller: &CardDetailController,
    selected: Option<usize>,
    scroll: usize,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title("posts");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    for (idx, card) in controller.cards().iter().enumerate() {
        lines.extend(card_lines(
            card,
            selected == Some(idx),
            inner.width as usize,
            theme,
        ));
        lines.push(Line::default());
    }

    let visible: Vec<Line> = lines
        .into_iter()
        .skip(scroll)
        .take(inner.height as usize)
        .collect();
    frame.render_widget(Paragraph::new(visible), inner);
}

/// First screen line of a card within the concatenated blog list. Used to
/// keep an expanding card inside the viewport.
pub fn card_line_offset(
    controller: &CardDetailController,
    target: usize,
    width: usize,
    theme: &Theme,
) -> usize {
    controller
        .cards()
        .iter()
        .take(target)
        .map(|card| card_lines(card, false, width, theme).len() + 1)
        .sum()
}

/// The gallery strip: one row per card with its like heart, detail lives in
/// the lightbox.
pub fn render_gallery_strip(
    frame: &mut Frame,
    area: Rect,
    controller: &CardDetailController,
    selected: Option<usize>,
    liked: &HashSet<CardId>,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title("gallery");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = controller
        .cards()
        .iter()
        .enumerate()
        .take(inner.height as usize)
        .map(|(idx, card)| {
            let style = if selected == Some(idx) {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.fg)
            };
            let marker = if selected == Some(idx) { "> " } else { "  " };
            let heart = if liked.contains(&card.id) {
                Span::styled("♥ ".to_string(), Style::default().fg(theme.liked))
            } else {
                Span::styled("♡ ".to_string(), Style::default().fg(theme.dim))
            };
            Line::from(vec![
                Span::styled(marker.to_string(), style),
                heart,
                Span::styled(card.title.clone(), style),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}
