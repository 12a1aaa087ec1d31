//! The shared lightbox surface.
//!
//! One modal exists for the whole gallery page. Whatever card is expanded
//! writes its detail lines into it; collapse empties it. Rendering clears
//! the cells underneath so the page content does not bleed through.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::markdown::{wrap_styled_lines, StyledLine};
use super::theme::Theme;

/// Clamp a rectangle into `bounds` so rendering can never leave the frame.
fn clamp_rect(rect: Rect, bounds: Rect) -> Rect {
    let x = rect.x.min(bounds.x + bounds.width.saturating_sub(1));
    let y = rect.y.min(bounds.y + bounds.height.saturating_sub(1));
    let max_width = (bounds.x + bounds.width).saturating_sub(x);
    let max_height = (bounds.y + bounds.height).saturating_sub(y);
    Rect {
        x,
        y,
        width: rect.width.min(max_width),
        height: rect.height.min(max_height),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modal {
    pub title: Option<String>,
    pub lines: Vec<StyledLine>,
    pub width: u16,
    pub max_height: u16,
    pub scroll_offset: usize,
}

impl Modal {
    pub fn new(lines: Vec<StyledLine>) -> Self {
        Self {
            title: None,
            lines,
            width: 64,
            max_height: 20,
            scroll_offset: 0,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    pub fn with_max_height(mut self, max_height: u16) -> Self {
        self.max_height = max_height;
        self
    }

    pub fn scroll_down(&mut self) {
        if self.scroll_offset + 1 < self.lines.len() {
            self.scroll_offset += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Centered placement, shrunk to the content when it is short.
    pub fn calculate_area(&self, terminal_area: Rect) -> Rect {
        let width = self.width.min(terminal_area.width);
        let wrap_width = width.saturating_sub(2) as usize;
        let content = wrap_styled_lines(&self.lines, wrap_width).len() as u16;
        let height = (content + 2).min(self.max_height).min(terminal_area.height);
        Rect {
            x: (terminal_area.width.saturating_sub(width)) / 2,
            y: (terminal_area.height.saturating_sub(height)) / 2,
            width,
            height,
        }
    }

    pub fn render(&self, frame: &mut Frame, theme: &Theme) {
        let area = clamp_rect(self.calculate_area(frame.area()), frame.area());
        if area.width == 0 || area.height == 0 {
            return;
        }

        frame.render_widget(Clear, area);

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .style(Style::default().bg(theme.overlay_bg).fg(theme.fg));
        if let Some(title) = &self.title {
            block = block.title(title.as_str());
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let wrapped = wrap_styled_lines(&self.lines, inner.width as usize);
        let visible: Vec<Line> = wrapped
            .iter()
            .skip(self.scroll_offset)
            .take(inner.height as usize)
            .map(|line| {
                Line::from(
                    line.spans
                        .iter()
                        .map(|s| Span::styled(s.text.clone(), s.style))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();
        frame.render_widget(Paragraph::new(visible), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<StyledLine> {
        (0..n)
            .map(|i| StyledLine::styled(format!("line {i}"), Style::default()))
            .collect()
    }

    #[test]
    fn test_area_is_centered_and_content_sized() {
        let terminal = Rect::new(0, 0, 100, 50);
        let modal = Modal::new(lines(3)).with_width(40).with_max_height(20);
        let area = modal.calculate_area(terminal);
        assert_eq!(area.width, 40);
        // 3 content lines + 2 border rows
        assert_eq!(area.height, 5);
        assert_eq!(area.x, 30);
        assert_eq!(area.y, 22);
    }

    #[test]
    fn test_tall_content_is_capped() {
        let terminal = Rect::new(0, 0, 100, 50);
        let modal = Modal::new(lines(100)).with_max_height(20);
        assert_eq!(modal.calculate_area(terminal).height, 20);
    }

    #[test]
    fn test_area_never_exceeds_small_terminal() {
        let terminal = Rect::new(0, 0, 10, 4);
        let modal = Modal::new(lines(100)).with_width(64);
        let area = modal.calculate_area(terminal);
        assert!(area.width <= 10);
        assert!(area.height <= 4);
    }

    #[test]
    fn test_scroll_is_bounded() {
        let mut modal = Modal::new(lines(3));
        modal.scroll_up();
        assert_eq!(modal.scroll_offset, 0);
        for _ in 0..10 {
            modal.scroll_down();
        }
        assert_eq!(modal.scroll_offset, 2);
    }

    #[test]
    fn test_clamp_rect_inside_bounds() {
        let bounds = Rect::new(0, 0, 100, 50);
        let rect = Rect::new(10, 20, 30, 10);
        assert_eq!(clamp_rect(rect, bounds), rect);

        let out = Rect::new(199, 60, 30, 10);
        let clamped = clamp_rect(out, bounds);
        assert_eq!((clamped.x, clamped.y), (99, 49));
        assert_eq!((clamped.width, clamped.height), (1, 1));
    }
}
