//! Markup rendering and sanitization capabilities.
//!
//! Both are injected into the controller so that a missing collaborator is
//! a constructor-time decision: a controller built without a real renderer
//! takes the rendered-error path instead of crashing at load time.

use thiserror::Error;

use crate::view::markdown::{parse_markdown, StyledLine};
use crate::view::theme::Theme;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// The rendering collaborator is absent.
    #[error("markdown renderer is not available")]
    Unavailable,
}

/// Structured text in, styled terminal lines out.
pub trait MarkupRenderer: Send {
    fn render(&self, source: &str) -> Result<Vec<StyledLine>, MarkupError>;
}

/// Default collaborator: always fails.
pub struct NullRenderer;

impl MarkupRenderer for NullRenderer {
    fn render(&self, _source: &str) -> Result<Vec<StyledLine>, MarkupError> {
        Err(MarkupError::Unavailable)
    }
}

/// pulldown-cmark renderer producing themed lines.
pub struct CmarkRenderer {
    theme: Theme,
}

impl CmarkRenderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }
}

impl MarkupRenderer for CmarkRenderer {
    fn render(&self, source: &str) -> Result<Vec<StyledLine>, MarkupError> {
        Ok(parse_markdown(source, &self.theme))
    }
}

/// Pass over rendered lines before they are committed to the detail surface.
pub trait MarkupSanitizer: Send {
    fn sanitize(&self, lines: Vec<StyledLine>) -> Vec<StyledLine>;
}

/// Default: rendered markup is inserted untouched. This is a deliberate
/// trust assumption on the content origin; supply a real sanitizer when the
/// source is untrusted.
pub struct PassthroughSanitizer;

impl MarkupSanitizer for PassthroughSanitizer {
    fn sanitize(&self, lines: Vec<StyledLine>) -> Vec<StyledLine> {
        lines
    }
}

/// Removes control characters from rendered text so a hostile document
/// cannot smuggle escape sequences into the terminal.
pub struct ControlStripSanitizer;

impl MarkupSanitizer for ControlStripSanitizer {
    fn sanitize(&self, mut lines: Vec<StyledLine>) -> Vec<StyledLine> {
        for line in &mut lines {
            for span in &mut line.spans {
                if span.text.chars().any(char::is_control) {
                    span.text.retain(|c| !c.is_control());
                }
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Style;

    #[test]
    fn test_null_renderer_is_unavailable() {
        assert_eq!(
            NullRenderer.render("# hi").unwrap_err(),
            MarkupError::Unavailable
        );
    }

    #[test]
    fn test_cmark_renderer_produces_lines() {
        let renderer = CmarkRenderer::new(Theme::dark());
        let lines = renderer.render("plain text").unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "plain text");
    }

    #[test]
    fn test_control_strip_removes_escapes() {
        let line = StyledLine::styled("a\u{1b}[31mb\u{7}", Style::default());
        let out = ControlStripSanitizer.sanitize(vec![line]);
        assert_eq!(out[0].text(), "a[31mb");
    }

    #[test]
    fn test_passthrough_keeps_text() {
        let line = StyledLine::styled("a\u{1b}b", Style::default());
        let out = PassthroughSanitizer.sanitize(vec![line.clone()]);
        assert_eq!(out[0], line);
    }
}
