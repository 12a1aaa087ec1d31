//! Comment wall rendering: the list of comments plus the input box with its
//! remaining-characters readout.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::model::comment::{browser_readout, os_readout, Comment, MAX_COMMENT_LEN};
use super::theme::Theme;

/// Lines for one comment entry.
pub fn comment_lines(comment: &Comment, author: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut header = vec![Span::styled(
        comment.nickname.clone(),
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    )];
    if comment.is_author(author) {
        header.push(Span::styled(
            " [author]".to_string(),
            Style::default().fg(theme.badge),
        ));
    }
    header.push(Span::styled(
        format!(
            "  {} · {} · {}",
            comment.timestamp(),
            browser_readout(&comment.user_agent),
            os_readout(&comment.user_agent)
        ),
        Style::default().fg(theme.dim),
    ));

    vec![
        Line::from(header),
        Line::from(Span::styled(
            comment.content.clone(),
            Style::default().fg(theme.fg),
        )),
        Line::default(),
    ]
}

pub fn render_comments(
    frame: &mut Frame,
    area: Rect,
    comments: &[Comment],
    author: &str,
    input: &str,
    scroll: usize,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(4)])
        .split(area);

    let list_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title("comments");
    let inner = list_block.inner(chunks[0]);
    frame.render_widget(list_block, chunks[0]);

    let lines: Vec<Line> = comments
        .iter()
        .flat_map(|c| comment_lines(c, author, theme))
        .skip(scroll)
        .take(inner.height as usize)
        .collect();
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);

    let remaining = MAX_COMMENT_LEN.saturating_sub(input.chars().count());
    let counter_style = if remaining == 0 {
        Style::default().fg(theme.error)
    } else {
        Style::default().fg(theme.dim)
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Line::from(vec![
            Span::raw("write a comment "),
            Span::styled(format!("({remaining} left)"), counter_style),
        ]));
    let input_inner = input_block.inner(chunks[1]);
    frame.render_widget(input_block, chunks[1]);
    frame.render_widget(
        Paragraph::new(input.to_string()).wrap(Wrap { trim: false }),
        input_inner,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn comment(nickname: &str) -> Comment {
        Comment {
            id: 1,
            nickname: nickname.to_string(),
            content: "nice art!".to_string(),
            ip: String::new(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) Firefox/130.0".to_string(),
            location: String::new(),
            created_at: Utc::now(),
        }
    }

    fn flat(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| {
                l.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_comment_lines_include_environment_readout() {
        let text = flat(&comment_lines(&comment("mika"), "awkker", &Theme::dark()));
        assert!(text.contains("mika"));
        assert!(text.contains("nice art!"));
        assert!(text.contains("Firefox"));
        assert!(text.contains("Linux"));
    }

    #[test]
    fn test_author_comment_is_badged() {
        let text = flat(&comment_lines(&comment("awkker"), "awkker", &Theme::dark()));
        assert!(text.contains("[author]"));
        let other = flat(&comment_lines(&comment("mika"), "awkker", &Theme::dark()));
        assert!(!other.contains("[author]"));
    }
}
