//! Application state and event dispatch.
//!
//! The event loop lives in `main`; everything it mutates lives here so the
//! whole surface is drivable from tests with a `TestBackend` and a pair of
//! bare channels.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    Frame,
};

use crate::config::Config;
use crate::controller::{CardDetailController, Strategy};
use crate::model::card::{Card, CardId, DetailState, InlineFields};
use crate::model::comment::{NewComment, MAX_COMMENT_LEN};
use crate::model::post::{NewPost, Post};
use crate::services::api::{ApiError, ApiEvent, ApiJob};
use crate::services::fetch::WorkerFetcher;
use crate::services::markup::{CmarkRenderer, ControlStripSanitizer};
use crate::services::session::{self, Session};
use crate::view::cards::{card_line_offset, render_card_list, render_gallery_strip};
use crate::view::comments::render_comments;
use crate::view::compose::{render_compose, ComposeField};
use crate::view::modal::Modal;
use crate::view::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Blog,
    Gallery,
    Comments,
    Compose,
}

impl Page {
    fn label(self) -> &'static str {
        match self {
            Page::Blog => "blog",
            Page::Gallery => "gallery",
            Page::Comments => "comments",
            Page::Compose => "compose",
        }
    }
}

const PAGES: [Page; 4] = [Page::Blog, Page::Gallery, Page::Comments, Page::Compose];

pub struct App {
    pub config: Config,
    config_path: PathBuf,
    pub theme: Theme,
    pub page: Page,

    pub blog: CardDetailController,
    pub gallery: CardDetailController,
    pub posts: Vec<Post>,
    pub comments: Vec<crate::model::comment::Comment>,
    pub liked: HashSet<CardId>,

    pub session: Option<Session>,
    session_path: PathBuf,
    /// Password being typed in the login prompt; `None` means closed.
    pub login_input: Option<String>,

    pub comment_input: String,
    pub draft: NewPost,
    pub compose_focus: ComposeField,
    pub compose_preview: bool,

    pub blog_selected: usize,
    pub gallery_selected: usize,
    blog_scroll: usize,
    comments_scroll: usize,
    modal_scroll: usize,

    pub status: Option<String>,
    jobs: Sender<ApiJob>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: Config,
        config_path: PathBuf,
        jobs: Sender<ApiJob>,
        session_path: PathBuf,
    ) -> Self {
        let theme = Theme::from_name(&config.theme);

        // Remote articles come off the wire, so rendered lines get control
        // characters stripped before they reach the terminal.
        let blog = CardDetailController::new(Strategy::ExpandInPlace)
            .with_fetcher(Box::new(WorkerFetcher::new(jobs.clone())))
            .with_renderer(Box::new(CmarkRenderer::new(theme.clone())))
            .with_sanitizer(Box::new(ControlStripSanitizer));

        let mut gallery = CardDetailController::new(Strategy::OverlayModal)
            .with_renderer(Box::new(CmarkRenderer::new(theme.clone())));
        gallery.register(
            config
                .gallery
                .iter()
                .enumerate()
                .map(|(idx, item)| {
                    Card::inline(
                        CardId(idx as u64),
                        item.title.clone(),
                        InlineFields {
                            title: item.title.clone(),
                            image: Some(item.image.clone()),
                            excerpt: item.caption.clone(),
                        },
                    )
                })
                .collect(),
        );

        let session = session::load(&session_path);

        let mut app = Self {
            config,
            config_path,
            theme,
            page: Page::Blog,
            blog,
            gallery,
            posts: Vec::new(),
            comments: Vec::new(),
            liked: HashSet::new(),
            session,
            session_path,
            login_input: None,
            comment_input: String::new(),
            draft: NewPost::default(),
            compose_focus: ComposeField::Title,
            compose_preview: false,
            blog_selected: 0,
            gallery_selected: 0,
            blog_scroll: 0,
            comments_scroll: 0,
            modal_scroll: 0,
            status: None,
            jobs,
            should_quit: false,
        };
        app.submit(ApiJob::LoadPosts);
        app.submit(ApiJob::LoadComments);
        app
    }

    pub fn logged_in(&self) -> bool {
        self.session.is_some()
    }

    fn submit(&self, job: ApiJob) {
        if self.jobs.send(job).is_err() {
            tracing::warn!("api worker is gone, job dropped");
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    // ----- input -----

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('q') {
            self.should_quit = true;
            return;
        }

        if self.login_input.is_some() {
            self.handle_login_key(key);
            return;
        }

        match key.code {
            KeyCode::Tab if self.page != Page::Compose => {
                let idx = PAGES.iter().position(|p| *p == self.page).unwrap_or(0);
                self.switch_page(PAGES[(idx + 1) % PAGES.len()]);
                return;
            }
            KeyCode::Esc => {
                self.dismiss();
                return;
            }
            _ => {}
        }

        match self.page {
            Page::Blog => self.handle_blog_key(key),
            Page::Gallery => self.handle_gallery_key(key),
            Page::Comments => self.handle_comments_key(key),
            Page::Compose => self.handle_compose_key(key),
        }
    }

    fn switch_page(&mut self, page: Page) {
        if page == Page::Compose && !self.logged_in() {
            self.set_status("log in first (ctrl+l)");
            return;
        }
        self.page = page;
        self.status = None;
    }

    /// Escape: close the topmost surface, one layer per press.
    fn dismiss(&mut self) {
        match self.page {
            Page::Blog => self.blog.dismiss(),
            Page::Gallery => {
                self.gallery.dismiss();
                self.modal_scroll = 0;
            }
            Page::Comments => self.comment_input.clear(),
            Page::Compose => self.switch_page(Page::Blog),
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        let Some(input) = self.login_input.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.login_input = None,
            KeyCode::Enter => {
                let password = std::mem::take(input);
                self.login_input = None;
                self.submit(ApiJob::Login { password });
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
    }

    fn toggle_login(&mut self) {
        if self.session.is_some() {
            self.session = None;
            if let Err(err) = session::clear(&self.session_path) {
                tracing::warn!(%err, "could not remove session file");
            }
            self.set_status("logged out");
        } else {
            self.login_input = Some(String::new());
        }
    }

    fn handle_blog_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('l') {
            self.toggle_login();
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up => self.blog_selected = self.blog_selected.saturating_sub(1),
            KeyCode::Down => {
                let last = self.blog.cards().len().saturating_sub(1);
                self.blog_selected = (self.blog_selected + 1).min(last);
            }
            KeyCode::Enter => {
                if let Some(card) = self.blog.cards().get(self.blog_selected) {
                    let id = card.id;
                    if card.expanded && !card.detail.is_failed() {
                        self.blog.collapse(id);
                    } else {
                        self.blog.expand(id);
                    }
                }
            }
            KeyCode::Char('r') => self.submit(ApiJob::LoadPosts),
            KeyCode::Char('t') => self.toggle_theme(),
            _ => {}
        }
    }

    fn handle_gallery_key(&mut self, key: KeyEvent) {
        if self.gallery.overlay_open() {
            // Scroll is locked to the lightbox while it is up.
            match key.code {
                KeyCode::Up => self.modal_scroll = self.modal_scroll.saturating_sub(1),
                KeyCode::Down => self.modal_scroll += 1,
                KeyCode::Enter | KeyCode::Char('q') => {
                    self.gallery.dismiss();
                    self.modal_scroll = 0;
                }
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up => self.gallery_selected = self.gallery_selected.saturating_sub(1),
            KeyCode::Down => {
                let last = self.gallery.cards().len().saturating_sub(1);
                self.gallery_selected = (self.gallery_selected + 1).min(last);
            }
            KeyCode::Enter => {
                if let Some(card) = self.gallery.cards().get(self.gallery_selected) {
                    let id = card.id;
                    self.modal_scroll = 0;
                    self.gallery.expand(id);
                }
            }
            KeyCode::Char('l') => {
                if let Some(card) = self.gallery.cards().get(self.gallery_selected) {
                    let id = card.id;
                    if !self.liked.insert(id) {
                        self.liked.remove(&id);
                    }
                }
            }
            KeyCode::Char('t') => self.toggle_theme(),
            _ => {}
        }
    }

    fn handle_comments_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('l') => self.toggle_login(),
                // Author moderation: remove the comment at the top of the view
                KeyCode::Char('d') => self.delete_selected_comment(),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Enter => self.submit_comment(),
            KeyCode::Backspace => {
                self.comment_input.pop();
            }
            KeyCode::Up => self.comments_scroll = self.comments_scroll.saturating_sub(1),
            KeyCode::Down => self.comments_scroll += 1,
            KeyCode::Char(c) => {
                if self.comment_input.chars().count() < MAX_COMMENT_LEN {
                    self.comment_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn submit_comment(&mut self) {
        let content = self.comment_input.trim().to_string();
        if content.is_empty() {
            return;
        }
        let nickname = self
            .session
            .as_ref()
            .map(|s| s.nickname.clone())
            .unwrap_or_default();
        self.submit(ApiJob::SubmitComment(NewComment { nickname, content }));
    }

    fn delete_selected_comment(&mut self) {
        let Some(token) = self.session.as_ref().map(|s| s.token.clone()) else {
            self.set_status("log in first (ctrl+l)");
            return;
        };
        // Each comment renders as three lines, so the scroll offset maps
        // straight onto an index.
        let offset = self.comments_scroll / 3;
        if let Some(comment) = self.comments.get(offset) {
            self.submit(ApiJob::DeleteComment {
                id: comment.id,
                token,
            });
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('p') => self.compose_preview = !self.compose_preview,
                KeyCode::Char('s') => self.publish(),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Tab => self.compose_focus = self.compose_focus.next(),
            KeyCode::Enter if self.compose_focus == ComposeField::Content => {
                self.draft.content.push('\n');
            }
            KeyCode::Backspace => {
                self.focused_field_mut().pop();
            }
            KeyCode::Char(c) => self.focused_field_mut().push(c),
            _ => {}
        }
    }

    fn focused_field_mut(&mut self) -> &mut String {
        match self.compose_focus {
            ComposeField::Title => &mut self.draft.title,
            ComposeField::Summary => &mut self.draft.summary,
            ComposeField::Content => &mut self.draft.content,
        }
    }

    fn publish(&mut self) {
        let Some(token) = self.session.as_ref().map(|s| s.token.clone()) else {
            self.set_status("log in first (ctrl+l)");
            return;
        };
        if self.draft.title.trim().is_empty() || self.draft.content.trim().is_empty() {
            self.set_status("a post needs a title and content");
            return;
        }
        self.submit(ApiJob::Publish {
            post: self.draft.clone(),
            token,
        });
    }

    fn toggle_theme(&mut self) {
        self.config.theme = if self.config.theme == "dark" {
            "light".to_string()
        } else {
            "dark".to_string()
        };
        self.theme = Theme::from_name(&self.config.theme);
        if let Err(err) = self.config.save(&self.config_path) {
            tracing::warn!(%err, "could not persist theme choice");
        }
    }

    // ----- api completions -----

    pub fn apply_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::Posts(Ok(posts)) => {
                let cards = posts
                    .iter()
                    .map(|post| {
                        let subtitle = if post.tags.is_empty() {
                            post.date()
                        } else {
                            format!("{} · {}", post.date(), post.tags)
                        };
                        Card::remote(
                            CardId(post.id),
                            post.title.clone(),
                            post.markdown_location(&self.config.md_base),
                        )
                        .with_subtitle(subtitle)
                    })
                    .collect();
                self.blog.register(cards);
                self.posts = posts;
            }
            ApiEvent::Posts(Err(err)) => {
                // Offline fallback: show the statically configured cards so
                // the page is still browsable.
                if self.blog.cards().is_empty() {
                    let cards = self
                        .config
                        .fallback_posts
                        .iter()
                        .enumerate()
                        .map(|(idx, post)| {
                            Card::inline(
                                // High ids keep clear of real post ids
                                CardId(u64::MAX - idx as u64),
                                post.title.clone(),
                                InlineFields {
                                    title: post.title.clone(),
                                    image: None,
                                    excerpt: post.excerpt.clone(),
                                },
                            )
                        })
                        .collect();
                    self.blog.register(cards);
                }
                self.fail("could not load posts", err);
            }
            ApiEvent::Comments(Ok(comments)) => self.comments = comments,
            ApiEvent::Comments(Err(err)) => self.fail("could not load comments", err),
            ApiEvent::CommentSubmitted(Ok(())) => {
                self.comment_input.clear();
                self.submit(ApiJob::LoadComments);
            }
            ApiEvent::CommentSubmitted(Err(err)) => self.fail("comment rejected", err),
            ApiEvent::CommentDeleted(Ok(())) => self.submit(ApiJob::LoadComments),
            ApiEvent::CommentDeleted(Err(err)) => self.fail("delete failed", err),
            ApiEvent::LoggedIn(Ok(session)) => {
                if let Err(err) = session::save(&self.session_path, &session) {
                    tracing::warn!(%err, "could not persist session");
                }
                self.set_status(format!("welcome back, {}", session.nickname));
                self.session = Some(session);
            }
            ApiEvent::LoggedIn(Err(err)) => {
                // A rejected password is not a stale session; reopen the
                // prompt with the hint instead of invalidating anything.
                tracing::warn!(%err, "login failed");
                self.login_input = Some(String::new());
                self.set_status("wrong password");
            }
            ApiEvent::Published(Ok(())) => {
                self.draft = NewPost::default();
                self.compose_preview = false;
                self.submit(ApiJob::LoadPosts);
                self.page = Page::Blog;
                self.set_status("published");
            }
            ApiEvent::Published(Err(err)) => self.fail("publish failed", err),
            ApiEvent::Detail { ticket, result } => self.blog.complete_fetch(ticket, result),
        }
    }

    fn fail(&mut self, what: &str, err: ApiError) {
        if matches!(err, ApiError::Unauthorized) {
            // The token the server rejected is not coming back.
            self.session = None;
            if let Err(err) = session::clear(&self.session_path) {
                tracing::warn!(%err, "could not remove session file");
            }
            self.set_status("session expired, log in again (ctrl+l)");
            return;
        }
        tracing::warn!(%err, what, "api call failed");
        self.set_status(format!("{what}: {err}"));
    }

    // ----- rendering -----

    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_nav(frame, chunks[0]);

        match self.page {
            Page::Blog => {
                let width = chunks[1].width.saturating_sub(2) as usize;
                if let Some(id) = self.blog.take_scroll_request() {
                    if let Some(pos) = self.blog.cards().iter().position(|c| c.id == id) {
                        self.blog_scroll = card_line_offset(&self.blog, pos, width, &self.theme);
                    }
                }
                render_card_list(
                    frame,
                    chunks[1],
                    &self.blog,
                    Some(self.blog_selected),
                    self.blog_scroll,
                    &self.theme,
                );
            }
            Page::Gallery => {
                render_gallery_strip(
                    frame,
                    chunks[1],
                    &self.gallery,
                    Some(self.gallery_selected),
                    &self.liked,
                    &self.theme,
                );
                if self.gallery.overlay_open() {
                    if let Some(card) = self.gallery.expanded().and_then(|id| self.gallery.card(id))
                    {
                        let lines = match &card.detail {
                            DetailState::Ready { lines } => lines.clone(),
                            _ => Vec::new(),
                        };
                        let mut modal = Modal::new(lines).with_title(card.title.clone());
                        modal.scroll_offset = self.modal_scroll;
                        modal.render(frame, &self.theme);
                    }
                }
            }
            Page::Comments => {
                render_comments(
                    frame,
                    chunks[1],
                    &self.comments,
                    &self.config.author_nickname,
                    &self.comment_input,
                    self.comments_scroll,
                    &self.theme,
                );
            }
            Page::Compose => {
                render_compose(
                    frame,
                    chunks[1],
                    &self.draft,
                    self.compose_focus,
                    self.compose_preview,
                    &self.theme,
                );
            }
        }

        self.render_status(frame, chunks[2]);

        if let Some(input) = &self.login_input {
            let masked = "*".repeat(input.chars().count());
            let modal = Modal::new(vec![crate::view::markdown::StyledLine::styled(
                masked,
                Style::default().fg(self.theme.fg),
            )])
            .with_title("password")
            .with_width(30);
            modal.render(frame, &self.theme);
        }
    }

    fn render_nav(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let mut spans = Vec::new();
        for page in PAGES {
            let style = if page == self.page {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.dim)
            };
            spans.push(Span::styled(format!(" {} ", page.label()), style));
        }
        spans.push(Span::styled(
            if let Some(session) = &self.session {
                format!("  [{}]", session.nickname)
            } else {
                "  [guest]".to_string()
            },
            Style::default().fg(self.theme.badge),
        ));
        frame.render_widget(
            ratatui::widgets::Paragraph::new(Line::from(spans))
                .style(Style::default().bg(self.theme.bg)),
            area,
        );
    }

    fn render_status(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let text = self.status.clone().unwrap_or_else(|| {
            "tab: pages · enter: open · esc: close · ctrl+l: login · ctrl+q: quit".to_string()
        });
        frame.render_widget(
            ratatui::widgets::Paragraph::new(text).style(Style::default().fg(self.theme.dim)),
            area,
        );
    }
}
