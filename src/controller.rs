//! Card detail state machine.
//!
//! Mediates, for one collection of cards, the transition between a collapsed
//! summary presentation and a single expanded detail presentation. Both
//! strategies the site uses go through the same controller: article cards
//! that expand in place, and image cards that open in a shared lightbox
//! overlay.
//!
//! The controller is headless. It owns no terminal or network handle; the
//! fetch, markdown-rendering, and sanitization collaborators are injected,
//! so every state transition is unit-testable.
//!
//! Invariants:
//! - at most one card in the collection is expanded at any time, enforced by
//!   collapsing the previous card before a new one expands;
//! - a detail view is destroyed on collapse, not hidden, so re-expansion of
//!   a remote card re-fetches;
//! - expanding an already-expanded card is a no-op, unless its detail load
//!   failed, in which case the expansion retries the fetch.

use std::collections::HashMap;

use ratatui::style::{Modifier, Style};

use crate::model::card::{Card, CardId, DetailSource, DetailState, FetchTicket, InlineFields};
use crate::services::fetch::{DetailFetcher, FetchError, NullFetcher};
use crate::services::markup::{MarkupRenderer, MarkupSanitizer, NullRenderer, PassthroughSanitizer};
use crate::view::markdown::StyledLine;

/// How expanded detail content is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Detail renders inline beneath the card, pushing layout.
    ExpandInPlace,
    /// Detail renders in a single shared surface layered above the page.
    OverlayModal,
}

/// Guidance appended to every load failure.
const RETRY_HINT: &str = "Select the card again to retry.";

pub struct CardDetailController {
    strategy: Strategy,
    cards: Vec<Card>,
    index: HashMap<CardId, usize>,
    expanded: Option<CardId>,
    overlay_open: bool,
    scroll_locked: bool,
    scroll_request: Option<CardId>,
    next_seq: u64,
    fetcher: Box<dyn DetailFetcher>,
    renderer: Box<dyn MarkupRenderer>,
    sanitizer: Box<dyn MarkupSanitizer>,
}

impl CardDetailController {
    /// A controller with null collaborators: remote loads stay pending and
    /// rendering reports the missing collaborator as a rendered error.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            cards: Vec::new(),
            index: HashMap::new(),
            expanded: None,
            overlay_open: false,
            scroll_locked: false,
            scroll_request: None,
            next_seq: 0,
            fetcher: Box::new(NullFetcher),
            renderer: Box::new(NullRenderer),
            sanitizer: Box::new(PassthroughSanitizer),
        }
    }

    pub fn with_fetcher(mut self, fetcher: Box<dyn DetailFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn MarkupRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: Box<dyn MarkupSanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Attach the supplied cards to the collection, preserving order.
    /// Idempotent per card id: an id that is already registered is left
    /// exactly as it is, so re-registering after a listing refresh cannot
    /// reset an expanded card.
    pub fn register(&mut self, cards: Vec<Card>) {
        for card in cards {
            if self.index.contains_key(&card.id) {
                continue;
            }
            self.index.insert(card.id, self.cards.len());
            self.cards.push(card);
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.index.get(&id).map(|&pos| &self.cards[pos])
    }

    pub fn expanded(&self) -> Option<CardId> {
        self.expanded
    }

    pub fn any_expanded(&self) -> bool {
        self.expanded.is_some()
    }

    /// Whether the shared overlay surface is currently shown.
    pub fn overlay_open(&self) -> bool {
        self.overlay_open
    }

    /// Whether page scrolling is locked behind the overlay.
    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Card the view should bring into the viewport, cleared on read.
    pub fn take_scroll_request(&mut self) -> Option<CardId> {
        self.scroll_request.take()
    }

    /// Expand a card. Collapses whichever card is currently expanded first,
    /// so the shared detail surface never has two writers.
    pub fn expand(&mut self, id: CardId) {
        let Some(&pos) = self.index.get(&id) else {
            tracing::warn!(?id, "expand called with a card outside the collection");
            return;
        };

        if self.expanded == Some(id) {
            // Re-expanding is a no-op unless the previous load failed; a
            // failed view is the one state where expand means retry.
            if !self.cards[pos].detail.is_failed() {
                return;
            }
        } else if let Some(current) = self.expanded {
            self.collapse(current);
        }

        self.expanded = Some(id);
        self.cards[pos].expanded = true;
        if self.strategy == Strategy::OverlayModal {
            self.overlay_open = true;
            self.scroll_locked = true;
        }

        match self.cards[pos].source.clone() {
            DetailSource::Inline(fields) => {
                // Inline fields are copied synchronously, no suspension.
                self.cards[pos].detail = DetailState::Ready {
                    lines: inline_lines(&fields),
                };
            }
            DetailSource::Remote { location } => {
                self.next_seq += 1;
                let ticket = FetchTicket {
                    card: id,
                    seq: self.next_seq,
                };
                self.cards[pos].detail = DetailState::Loading { ticket };
                self.fetcher.fetch(ticket, &location);
            }
        }

        self.scroll_request = Some(id);
    }

    /// Collapse a card. Safe on a card that is not expanded. The detail
    /// content is removed rather than hidden, so layout fully reverts.
    pub fn collapse(&mut self, id: CardId) {
        let Some(&pos) = self.index.get(&id) else {
            tracing::warn!(?id, "collapse called with a card outside the collection");
            return;
        };
        if !self.cards[pos].expanded {
            return;
        }

        self.cards[pos].expanded = false;
        self.cards[pos].detail = DetailState::Absent;
        if self.expanded == Some(id) {
            self.expanded = None;
        }
        if self.strategy == Strategy::OverlayModal {
            self.overlay_open = false;
            self.scroll_locked = false;
        }
    }

    /// Cancel signal (Escape or a dismiss control): collapse whatever is
    /// expanded and close the overlay. Both apply independently.
    pub fn dismiss(&mut self) {
        if let Some(id) = self.expanded {
            self.collapse(id);
        }
        self.overlay_open = false;
        self.scroll_locked = false;
    }

    /// Commit the outcome of a remote fetch.
    ///
    /// An outcome whose ticket no longer matches the card's loading state
    /// arrived after the card moved on (collapsed, or re-expanded with a
    /// newer ticket) and is dropped without touching the view.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<String, FetchError>) {
        let Some(&pos) = self.index.get(&ticket.card) else {
            tracing::debug!(?ticket, "fetch result for an unknown card, dropping");
            return;
        };
        match &self.cards[pos].detail {
            DetailState::Loading { ticket: current } if *current == ticket => {}
            _ => {
                tracing::debug!(?ticket, "discarding stale fetch result");
                return;
            }
        }

        self.cards[pos].detail = match result {
            Ok(text) => match self.renderer.render(&text) {
                Ok(lines) => DetailState::Ready {
                    lines: self.sanitizer.sanitize(lines),
                },
                Err(err) => {
                    tracing::warn!(%err, "markup renderer unavailable");
                    failed(format!("Could not render the article: {err}."))
                }
            },
            Err(err) => {
                tracing::warn!(%err, ?ticket, "detail fetch failed");
                failed(format!("Failed to load the article: {err}."))
            }
        };
    }
}

fn failed(message: String) -> DetailState {
    DetailState::Failed {
        message: format!("{message} {RETRY_HINT}"),
    }
}

/// Copy a card's own summary fields into detail lines.
fn inline_lines(fields: &InlineFields) -> Vec<StyledLine> {
    let mut lines = Vec::new();
    lines.push(StyledLine::styled(
        fields.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    if let Some(image) = &fields.image {
        lines.push(StyledLine::styled(
            format!("[image: {image}]"),
            Style::default().add_modifier(Modifier::DIM),
        ));
    }
    if !fields.excerpt.is_empty() {
        lines.push(StyledLine::new());
        lines.push(StyledLine::styled(fields.excerpt.clone(), Style::default()));
    }
    lines
}
