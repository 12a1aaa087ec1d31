//! Card and detail-view types managed by the controller.

use crate::view::markdown::StyledLine;

/// Stable identity of a card, opaque to the controller.
///
/// Cards built from the remote listing reuse the backend post id; static
/// and gallery cards get ids assigned by their page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub u64);

/// Summary fields already present in a card's own markup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InlineFields {
    pub title: String,
    pub image: Option<String>,
    pub excerpt: String,
}

/// Where the expanded detail content comes from. Fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailSource {
    /// Detail is already present in the card itself and is copied into the
    /// detail surface synchronously.
    Inline(InlineFields),
    /// Detail is fetched from a remote location on demand.
    Remote { location: String },
}

/// Identifies a single fetch attempt. A result arriving with a ticket that
/// no longer matches the card's loading state is late and gets discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub card: CardId,
    pub seq: u64,
}

/// Lifecycle of the rendered detail content for one card.
///
/// `Failed` is terminal but retriable: a later expansion of the same card
/// re-enters `Loading`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailState {
    #[default]
    Absent,
    Loading {
        ticket: FetchTicket,
    },
    Ready {
        lines: Vec<StyledLine>,
    },
    Failed {
        message: String,
    },
}

impl DetailState {
    pub fn is_absent(&self) -> bool {
        matches!(self, DetailState::Absent)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DetailState::Loading { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, DetailState::Ready { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DetailState::Failed { .. })
    }
}

/// A visual summary unit that can expand into a detail view.
#[derive(Debug, Clone)]
pub struct Card {
    pub id: CardId,
    /// Label shown on the collapsed list row.
    pub title: String,
    /// Secondary line under the title (date, medium, ...).
    pub subtitle: String,
    pub source: DetailSource,
    pub detail: DetailState,
    pub expanded: bool,
}

impl Card {
    pub fn inline(id: CardId, title: impl Into<String>, fields: InlineFields) -> Self {
        Self {
            id,
            title: title.into(),
            subtitle: String::new(),
            source: DetailSource::Inline(fields),
            detail: DetailState::Absent,
            expanded: false,
        }
    }

    pub fn remote(id: CardId, title: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            subtitle: String::new(),
            source: DetailSource::Remote {
                location: location.into(),
            },
            detail: DetailState::Absent,
            expanded: false,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }
}
