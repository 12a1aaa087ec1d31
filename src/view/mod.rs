//! Terminal rendering: page views, the shared overlay surface, markdown
//! styling, and themes.

pub mod cards;
pub mod comments;
pub mod compose;
pub mod markdown;
pub mod modal;
pub mod theme;
