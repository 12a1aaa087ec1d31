//! Domain records: cards, blog posts, comments.

pub mod card;
pub mod comment;
pub mod post;
