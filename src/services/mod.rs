//! Side-effect collaborators: HTTP client and worker, fetch and markup
//! capability traits, session persistence.

pub mod api;
pub mod fetch;
pub mod markup;
pub mod session;
