//! petal - a terminal browser for a personal blog and art gallery.
//!
//! The interaction core is [`controller::CardDetailController`], a headless
//! state machine that mediates between collapsed card summaries and a single
//! expanded detail view. Everything with a side effect (network, markdown
//! rendering, sanitization) is an injected collaborator, so the controller
//! is fully unit-testable without a terminal or a server.

pub mod app;
pub mod config;
pub mod controller;
pub mod model;
pub mod services;
pub mod view;
