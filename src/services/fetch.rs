//! Detail-fetch capability.
//!
//! The controller never talks to the network directly: it hands a ticket
//! and a location to a `DetailFetcher` and expects the outcome to come back
//! later through `complete_fetch`. There is no cancellation; a request for
//! a card that has since collapsed simply produces a stale ticket that the
//! controller drops at commit time.

use std::sync::mpsc::Sender;

use thiserror::Error;

use crate::model::card::FetchTicket;
use crate::services::api::ApiJob;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (DNS, refused, timeout).
    #[error("request failed: {0}")]
    Transport(String),
    /// The server answered with a non-2xx status.
    #[error("server returned status {0}")]
    Status(u16),
}

/// Fire-and-forget fetch start. Implementations must eventually cause
/// `CardDetailController::complete_fetch` to run with the same ticket.
pub trait DetailFetcher: Send {
    fn fetch(&self, ticket: FetchTicket, location: &str);
}

/// Default collaborator: drops the request on the floor. The card stays
/// `Loading` until collapsed, which is exactly what a request that never
/// completes looks like.
pub struct NullFetcher;

impl DetailFetcher for NullFetcher {
    fn fetch(&self, ticket: FetchTicket, location: &str) {
        tracing::warn!(?ticket, location, "no fetcher configured, dropping detail request");
    }
}

/// Production fetcher: enqueues the request on the API worker thread.
pub struct WorkerFetcher {
    jobs: Sender<ApiJob>,
}

impl WorkerFetcher {
    pub fn new(jobs: Sender<ApiJob>) -> Self {
        Self { jobs }
    }
}

impl DetailFetcher for WorkerFetcher {
    fn fetch(&self, ticket: FetchTicket, location: &str) {
        let job = ApiJob::FetchDetail {
            ticket,
            location: location.to_string(),
        };
        if self.jobs.send(job).is_err() {
            tracing::warn!(?ticket, "api worker is gone, detail request dropped");
        }
    }
}
