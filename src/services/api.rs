//! Blocking HTTP client for the site backend, plus the worker thread that
//! keeps network I/O off the UI thread.
//!
//! The event loop never blocks on the network: it sends an [`ApiJob`] to
//! the worker and later drains [`ApiEvent`]s from the channel during its
//! normal tick. Jobs run one at a time, in order.

use std::sync::mpsc::{channel, Sender};
use std::thread;
use std::time::Duration;

use serde_json::json;
use thiserror::Error;

use crate::model::card::FetchTicket;
use crate::model::comment::{Comment, NewComment};
use crate::model::post::{NewPost, Post};
use crate::services::fetch::FetchError;
use crate::services::session::Session;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("not authorized")]
    Unauthorized,
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(401, _) => ApiError::Unauthorized,
            ureq::Error::Status(code, _) => ApiError::Status(code),
            ureq::Error::Transport(t) => ApiError::Transport(t.to_string()),
        }
    }
}

/// Blocking client for the backend endpoints the site uses.
#[derive(Debug, Clone)]
pub struct ApiClient {
    agent: ureq::Agent,
    base: String,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();
        Self {
            agent,
            base: base.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), path)
    }

    /// `GET /posts` - newest first.
    pub fn posts(&self) -> Result<Vec<Post>, ApiError> {
        let resp = self.agent.get(&self.url("/posts")).call()?;
        resp.into_json().map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// `GET /comments` - newest first.
    pub fn comments(&self) -> Result<Vec<Comment>, ApiError> {
        let resp = self.agent.get(&self.url("/comments")).call()?;
        resp.into_json().map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// `POST /comments`.
    pub fn submit_comment(&self, comment: &NewComment) -> Result<(), ApiError> {
        self.agent
            .post(&self.url("/comments"))
            .send_json(comment)?;
        Ok(())
    }

    /// `DELETE /admin/comments/{id}` - requires the session token.
    pub fn delete_comment(&self, id: u64, token: &str) -> Result<(), ApiError> {
        self.agent
            .delete(&self.url(&format!("/admin/comments/{id}")))
            .set("Authorization", token)
            .call()?;
        Ok(())
    }

    /// `POST /login`.
    pub fn login(&self, password: &str) -> Result<Session, ApiError> {
        let resp = self
            .agent
            .post(&self.url("/login"))
            .send_json(json!({ "password": password }))?;
        resp.into_json().map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// `POST /admin/posts` - requires the session token.
    pub fn publish(&self, post: &NewPost, token: &str) -> Result<(), ApiError> {
        self.agent
            .post(&self.url("/admin/posts"))
            .set("Authorization", token)
            .send_json(post)?;
        Ok(())
    }

    /// Plain GET of a markdown document. Non-2xx is a failure.
    pub fn detail(&self, location: &str) -> Result<String, FetchError> {
        match self.agent.get(location).call() {
            Ok(resp) => resp
                .into_string()
                .map_err(|e| FetchError::Transport(e.to_string())),
            Err(ureq::Error::Status(code, _)) => Err(FetchError::Status(code)),
            Err(ureq::Error::Transport(t)) => Err(FetchError::Transport(t.to_string())),
        }
    }
}

/// Work items executed on the worker thread.
#[derive(Debug)]
pub enum ApiJob {
    LoadPosts,
    LoadComments,
    SubmitComment(NewComment),
    DeleteComment { id: u64, token: String },
    Login { password: String },
    Publish { post: NewPost, token: String },
    FetchDetail { ticket: FetchTicket, location: String },
}

/// Completions delivered back to the event loop.
#[derive(Debug)]
pub enum ApiEvent {
    Posts(Result<Vec<Post>, ApiError>),
    Comments(Result<Vec<Comment>, ApiError>),
    CommentSubmitted(Result<(), ApiError>),
    CommentDeleted(Result<(), ApiError>),
    LoggedIn(Result<Session, ApiError>),
    Published(Result<(), ApiError>),
    Detail {
        ticket: FetchTicket,
        result: Result<String, FetchError>,
    },
}

/// Spawn the API worker. The thread exits when either channel end is gone.
pub fn spawn_worker(
    client: ApiClient,
    events: Sender<ApiEvent>,
) -> std::io::Result<Sender<ApiJob>> {
    let (jobs_tx, jobs_rx) = channel::<ApiJob>();
    thread::Builder::new()
        .name("petal-api".to_string())
        .spawn(move || {
            for job in jobs_rx {
                tracing::debug!(?job, "api worker picked up job");
                let event = match job {
                    ApiJob::LoadPosts => ApiEvent::Posts(client.posts()),
                    ApiJob::LoadComments => ApiEvent::Comments(client.comments()),
                    ApiJob::SubmitComment(comment) => {
                        ApiEvent::CommentSubmitted(client.submit_comment(&comment))
                    }
                    ApiJob::DeleteComment { id, token } => {
                        ApiEvent::CommentDeleted(client.delete_comment(id, &token))
                    }
                    ApiJob::Login { password } => ApiEvent::LoggedIn(client.login(&password)),
                    ApiJob::Publish { post, token } => {
                        ApiEvent::Published(client.publish(&post, &token))
                    }
                    ApiJob::FetchDetail { ticket, location } => ApiEvent::Detail {
                        ticket,
                        result: client.detail(&location),
                    },
                };
                if events.send(event).is_err() {
                    break;
                }
            }
        })?;
    Ok(jobs_tx)
}
