//! REST collaborators.
//!
//! [`ChatApi`] is the seam between the state machines and HTTP, so the
//! application layer is testable without a backend. [`HttpChatApi`] is the
//! production implementation.

use std::future::Future;

use devconnect_proto::UserId;
use devconnect_proto::rest::{ChatHistory, UnreadCounts};

use crate::{ClientError, ServiceConfig};

/// Chat REST endpoints the core consumes.
///
/// Failures are typed here; the policy of swallowing them ("no data" rather
/// than an error surface) belongs to the caller.
pub trait ChatApi {
    /// Fetch one conversation's persisted history, oldest first.
    fn chat_history(
        &self,
        peer: &UserId,
    ) -> impl Future<Output = Result<ChatHistory, ClientError>> + Send;

    /// Fetch the persisted unread-count snapshot.
    fn unread_counts(&self) -> impl Future<Output = Result<UnreadCounts, ClientError>> + Send;
}

/// reqwest-backed [`ChatApi`].
#[derive(Debug, Clone)]
pub struct HttpChatApi {
    http: reqwest::Client,
    config: ServiceConfig,
}

impl HttpChatApi {
    /// API client for the service described by `config`.
    pub fn new(config: ServiceConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }
}

impl ChatApi for HttpChatApi {
    async fn chat_history(&self, peer: &UserId) -> Result<ChatHistory, ClientError> {
        let url = self.config.chat_history_url(peer);
        let history = self.http.get(&url).send().await?.error_for_status()?.json().await?;
        Ok(history)
    }

    async fn unread_counts(&self) -> Result<UnreadCounts, ClientError> {
        let url = self.config.unread_counts_url();
        let counts = self.http.get(&url).send().await?.error_for_status()?.json().await?;
        Ok(counts)
    }
}
