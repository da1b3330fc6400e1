//! Service endpoint configuration.

use devconnect_proto::UserId;

/// Where the devConnect service lives.
///
/// One base URL covers both surfaces: REST requests hit paths under
/// `base_url`, and the realtime channel connects to
/// [`socket_url`](Self::socket_url), derived by scheme substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// REST base, e.g. `http://localhost:7777`. No trailing slash.
    pub base_url: String,
    /// Buffer capacity of the inbound event fan-out, per subscriber.
    pub event_buffer: usize,
}

impl Default for ServiceConfig {
    /// Development defaults matching the local backend.
    fn default() -> Self {
        Self { base_url: "http://localhost:7777".to_owned(), event_buffer: 256 }
    }
}

impl ServiceConfig {
    /// Config for the service rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, ..Self::default() }
    }

    /// WebSocket URL for the realtime channel.
    pub fn socket_url(&self) -> String {
        if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            // Already a ws:// or wss:// URL.
            self.base_url.clone()
        }
    }

    /// URL of one conversation's persisted history.
    pub fn chat_history_url(&self, peer: &UserId) -> String {
        format!("{}/chat/{peer}", self.base_url)
    }

    /// URL of the persisted unread-count snapshot.
    pub fn unread_counts_url(&self) -> String {
        format!("{}/chat/unread/all", self.base_url)
    }
}
