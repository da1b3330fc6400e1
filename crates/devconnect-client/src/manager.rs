//! Shared-session ownership.
//!
//! One socket serves every view. [`SessionManager`] owns that guarantee as
//! an explicit object rather than module-level state: the composition root
//! constructs exactly one manager and hands out references; repeated
//! acquisition returns the same `Arc<Session>` until logout discards it.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{ClientError, ServiceConfig, Session};

/// Owns the process-wide realtime session.
#[derive(Debug)]
pub struct SessionManager {
    config: ServiceConfig,
    current: Mutex<Option<Arc<Session>>>,
}

impl SessionManager {
    /// Manager for the service described by `config`.
    pub fn new(config: ServiceConfig) -> Self {
        Self { config, current: Mutex::new(None) }
    }

    /// The shared session, connecting on first use.
    ///
    /// Subsequent calls return the identical handle. A session that lost its
    /// connection is still returned; only [`logout`](Self::logout) discards
    /// it, so navigating between views can never drop the process-wide
    /// subscription.
    pub async fn connection(&self) -> Result<Arc<Session>, ClientError> {
        let mut current = self.current.lock().await;
        if let Some(session) = current.as_ref() {
            return Ok(Arc::clone(session));
        }

        let session = Arc::new(Session::connect(&self.config).await?);
        *current = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Whether a session exists right now (connected or not).
    pub async fn is_active(&self) -> bool {
        self.current.lock().await.is_some()
    }

    /// Discard the session on logout.
    ///
    /// The connection closes and the next [`connection`](Self::connection)
    /// call builds a fresh one.
    pub async fn logout(&self) {
        if let Some(session) = self.current.lock().await.take() {
            session.shutdown();
            tracing::info!("session discarded on logout");
        }
    }

    /// Service configuration this manager connects with.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
