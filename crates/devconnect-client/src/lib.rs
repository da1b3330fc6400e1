//! Client layer for the devConnect chat service.
//!
//! This crate owns everything that touches the network:
//!
//! - [`Session`]: handle to one live realtime connection. An internal I/O
//!   task bridges the WebSocket to channels; inbound frames are decoded at
//!   the boundary and fanned out to every subscriber.
//! - [`SessionManager`]: guarantees the process shares a single session.
//!   Repeated acquisition returns the identical handle; only logout tears it
//!   down.
//! - [`ChatApi`] / [`HttpChatApi`]: the REST collaborators (conversation
//!   history, persisted unread counts) behind a trait seam so state machines
//!   stay testable without a backend.
//!
//! Application state (unread counts, conversation sequences) lives in
//! `devconnect-app`; nothing here knows its shape. Consumers observe inbound
//! traffic through [`Session::subscribe`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod api;
mod config;
mod error;
mod manager;
mod session;

pub use api::{ChatApi, HttpChatApi};
pub use config::ServiceConfig;
pub use error::ClientError;
pub use manager::SessionManager;
pub use session::{Session, SessionStatus};
