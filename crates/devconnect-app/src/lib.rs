//! Application layer for devConnect
//!
//! Pure state machines and the runtime composition root for the chat core,
//! keeping unread-badge accounting and conversation reconciliation fully
//! testable without a backend.
//!
//! # Components
//!
//! - [`App`]: application state machine (notification routing, conversation
//!   lifecycle, logout)
//! - [`Conversation`]: per-view message sequence and draft state machine
//! - [`NotificationStore`]: process-wide unread counts
//! - [`Runtime`]: event loop wiring the state machines to the session and
//!   the REST collaborator

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod conversation;
mod event;
mod notifications;
mod runtime;

pub use action::AppAction;
pub use app::App;
pub use conversation::{Conversation, ConversationPhase, Message, Participant, PeerProfile};
pub use event::AppEvent;
pub use notifications::NotificationStore;
pub use runtime::Runtime;
