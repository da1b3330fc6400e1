//! Protocol contracts for the devConnect chat service.
//!
//! The service exposes two surfaces the client core talks to:
//!
//! - A real-time channel carrying JSON text frames, one event per frame,
//!   enveloped as `{"event": "<name>", "data": {...}}`. [`ClientEvent`] is
//!   the client-to-server vocabulary, [`ServerEvent`] the server-to-client
//!   one.
//! - Two REST endpoints whose response shapes live in [`rest`]: conversation
//!   history and the persisted unread-count snapshot.
//!
//! Decoding is strict. An unknown event name, a missing required field, or a
//! non-JSON frame is a [`WireError`], never a best-effort value. The event
//! names themselves are owned by the service and must match it byte for byte,
//! including its spelling of `messageRecieved`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod event;
mod id;
pub mod rest;

pub use event::{
    ClientEvent, JoinChat, LiveMessage, Notification, RegisterUser, SendMessage, ServerEvent,
    WireError,
};
pub use id::UserId;
