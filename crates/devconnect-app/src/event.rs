//! Application input events.
//!
//! This module defines [`AppEvent`], the full set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from three distinct sources:
//! - View intents (conversation open/close, draft edits, logout).
//! - Push events translated from the session's inbound stream.
//! - Resolutions of REST fetches the runtime ran on the state machine's
//!   behalf.

use std::collections::HashMap;

use devconnect_proto::{LiveMessage, Notification, UserId};
use devconnect_proto::rest::HistoryMessage;

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Badge-bearing consumers mounted; the session identity should be
    /// registered and the unread snapshot fetched.
    Started,

    /// Global push for a message addressed to the local user.
    Notification(Notification),

    /// Room-scoped live message for the open conversation.
    LiveMessage(LiveMessage),

    /// Persisted unread-count snapshot resolved.
    UnreadSnapshot(HashMap<UserId, u32>),

    /// Conversation history fetch resolved.
    HistoryLoaded {
        /// Activation stamp the fetch was issued under.
        epoch: u64,
        /// Persisted messages, oldest first.
        messages: Vec<HistoryMessage>,
    },

    /// Conversation history fetch failed. The sequence stays as it is; the
    /// runtime already logged the cause.
    HistoryFailed {
        /// Activation stamp the fetch was issued under.
        epoch: u64,
    },

    /// A chat view mounted for the given peer.
    ConversationOpened {
        /// The other participant.
        peer: UserId,
    },

    /// The open chat view unmounted.
    ConversationClosed,

    /// The draft buffer was edited.
    DraftChanged(String),

    /// The draft was submitted for sending.
    DraftSubmitted,

    /// The local user logged out.
    LoggedOut,
}
