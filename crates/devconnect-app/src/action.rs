//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use devconnect_proto::{SendMessage, UserId};

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Bind the shared session to the local identity (`registerUser`).
    RegisterIdentity {
        /// The local user.
        user_id: UserId,
    },

    /// Enter a conversation room (`joinChat`).
    EmitJoin {
        /// The local user.
        user_id: UserId,
        /// The other participant.
        target_user_id: UserId,
    },

    /// Emit an outgoing chat message (`sendMessage`).
    EmitSend(SendMessage),

    /// Fetch one conversation's persisted history.
    FetchHistory {
        /// The other participant.
        peer: UserId,
        /// Activation stamp; resolutions carrying a stale stamp are ignored.
        epoch: u64,
    },

    /// Fetch the persisted unread-count snapshot.
    FetchUnreadCounts,

    /// Drop the shared session so the next acquisition builds a fresh one.
    TeardownSession,
}
