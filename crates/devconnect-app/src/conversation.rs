//! Conversation view model.
//!
//! This module defines the [`Conversation`] state machine for one open chat
//! view: the ordered message sequence, the draft buffer, and the
//! join/close lifecycle tied to view mount and unmount.
//!
//! The machine is pure. Joining returns the actions that fetch history and
//! enter the room; the runtime executes them and feeds resolutions back in.
//!
//! # Ordering
//!
//! The sequence is append-only and arrival order is display order. History
//! and live messages funnel into the same sequence: when the history fetch
//! resolves after live messages already arrived, the seeded messages are
//! placed ahead of them.

use std::collections::VecDeque;

use devconnect_proto::rest::HistoryMessage;
use devconnect_proto::{LiveMessage, SendMessage, UserId};

use crate::AppAction;

/// Own-echo suppression window.
///
/// Each optimistic append is remembered until the backend echoes it back;
/// a backend that never echoes would otherwise grow the queue without bound.
const PENDING_ECHO_LIMIT: usize = 32;

/// The local user's send surface: everything an outgoing message carries
/// about its sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Account id.
    pub id: UserId,
    /// Given name shown next to sent messages.
    pub first_name: String,
    /// Avatar URL shown next to sent messages.
    pub photo_url: String,
}

/// Peer display metadata, resolved from conversation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerProfile {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Avatar URL.
    pub photo_url: String,
}

/// One displayed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Sender display name.
    pub sender_name: String,
    /// Sender avatar URL.
    pub photo_url: String,
    /// Message body.
    pub text: String,
}

/// Lifecycle of a conversation view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationPhase {
    /// Created, room not entered yet.
    Unjoined,
    /// Room entered; messages flow.
    Joined,
    /// View unmounted; the machine ignores further input.
    Closed,
}

/// State machine for one open conversation.
#[derive(Debug, Clone)]
pub struct Conversation {
    /// The local participant.
    local: Participant,
    /// The other participant.
    peer_id: UserId,
    /// Peer display metadata. `None` until resolved from history.
    peer: Option<PeerProfile>,
    /// Lifecycle phase.
    phase: ConversationPhase,
    /// Displayed messages, arrival order.
    messages: Vec<Message>,
    /// Draft buffer.
    draft: String,
    /// History has been seeded; later resolutions are ignored.
    seeded: bool,
    /// Optimistic appends awaiting their backend echo.
    pending_echo: VecDeque<Message>,
}

impl Conversation {
    /// Create an unjoined conversation with `peer_id`.
    pub fn new(local: Participant, peer_id: UserId) -> Self {
        Self {
            local,
            peer_id,
            peer: None,
            phase: ConversationPhase::Unjoined,
            messages: Vec::new(),
            draft: String::new(),
            seeded: false,
            pending_echo: VecDeque::new(),
        }
    }

    /// Enter the room: request history and emit the join signal.
    ///
    /// `epoch` stamps the history fetch so a resolution arriving after this
    /// conversation is gone can be discarded. Only the first call moves the
    /// machine; later calls are inert.
    pub fn join(&mut self, epoch: u64) -> Vec<AppAction> {
        if self.phase != ConversationPhase::Unjoined {
            return vec![];
        }
        self.phase = ConversationPhase::Joined;
        vec![
            AppAction::FetchHistory { peer: self.peer_id.clone(), epoch },
            AppAction::EmitJoin {
                user_id: self.local.id.clone(),
                target_user_id: self.peer_id.clone(),
            },
        ]
    }

    /// Seed the sequence from persisted history.
    ///
    /// Live messages that arrived before the fetch resolved stay in the
    /// sequence, placed after the seeded history. Seeding happens at most
    /// once; the peer profile is resolved from the first message that did
    /// not originate from the local user.
    pub fn seed_history(&mut self, history: Vec<HistoryMessage>) {
        if self.phase != ConversationPhase::Joined || self.seeded {
            return;
        }
        self.seeded = true;

        if self.peer.is_none() {
            self.peer = history
                .iter()
                .find(|message| message.sender_id.id != self.local.id)
                .map(|message| PeerProfile {
                    first_name: message.sender_id.first_name.clone(),
                    last_name: message.sender_id.last_name.clone(),
                    photo_url: message.sender_id.photo_url.clone(),
                });
        }

        let seeded = history
            .into_iter()
            .map(|message| Message {
                sender_name: message.sender_id.first_name,
                photo_url: message.sender_id.photo_url,
                text: message.text,
            })
            .collect();
        let live = std::mem::replace(&mut self.messages, seeded);
        self.messages.extend(live);
    }

    /// Append a live room message in arrival order.
    ///
    /// A live event exactly matching an optimistic append is its backend
    /// echo: the pending entry is retired instead of appending a duplicate.
    /// Everything else appends, with no deduplication against history.
    pub fn append_live(&mut self, live: LiveMessage) {
        if self.phase != ConversationPhase::Joined {
            return;
        }
        let message = Message {
            sender_name: live.first_name,
            photo_url: live.photo_url,
            text: live.text,
        };
        if let Some(echoed) = self.pending_echo.iter().position(|pending| *pending == message) {
            self.pending_echo.remove(echoed);
            return;
        }
        self.messages.push(message);
    }

    /// Replace the draft buffer.
    pub fn set_draft(&mut self, text: String) {
        if self.phase == ConversationPhase::Closed {
            return;
        }
        self.draft = text;
    }

    /// Submit the draft.
    ///
    /// A draft that is empty after trimming makes this a no-op: nothing is
    /// emitted and the draft is retained. Otherwise the message is appended
    /// locally, the draft is cleared, and the send signal is returned with
    /// the text as typed.
    pub fn send(&mut self) -> Vec<AppAction> {
        if self.phase != ConversationPhase::Joined || self.draft.trim().is_empty() {
            return vec![];
        }
        let text = std::mem::take(&mut self.draft);

        let message = Message {
            sender_name: self.local.first_name.clone(),
            photo_url: self.local.photo_url.clone(),
            text: text.clone(),
        };
        self.messages.push(message.clone());
        self.pending_echo.push_back(message);
        if self.pending_echo.len() > PENDING_ECHO_LIMIT {
            self.pending_echo.pop_front();
        }

        vec![AppAction::EmitSend(SendMessage {
            first_name: self.local.first_name.clone(),
            photo_url: self.local.photo_url.clone(),
            user_id: self.local.id.clone(),
            target_user_id: self.peer_id.clone(),
            text,
        })]
    }

    /// Detach the view. The machine ignores all input afterwards.
    pub fn close(&mut self) {
        self.phase = ConversationPhase::Closed;
    }

    /// The other participant's id.
    pub fn peer_id(&self) -> &UserId {
        &self.peer_id
    }

    /// Peer display metadata. `None` until history resolves it.
    pub fn peer(&self) -> Option<&PeerProfile> {
        self.peer.as_ref()
    }

    /// Displayed messages, arrival order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Current draft buffer.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> ConversationPhase {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use devconnect_proto::rest::SenderRef;

    use super::*;

    fn local() -> Participant {
        Participant {
            id: UserId::from("u1"),
            first_name: "Ada".into(),
            photo_url: "https://cdn.example/ada.png".into(),
        }
    }

    fn joined() -> Conversation {
        let mut conversation = Conversation::new(local(), UserId::from("u2"));
        let _ = conversation.join(1);
        conversation
    }

    fn history_from(id: &str, first_name: &str, text: &str) -> HistoryMessage {
        HistoryMessage {
            sender_id: SenderRef {
                id: UserId::from(id),
                first_name: first_name.into(),
                last_name: "Chen".into(),
                photo_url: "p".into(),
            },
            text: text.into(),
        }
    }

    fn live(first_name: &str, text: &str) -> LiveMessage {
        LiveMessage { first_name: first_name.into(), photo_url: "p".into(), text: text.into() }
    }

    #[test]
    fn join_requests_history_and_enters_the_room() {
        let mut conversation = Conversation::new(local(), UserId::from("u2"));
        let actions = conversation.join(7);

        assert!(matches!(
            actions.as_slice(),
            [
                AppAction::FetchHistory { peer, epoch: 7 },
                AppAction::EmitJoin { user_id, target_user_id },
            ] if peer.as_str() == "u2"
                && user_id.as_str() == "u1"
                && target_user_id.as_str() == "u2"
        ));
        assert_eq!(conversation.phase(), ConversationPhase::Joined);
    }

    #[test]
    fn join_is_single_shot() {
        let mut conversation = joined();
        assert!(conversation.join(2).is_empty());
    }

    #[test]
    fn live_messages_append_in_arrival_order() {
        let mut conversation = joined();
        conversation.seed_history(vec![]);

        for i in 0..5 {
            conversation.append_live(live("Bo", &format!("m{i}")));
        }

        let texts: Vec<&str> =
            conversation.messages().iter().map(|message| message.text.as_str()).collect();
        assert_eq!(texts, ["m0", "m1", "m2", "m3", "m4"]);
    }

    #[test]
    fn history_seeds_ahead_of_early_live_messages() {
        let mut conversation = joined();

        // Live wins the race against the fetch.
        conversation.append_live(live("Bo", "hi"));
        conversation.seed_history(vec![history_from("u2", "Bo", "earlier")]);

        let texts: Vec<&str> =
            conversation.messages().iter().map(|message| message.text.as_str()).collect();
        assert_eq!(texts, ["earlier", "hi"]);
    }

    #[test]
    fn history_seeds_at_most_once() {
        let mut conversation = joined();
        conversation.seed_history(vec![history_from("u2", "Bo", "first")]);
        conversation.seed_history(vec![history_from("u2", "Bo", "second")]);

        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].text, "first");
    }

    #[test]
    fn peer_resolves_from_first_non_local_history_message() {
        let mut conversation = joined();
        conversation.seed_history(vec![
            history_from("u1", "Ada", "mine"),
            history_from("u2", "Bo", "theirs"),
        ]);

        let peer = conversation.peer().expect("resolved peer");
        assert_eq!(peer.first_name, "Bo");
        assert_eq!(peer.last_name, "Chen");
    }

    #[test]
    fn peer_stays_unresolved_without_peer_history() {
        let mut conversation = joined();
        conversation.seed_history(vec![history_from("u1", "Ada", "mine")]);

        assert!(conversation.peer().is_none());
    }

    #[test]
    fn whitespace_draft_makes_send_a_no_op() {
        let mut conversation = joined();
        conversation.set_draft("   ".into());

        assert!(conversation.send().is_empty());
        assert_eq!(conversation.draft(), "   ");
        assert!(conversation.messages().is_empty());
    }

    #[test]
    fn send_appends_optimistically_and_clears_the_draft() {
        let mut conversation = joined();
        conversation.set_draft("hello".into());

        let actions = conversation.send();

        assert!(matches!(
            actions.as_slice(),
            [AppAction::EmitSend(message)]
                if message.text == "hello"
                    && message.user_id.as_str() == "u1"
                    && message.target_user_id.as_str() == "u2"
                    && message.first_name == "Ada"
        ));
        assert_eq!(conversation.draft(), "");
        assert_eq!(conversation.messages().len(), 1);
        assert_eq!(conversation.messages()[0].sender_name, "Ada");
    }

    #[test]
    fn backend_echo_of_a_sent_message_appends_nothing() {
        let mut conversation = joined();
        conversation.set_draft("hi".into());
        let _ = conversation.send();

        let echo = LiveMessage {
            first_name: "Ada".into(),
            photo_url: "https://cdn.example/ada.png".into(),
            text: "hi".into(),
        };
        conversation.append_live(echo.clone());
        assert_eq!(conversation.messages().len(), 1);

        // The same payload again is a genuinely new message.
        conversation.append_live(echo);
        assert_eq!(conversation.messages().len(), 2);
    }

    #[test]
    fn unrelated_live_messages_are_never_suppressed() {
        let mut conversation = joined();
        conversation.set_draft("hi".into());
        let _ = conversation.send();

        conversation.append_live(live("Bo", "yo"));

        assert_eq!(conversation.messages().len(), 2);
        assert_eq!(conversation.messages()[1].text, "yo");
    }

    #[test]
    fn send_before_join_is_inert() {
        let mut conversation = Conversation::new(local(), UserId::from("u2"));
        conversation.set_draft("hello".into());

        assert!(conversation.send().is_empty());
        assert_eq!(conversation.draft(), "hello");
    }

    #[test]
    fn closed_conversation_ignores_input() {
        let mut conversation = joined();
        conversation.close();

        conversation.append_live(live("Bo", "hi"));
        conversation.seed_history(vec![history_from("u2", "Bo", "earlier")]);
        conversation.set_draft("text".into());
        let actions = conversation.send();

        assert!(actions.is_empty());
        assert!(conversation.messages().is_empty());
        assert_eq!(conversation.draft(), "");
        assert_eq!(conversation.phase(), ConversationPhase::Closed);
    }
}
