//! REST response contracts.
//!
//! Only the two chat endpoints the core consumes are modeled:
//!
//! - `GET {base}/chat/{peerId}` → [`ChatHistory`]
//! - `GET {base}/chat/unread/all` → [`UnreadCounts`]

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::UserId;

/// Sender reference embedded in persisted history messages.
///
/// The backend populates the sender document inline, keyed `_id` like the
/// rest of its documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderRef {
    /// Account id.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Avatar URL. Absent for accounts that never uploaded a photo.
    #[serde(default)]
    pub photo_url: String,
}

/// One message from the persisted conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryMessage {
    /// Sender the message originated from.
    pub sender_id: SenderRef,
    /// Message body.
    pub text: String,
}

/// Response body of `GET {base}/chat/{peerId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistory {
    /// Messages in persisted order, oldest first.
    pub messages: Vec<HistoryMessage>,
}

/// Response body of `GET {base}/chat/unread/all`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCounts {
    /// Unread tallies keyed by peer id. Peers with nothing unread are absent.
    pub unread_counts: HashMap<UserId, u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_history_response() {
        let body = r#"{
            "messages": [
                {
                    "senderId": {
                        "_id": "665f1c2e9b1d4a0012a34567",
                        "firstName": "Bo",
                        "lastName": "Chen",
                        "photoUrl": "https://cdn.example/bo.png"
                    },
                    "text": "hey there"
                }
            ]
        }"#;

        let history: ChatHistory = serde_json::from_str(body).unwrap();
        assert_eq!(history.messages.len(), 1);
        assert_eq!(history.messages[0].sender_id.id.as_str(), "665f1c2e9b1d4a0012a34567");
        assert_eq!(history.messages[0].sender_id.first_name, "Bo");
        assert_eq!(history.messages[0].text, "hey there");
    }

    #[test]
    fn missing_photo_url_defaults_empty() {
        let body = r#"{
            "messages": [
                {
                    "senderId": {"_id": "u2", "firstName": "Bo", "lastName": "Chen"},
                    "text": "hi"
                }
            ]
        }"#;

        let history: ChatHistory = serde_json::from_str(body).unwrap();
        assert_eq!(history.messages[0].sender_id.photo_url, "");
    }

    #[test]
    fn parses_unread_counts() {
        let body = r#"{"unreadCounts": {"u2": 3, "u7": 1}}"#;

        let counts: UnreadCounts = serde_json::from_str(body).unwrap();
        assert_eq!(counts.unread_counts.get(&UserId::from("u2")), Some(&3));
        assert_eq!(counts.unread_counts.get(&UserId::from("u7")), Some(&1));
        assert_eq!(counts.unread_counts.get(&UserId::from("u1")), None);
    }

    #[test]
    fn empty_unread_counts_is_empty_map() {
        let body = r#"{"unreadCounts": {}}"#;

        let counts: UnreadCounts = serde_json::from_str(body).unwrap();
        assert!(counts.unread_counts.is_empty());
    }
}
