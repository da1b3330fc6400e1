//! Real-time channel events.
//!
//! Every frame on the channel is one JSON object of the shape
//! `{"event": "<name>", "data": {...}}`. The `event` names and the camelCase
//! field names inside `data` are the service's contract and are reproduced
//! here exactly, via serde renames, rather than normalized.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::UserId;

/// Wire codec errors.
#[derive(Debug, Error)]
pub enum WireError {
    /// Event could not be serialized to a frame.
    #[error("event encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Frame is not a known, well-formed event.
    #[error("event decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Client-to-server events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Bind this connection to the local account identity.
    #[serde(rename = "registerUser")]
    RegisterUser(RegisterUser),

    /// Enter the one-to-one room for a participant pair.
    #[serde(rename = "joinChat")]
    JoinChat(JoinChat),

    /// Publish a chat message to the participant pair's room.
    #[serde(rename = "sendMessage")]
    SendMessage(SendMessage),
}

impl ClientEvent {
    /// Encode as a single text frame.
    pub fn encode(&self) -> Result<String, WireError> {
        serde_json::to_string(self).map_err(WireError::Encode)
    }

    /// Decode a text frame.
    pub fn decode(frame: &str) -> Result<Self, WireError> {
        serde_json::from_str(frame).map_err(WireError::Decode)
    }
}

/// Server-to-client events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Live message delivered to the joined conversation room.
    ///
    /// The event name misspells "received"; that spelling is the service's
    /// wire identifier and changing it breaks decoding.
    #[serde(rename = "messageRecieved")]
    MessageReceived(LiveMessage),

    /// Global unread push, delivered regardless of which room is open.
    #[serde(rename = "messageNotification")]
    MessageNotification(Notification),
}

impl ServerEvent {
    /// Encode as a single text frame.
    pub fn encode(&self) -> Result<String, WireError> {
        serde_json::to_string(self).map_err(WireError::Encode)
    }

    /// Decode a text frame.
    ///
    /// Fails on unknown event names, missing required fields, and non-JSON
    /// input. Callers at the transport boundary drop failing frames.
    pub fn decode(frame: &str) -> Result<Self, WireError> {
        serde_json::from_str(frame).map_err(WireError::Decode)
    }
}

/// `registerUser` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    /// Local account id to bind the connection to.
    pub user_id: UserId,
}

/// `joinChat` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinChat {
    /// Local participant.
    pub user_id: UserId,
    /// Peer participant.
    pub target_user_id: UserId,
}

/// `sendMessage` payload.
///
/// Carries the sender's display fields alongside the routing ids so
/// recipients can render the message without a profile lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    /// Sender's given name.
    pub first_name: String,
    /// Sender's avatar URL.
    pub photo_url: String,
    /// Sending participant.
    pub user_id: UserId,
    /// Receiving participant.
    pub target_user_id: UserId,
    /// Message body.
    pub text: String,
}

/// `messageRecieved` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMessage {
    /// Sender's given name.
    pub first_name: String,
    /// Sender's avatar URL.
    pub photo_url: String,
    /// Message body.
    pub text: String,
}

/// `messageNotification` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Account the message originated from.
    pub sender_id: UserId,
    /// Originator's display name.
    pub sender_name: String,
    /// Message body.
    pub text: String,
}
