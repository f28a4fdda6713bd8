//! WebSocket protocol messages.
//!
//! Every message is a JSON object tagged by its `type` field.

use serde::{Deserialize, Serialize};

use crate::domain::{ConnectionId, Role, RoomCode};

/// Messages sent by clients during the handshake phases.
///
/// Relay-phase messages are forwarded verbatim and never decoded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Init { room: String },
    Ready { token: String },
}

impl ClientMessage {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Messages sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Success { message: String, token: String },
    Error { message: String },
    Role { role: Role },
    Start,
}

impl ServerMessage {
    pub fn created(code: &RoomCode, token: &ConnectionId) -> Self {
        Self::Success {
            message: format!("Created room {}", code),
            token: token.to_string(),
        }
    }

    pub fn joined(code: &RoomCode, token: &ConnectionId) -> Self {
        Self::Success {
            message: format!("Joined room {}", code),
            token: token.to_string(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize server message {:?}: {}", self, e);
            String::new()
        })
    }
}
