//! Inbound events and outbound actions
//!
//! The inbound adapter turns platform payloads into `InboundEvent` before the
//! dialogue controller sees them.

use serde::{Deserialize, Serialize};

/// Platform user identifier
pub type UserId = String;
/// Platform chat identifier
pub type ChatId = String;

/// Normalized inbound event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    TextMessage {
        user_id: UserId,
        chat_id: ChatId,
        text: String,
    },
    DocumentUpload {
        user_id: UserId,
        chat_id: ChatId,
        file_id: String,
        file_name: String,
    },
}

impl InboundEvent {
    pub fn user_id(&self) -> &str {
        match self {
            Self::TextMessage { user_id, .. } | Self::DocumentUpload { user_id, .. } => user_id,
        }
    }

    pub fn chat_id(&self) -> &str {
        match self {
            Self::TextMessage { chat_id, .. } | Self::DocumentUpload { chat_id, .. } => chat_id,
        }
    }

    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TextMessage { .. } => "text",
            Self::DocumentUpload { .. } => "document",
        }
    }
}

/// Reference to a document held by the messaging platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub file_id: String,
    pub file_name: String,
    /// Uploader, used to build storage keys
    pub user_id: UserId,
}

impl DocumentRef {
    /// Lowercased extension without the dot, if the name has one
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// Action emitted by the dialogue controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundAction {
    SendText { chat_id: ChatId, text: String },
}

impl OutboundAction {
    pub fn send_text(chat_id: impl Into<ChatId>, text: impl Into<String>) -> Self {
        Self::SendText {
            chat_id: chat_id.into(),
            text: text.into(),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::SendText { text, .. } => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str) -> DocumentRef {
        DocumentRef {
            file_id: "f1".to_string(),
            file_name: name.to_string(),
            user_id: "u1".to_string(),
        }
    }

    #[test]
    fn test_extension() {
        assert_eq!(doc("resume.pdf").extension().as_deref(), Some("pdf"));
        assert_eq!(doc("Resume.PDF").extension().as_deref(), Some("pdf"));
        assert_eq!(doc("cv.final.docx").extension().as_deref(), Some("docx"));
        assert_eq!(doc("resume").extension(), None);
        assert_eq!(doc(".pdf").extension(), None);
        assert_eq!(doc("").extension(), None);
    }

    #[test]
    fn test_event_accessors() {
        let event = InboundEvent::DocumentUpload {
            user_id: "u1".to_string(),
            chat_id: "c1".to_string(),
            file_id: "f".to_string(),
            file_name: "a.pdf".to_string(),
        };
        assert_eq!(event.user_id(), "u1");
        assert_eq!(event.chat_id(), "c1");
        assert_eq!(event.kind(), "document");
    }
}
