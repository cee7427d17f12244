//! Telegram update adapter
//!
//! Normalizes a Bot API `Update` into an `InboundEvent`. Documents win over
//! text when a message carries both (a captioned upload).

use serde::Deserialize;

use hr_assistant_core::{AdapterError, InboundEvent};

#[derive(Debug, Deserialize)]
struct Update {
    #[serde(default)]
    update_id: Option<i64>,
    #[serde(default)]
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Option<Chat>,
    #[serde(default)]
    from: Option<User>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    document: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct User {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct Document {
    file_id: String,
    #[serde(default)]
    file_name: Option<String>,
}

/// Parse a webhook body into an event for the dialogue controller
pub fn parse_update(body: &[u8]) -> Result<InboundEvent, AdapterError> {
    let update: Update = serde_json::from_slice(body)
        .map_err(|e| AdapterError::MalformedEvent(format!("invalid update JSON: {}", e)))?;

    let Some(message) = update.message else {
        return Err(AdapterError::Unsupported(format!(
            "update {} carries no message",
            update.update_id.unwrap_or_default()
        )));
    };
    let chat = message
        .chat
        .ok_or_else(|| AdapterError::MalformedEvent("message without chat".to_string()))?;
    let chat_id = chat.id.to_string();
    let user_id = message
        .from
        .map(|user| user.id.to_string())
        .unwrap_or_else(|| chat_id.clone());

    if let Some(document) = message.document {
        return Ok(InboundEvent::DocumentUpload {
            user_id,
            chat_id,
            file_id: document.file_id,
            file_name: document.file_name.unwrap_or_default(),
        });
    }
    match message.text {
        Some(text) => Ok(InboundEvent::TextMessage {
            user_id,
            chat_id,
            text,
        }),
        None => Err(AdapterError::MalformedEvent(
            "message has neither text nor document".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message() {
        let body = br#"{"update_id":1,"message":{"message_id":5,"from":{"id":77,"is_bot":false},
            "chat":{"id":-100,"type":"group"},"text":"job openings"}}"#;
        assert_eq!(
            parse_update(body).unwrap(),
            InboundEvent::TextMessage {
                user_id: "77".to_string(),
                chat_id: "-100".to_string(),
                text: "job openings".to_string(),
            }
        );
    }

    #[test]
    fn test_document_upload_without_sender() {
        let body = br#"{"update_id":2,"message":{"chat":{"id":42},
            "document":{"file_id":"BQAC","file_name":"cv.pdf","mime_type":"application/pdf"},
            "caption":"my resume"}}"#;
        assert_eq!(
            parse_update(body).unwrap(),
            InboundEvent::DocumentUpload {
                user_id: "42".to_string(),
                chat_id: "42".to_string(),
                file_id: "BQAC".to_string(),
                file_name: "cv.pdf".to_string(),
            }
        );
    }

    #[test]
    fn test_document_without_name() {
        let body = br#"{"message":{"chat":{"id":1},"document":{"file_id":"X"}}}"#;
        match parse_update(body).unwrap() {
            InboundEvent::DocumentUpload { file_name, .. } => assert_eq!(file_name, ""),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_malformed_payloads() {
        for body in [
            &b"not json"[..],
            br#"{"message":{"text":"hi"}}"#,
            br#"{"message":{"chat":{"id":1},"sticker":{}}}"#,
        ] {
            assert!(matches!(
                parse_update(body),
                Err(AdapterError::MalformedEvent(_))
            ));
        }
    }

    #[test]
    fn test_non_message_update_is_unsupported() {
        let body = br#"{"update_id":9,"edited_message":{"chat":{"id":1},"text":"x"}}"#;
        assert!(matches!(parse_update(body), Err(AdapterError::Unsupported(_))));
    }
}
