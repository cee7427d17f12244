//! HTTP mail relay
//!
//! Posts a JSON message to the configured endpoint with a bearer API key.
//! The resume travels base64-encoded as a single attachment.

use base64::Engine;
use serde::Serialize;

use hr_assistant_config::MailRelayConfig;
use hr_assistant_core::{DeliveryError, DocumentRef};

use crate::{check_status, content_type, transport};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailAttachment {
    pub filename: String,
    pub content_type: String,
    /// Base64 of the file bytes
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
    pub attachments: Vec<MailAttachment>,
}

#[derive(Clone)]
pub struct MailRelay {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    sender: String,
}

impl std::fmt::Debug for MailRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailRelay")
            .field("endpoint", &self.endpoint)
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}

impl MailRelay {
    pub fn new(client: reqwest::Client, config: &MailRelayConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            sender: config.sender.clone(),
        }
    }

    pub fn build_message(
        &self,
        document: &DocumentRef,
        bytes: &[u8],
        to: &str,
        subject: &str,
    ) -> MailMessage {
        MailMessage {
            from: self.sender.clone(),
            to: vec![to.to_string()],
            subject: subject.to_string(),
            text: format!(
                "A resume was uploaded by chat user {}. The file is attached.",
                document.user_id
            ),
            attachments: vec![MailAttachment {
                filename: document.file_name.clone(),
                content_type: content_type(&document.file_name).to_string(),
                content: base64::engine::general_purpose::STANDARD.encode(bytes),
            }],
        }
    }

    pub async fn send(
        &self,
        document: &DocumentRef,
        bytes: &[u8],
        to: &str,
        subject: &str,
    ) -> Result<(), DeliveryError> {
        let message = self.build_message(document, bytes, to, subject);
        let mut request = self.client.post(&self.endpoint).json(&message);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }
        let response = request.send().await.map_err(transport)?;
        check_status("mail", response).await?;
        tracing::info!(to, file = %document.file_name, "Resume mailed");
        Ok(())
    }
}
