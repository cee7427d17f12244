//! Delivery gateways

use async_trait::async_trait;

use hr_assistant_core::{DeliveryError, DeliveryGateway, DocumentRef, RelayDestination};

use crate::mail::MailRelay;
use crate::object_store::ObjectStoreUploader;
use crate::telegram::TelegramClient;

/// Texts go through Telegram; documents are downloaded from Telegram and
/// relayed by email or to object storage
#[derive(Debug)]
pub struct ChatDeliveryGateway {
    telegram: TelegramClient,
    mail: Option<MailRelay>,
    object_store: Option<ObjectStoreUploader>,
}

impl ChatDeliveryGateway {
    pub fn new(telegram: TelegramClient) -> Self {
        Self {
            telegram,
            mail: None,
            object_store: None,
        }
    }

    pub fn with_mail(mut self, mail: MailRelay) -> Self {
        self.mail = Some(mail);
        self
    }

    pub fn with_object_store(mut self, uploader: ObjectStoreUploader) -> Self {
        self.object_store = Some(uploader);
        self
    }

    /// Fail before downloading when the destination has no client
    fn ensure_configured(&self, destination: &RelayDestination) -> Result<(), DeliveryError> {
        match destination {
            RelayDestination::Email { .. } if self.mail.is_none() => {
                Err(DeliveryError::NotConfigured("mail relay".to_string()))
            }
            RelayDestination::ObjectStore { .. } if self.object_store.is_none() => {
                Err(DeliveryError::NotConfigured("object store".to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl DeliveryGateway for ChatDeliveryGateway {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError> {
        self.telegram.send_message(chat_id, text).await
    }

    async fn relay_document(
        &self,
        document: &DocumentRef,
        destination: &RelayDestination,
    ) -> Result<(), DeliveryError> {
        self.ensure_configured(destination)?;
        let bytes = self.telegram.download(&document.file_id).await?;

        match (destination, &self.mail, &self.object_store) {
            (RelayDestination::Email { to, subject }, Some(mail), _) => {
                mail.send(document, &bytes, to, subject).await
            }
            (RelayDestination::ObjectStore { key }, _, Some(store)) => store.put(key, bytes).await,
            _ => Err(DeliveryError::NotConfigured(format!("{:?}", destination))),
        }
    }
}

/// Logs instead of sending; for running without a bot token
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingGateway;

#[async_trait]
impl DeliveryGateway for LoggingGateway {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError> {
        tracing::info!(chat_id, text, "Reply (not sent)");
        Ok(())
    }

    async fn relay_document(
        &self,
        document: &DocumentRef,
        destination: &RelayDestination,
    ) -> Result<(), DeliveryError> {
        tracing::info!(
            file_id = %document.file_id,
            file_name = %document.file_name,
            destination = ?destination,
            "Relay (not sent)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hr_assistant_config::TelegramConfig;

    fn document() -> DocumentRef {
        DocumentRef {
            file_id: "F1".to_string(),
            file_name: "cv.pdf".to_string(),
            user_id: "7".to_string(),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_destination_fails_without_network() {
        let gateway = ChatDeliveryGateway::new(TelegramClient::new(
            reqwest::Client::new(),
            &TelegramConfig::default(),
        ));

        let email = RelayDestination::Email {
            to: "hr@example.com".to_string(),
            subject: "s".to_string(),
        };
        assert!(matches!(
            gateway.relay_document(&document(), &email).await,
            Err(DeliveryError::NotConfigured(_))
        ));

        let object = RelayDestination::ObjectStore {
            key: "resumes/1/7-cv.pdf".to_string(),
        };
        assert!(matches!(
            gateway.relay_document(&document(), &object).await,
            Err(DeliveryError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn test_logging_gateway_accepts_everything() {
        let gateway = LoggingGateway;
        assert!(gateway.send_text("1", "hi").await.is_ok());
        let destination = RelayDestination::ObjectStore {
            key: "k".to_string(),
        };
        assert!(gateway.relay_document(&document(), &destination).await.is_ok());
    }
}
