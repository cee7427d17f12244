//! Outbound delivery for the HR assistant
//!
//! - **Telegram** (`telegram`): Bot API `sendMessage`, `getFile` and file download
//! - **Mail** (`mail`): HTTP mail relay with the resume as an attachment
//! - **Object store** (`object_store`): HTTP `PUT` of the resume bytes
//! - **Gateway** (`gateway`): composes the clients behind `DeliveryGateway`

pub mod gateway;
pub mod mail;
pub mod object_store;
pub mod telegram;

use std::sync::Arc;

use hr_assistant_config::Settings;
use hr_assistant_core::{DeliveryError, DeliveryGateway};

pub use gateway::{ChatDeliveryGateway, LoggingGateway};
pub use mail::{MailAttachment, MailMessage, MailRelay};
pub use object_store::ObjectStoreUploader;
pub use telegram::{TelegramClient, TelegramFile};

const USER_AGENT: &str = concat!("hr-assistant/", env!("CARGO_PKG_VERSION"));

/// Build the gateway selected by settings
///
/// With `telegram.enabled = false` replies and relays are only logged.
pub fn build_gateway(settings: &Settings) -> Result<Arc<dyn DeliveryGateway>, DeliveryError> {
    if !settings.telegram.enabled {
        tracing::warn!("Telegram disabled, outbound messages will only be logged");
        return Ok(Arc::new(LoggingGateway));
    }

    let client = http_client()?;
    let telegram = TelegramClient::new(client.clone(), &settings.telegram);
    let mut gateway = ChatDeliveryGateway::new(telegram);
    if !settings.relay.mail.endpoint.trim().is_empty() {
        gateway = gateway.with_mail(MailRelay::new(client.clone(), &settings.relay.mail));
    }
    if !settings.relay.object_store.base_url.trim().is_empty() {
        gateway = gateway.with_object_store(ObjectStoreUploader::new(
            client,
            &settings.relay.object_store,
        ));
    }
    Ok(Arc::new(gateway))
}

/// Shared HTTP client
pub fn http_client() -> Result<reqwest::Client, DeliveryError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(transport)
}

/// Map a transport failure
pub(crate) fn transport(err: reqwest::Error) -> DeliveryError {
    DeliveryError::Http(err.to_string())
}

/// Turn a non-2xx response into `DeliveryError::Rejected`
pub(crate) async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, DeliveryError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(DeliveryError::Rejected {
        service,
        status,
        body,
    })
}

/// MIME type for a document name
pub(crate) fn content_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}
