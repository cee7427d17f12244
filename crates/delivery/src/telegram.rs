//! Telegram Bot API client
//!
//! Endpoints: `<api_base>/bot<token>/<method>` for calls and
//! `<api_base>/file/bot<token>/<file_path>` for downloads.

use serde::{Deserialize, Serialize};

use hr_assistant_config::TelegramConfig;
use hr_assistant_core::DeliveryError;

use crate::{check_status, transport};

const SERVICE: &str = "telegram";

/// Bot API response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

/// `getFile` result
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelegramFile {
    pub file_id: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    /// Download path, absent when the file is no longer available
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GetFile<'a> {
    file_id: &'a str,
}

#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    pub fn new(client: reqwest::Client, config: &TelegramConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.bot_token.clone(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.api_base,
            self.token,
            file_path.trim_start_matches('/')
        )
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, DeliveryError>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        let response = check_status(SERVICE, response).await?;
        let status = response.status().as_u16();
        let envelope: ApiResponse<T> = response.json().await.map_err(transport)?;
        unwrap_envelope(envelope, status)
    }

    /// Plain-text `sendMessage`
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError> {
        let _: serde_json::Value = self.call("sendMessage", &SendMessage { chat_id, text }).await?;
        Ok(())
    }

    pub async fn get_file(&self, file_id: &str) -> Result<TelegramFile, DeliveryError> {
        self.call("getFile", &GetFile { file_id }).await
    }

    /// Fetch the bytes of an uploaded file
    pub async fn download(&self, file_id: &str) -> Result<Vec<u8>, DeliveryError> {
        let file = self.get_file(file_id).await?;
        let path = file.file_path.ok_or_else(|| DeliveryError::Rejected {
            service: SERVICE,
            status: 404,
            body: format!("file {} has no download path", file_id),
        })?;
        let response = self
            .client
            .get(self.file_url(&path))
            .send()
            .await
            .map_err(transport)?;
        let response = check_status(SERVICE, response).await?;
        let bytes = response.bytes().await.map_err(transport)?;
        tracing::debug!(file_id, size = bytes.len(), "Downloaded Telegram file");
        Ok(bytes.to_vec())
    }
}

fn unwrap_envelope<T>(envelope: ApiResponse<T>, status: u16) -> Result<T, DeliveryError> {
    match envelope {
        ApiResponse {
            ok: true,
            result: Some(result),
            ..
        } => Ok(result),
        ApiResponse { description, .. } => Err(DeliveryError::Rejected {
            service: SERVICE,
            status,
            body: description.unwrap_or_else(|| "request not ok".to_string()),
        }),
    }
}
