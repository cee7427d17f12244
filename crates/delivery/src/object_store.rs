//! Object storage upload over HTTP `PUT`

use hr_assistant_config::ObjectStoreConfig;
use hr_assistant_core::DeliveryError;

use crate::{check_status, content_type, transport};

#[derive(Clone)]
pub struct ObjectStoreUploader {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    auth_token: Option<String>,
}

impl std::fmt::Debug for ObjectStoreUploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreUploader")
            .field("base_url", &self.base_url)
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

impl ObjectStoreUploader {
    pub fn new(client: reqwest::Client, config: &ObjectStoreConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bucket: config.bucket.trim_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        }
    }

    /// `<base_url>/<bucket>/<key>`
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.bucket, key.trim_start_matches('/'))
    }

    pub async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), DeliveryError> {
        let size = bytes.len();
        let mut request = self
            .client
            .put(self.object_url(key))
            .header(reqwest::header::CONTENT_TYPE, content_type(key))
            .body(bytes);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(transport)?;
        check_status("object_store", response).await?;
        tracing::info!(key, size, "Resume stored");
        Ok(())
    }
}
