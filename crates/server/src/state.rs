//! Shared handler state

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use hr_assistant_agent::DialogueController;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<DialogueController>,
    /// Expected `X-Telegram-Bot-Api-Secret-Token`; unchecked when `None`
    pub webhook_secret: Option<String>,
    /// Prometheus renderer, absent when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(controller: Arc<DialogueController>) -> Self {
        Self {
            controller,
            webhook_secret: None,
            metrics: None,
        }
    }

    pub fn with_webhook_secret(mut self, secret: Option<String>) -> Self {
        self.webhook_secret = secret.filter(|s| !s.is_empty());
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
