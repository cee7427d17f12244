//! Centralized defaults
//!
//! Single source for values referenced by both settings defaults and code.

/// Server defaults
pub mod server {
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8080;
    pub const DEFAULT_WEBHOOK_PATH: &str = "/webhook/telegram";
    /// Header Telegram sets when a webhook secret token is registered
    pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Telegram Bot API
pub mod telegram {
    pub const API_BASE: &str = "https://api.telegram.org";
}

/// Conversation handling
pub mod conversation {
    pub const COLLABORATOR_TIMEOUT_MS: u64 = 10_000;
    pub const SWEEP_INTERVAL_SECS: u64 = 300;
    /// Extension accepted for resumes
    pub const RESUME_EXTENSION: &str = "pdf";
    /// Storage key prefix for relayed resumes
    pub const RESUME_KEY_PREFIX: &str = "resumes";
}

/// Environment
pub mod env {
    /// Prefix for environment overrides, e.g. `HR_ASSISTANT__SERVER__PORT`
    pub const PREFIX: &str = "HR_ASSISTANT";
    pub const SEPARATOR: &str = "__";
    /// Explicit settings file path
    pub const CONFIG_PATH: &str = "HR_ASSISTANT_CONFIG";
    pub const DEFAULT_CONFIG_FILE: &str = "config/hr-assistant";
}
