//! Layered Settings
//!
//! Resolution order, later sources winning:
//! 1. Built-in defaults
//! 2. YAML/TOML file (`config/hr-assistant.*`, or the path in `HR_ASSISTANT_CONFIG`)
//! 3. Environment variables, e.g. `HR_ASSISTANT__TELEGRAM__BOT_TOKEN`

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants;
use crate::templates::ReplyTemplates;

/// Errors when loading settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Root settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub telegram: TelegramConfig,
    pub relay: RelayConfig,
    pub conversation: ConversationConfig,
    pub data: DataConfig,
    pub observability: ObservabilityConfig,
    pub templates: ReplyTemplates,
    /// Optional YAML file replacing the built-in intent rules
    pub intent_rules_path: Option<PathBuf>,
}

/// HTTP server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path the messaging platform posts updates to
    pub webhook_path: String,
    /// Expected secret token header value; unchecked when absent
    pub webhook_secret: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: constants::server::DEFAULT_HOST.to_string(),
            port: constants::server::DEFAULT_PORT,
            webhook_path: constants::server::DEFAULT_WEBHOOK_PATH.to_string(),
            webhook_secret: None,
            request_timeout_secs: constants::server::REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Telegram Bot API client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Disable to run without outbound messaging (replies are only logged)
    pub enabled: bool,
    pub bot_token: String,
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bot_token: String::new(),
            api_base: constants::telegram::API_BASE.to_string(),
        }
    }
}

/// How received resumes are forwarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayMode {
    #[default]
    Email,
    ObjectStore,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub mode: RelayMode,
    pub mail: MailRelayConfig,
    pub object_store: ObjectStoreConfig,
}

/// HTTP mail relay
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MailRelayConfig {
    /// Endpoint accepting JSON messages with attachments
    pub endpoint: String,
    pub api_key: String,
    pub sender: String,
}

/// Object storage reachable by HTTP PUT
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectStoreConfig {
    pub base_url: String,
    pub bucket: String,
    pub auth_token: Option<String>,
}

/// Retention of per-user conversation records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionMode {
    /// Keep every user for the process lifetime
    #[default]
    Unbounded,
    /// Expire users idle for longer than `idle_ttl_secs`
    Ttl,
}

/// Resolved retention policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    Unbounded,
    Ttl(Duration),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Only accept `.pdf` resumes
    pub require_pdf: bool,
    /// Upper bound on every lookup and delivery call
    pub collaborator_timeout_ms: u64,
    pub retention: RetentionMode,
    pub idle_ttl_secs: u64,
    /// How often expired records are purged
    pub sweep_interval_secs: u64,
    /// HR address for contact requests and as relay fallback
    pub hr_contact_email: String,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            require_pdf: true,
            collaborator_timeout_ms: constants::conversation::COLLABORATOR_TIMEOUT_MS,
            retention: RetentionMode::Unbounded,
            idle_ttl_secs: 24 * 60 * 60,
            sweep_interval_secs: constants::conversation::SWEEP_INTERVAL_SECS,
            hr_contact_email: "hr@example.com".to_string(),
        }
    }
}

impl ConversationConfig {
    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_millis(self.collaborator_timeout_ms)
    }

    pub fn retention_policy(&self) -> RetentionPolicy {
        match self.retention {
            RetentionMode::Unbounded => RetentionPolicy::Unbounded,
            RetentionMode::Ttl => RetentionPolicy::Ttl(Duration::from_secs(self.idle_ttl_secs)),
        }
    }
}

/// Tabular data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Built-in sample tables
    #[default]
    Inline,
    /// YAML file with `jobs`, `interviews` and `employees`
    Yaml,
    /// Workbook with `Jobs`, `Interviews` and `Staff` sheets
    Spreadsheet,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub source: DataSource,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter when `RUST_LOG` is unset
    pub log_level: String,
    pub log_format: LogFormat,
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
        }
    }
}

impl Settings {
    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }
        if !self.server.webhook_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "server.webhook_path must start with '/': {}",
                self.server.webhook_path
            )));
        }
        if self.conversation.collaborator_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "conversation.collaborator_timeout_ms must be non-zero".into(),
            ));
        }
        if self.conversation.retention == RetentionMode::Ttl
            && self.conversation.idle_ttl_secs == 0
        {
            return Err(ConfigError::Invalid(
                "conversation.idle_ttl_secs must be non-zero with ttl retention".into(),
            ));
        }
        if self.telegram.enabled && self.telegram.bot_token.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "telegram.bot_token is required when telegram is enabled".into(),
            ));
        }
        if self.data.source != DataSource::Inline && self.data.path.is_none() {
            return Err(ConfigError::Invalid(format!(
                "data.path is required for the {:?} data source",
                self.data.source
            )));
        }
        Ok(())
    }
}

/// Load settings from the default file location and the process environment
pub fn load_settings() -> Result<Settings, ConfigError> {
    let explicit = std::env::var(constants::env::CONFIG_PATH).ok().map(PathBuf::from);
    build(explicit.as_deref(), None)
}

/// Load settings from a specific file plus the process environment
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    build(Some(path), None)
}

/// Build settings; `env_overrides` replaces the process environment when given
pub(crate) fn build(
    path: Option<&Path>,
    env_overrides: Option<HashMap<String, String>>,
) -> Result<Settings, ConfigError> {
    let mut builder =
        config::Config::builder().add_source(config::Config::try_from(&Settings::default())?);

    builder = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading settings file");
            builder.add_source(config::File::from(path).required(true))
        }
        None => builder.add_source(
            config::File::with_name(constants::env::DEFAULT_CONFIG_FILE).required(false),
        ),
    };

    let environment = config::Environment::with_prefix(constants::env::PREFIX)
        .prefix_separator(constants::env::SEPARATOR)
        .separator(constants::env::SEPARATOR)
        .try_parsing(true)
        .source(env_overrides);

    let settings: Settings = builder.add_source(environment).build()?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_yaml(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn no_env() -> Option<HashMap<String, String>> {
        Some(HashMap::new())
    }

    #[test]
    fn test_defaults_require_bot_token() {
        let err = Settings::default().validate().unwrap_err();
        assert!(err.to_string().contains("bot_token"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = write_yaml(
            r#"
server:
  port: 9090
telegram:
  bot_token: "123:abc"
conversation:
  require_pdf: false
  retention: ttl
  idle_ttl_secs: 600
relay:
  mode: object_store
  object_store:
    base_url: "http://storage.local"
    bucket: "resumes"
"#,
        );

        let settings = build(Some(file.path()), no_env()).unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.webhook_path, "/webhook/telegram");
        assert_eq!(settings.telegram.bot_token, "123:abc");
        assert!(!settings.conversation.require_pdf);
        assert_eq!(
            settings.conversation.retention_policy(),
            RetentionPolicy::Ttl(Duration::from_secs(600))
        );
        assert_eq!(settings.relay.mode, RelayMode::ObjectStore);
        assert_eq!(settings.relay.object_store.bucket, "resumes");
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = write_yaml("telegram:\n  bot_token: \"from-file\"\n");
        let mut env = HashMap::new();
        env.insert("HR_ASSISTANT__TELEGRAM__BOT_TOKEN".to_string(), "from-env".to_string());
        env.insert("HR_ASSISTANT__SERVER__PORT".to_string(), "7070".to_string());

        let settings = build(Some(file.path()), Some(env)).unwrap();
        assert_eq!(settings.telegram.bot_token, "from-env");
        assert_eq!(settings.server.port, 7070);
    }

    #[test]
    fn test_ttl_requires_duration() {
        let file = write_yaml(
            "telegram:\n  bot_token: t\nconversation:\n  retention: ttl\n  idle_ttl_secs: 0\n",
        );
        let err = build(Some(file.path()), no_env()).unwrap_err();
        assert!(err.to_string().contains("idle_ttl_secs"));
    }

    #[test]
    fn test_file_source_requires_path() {
        let file = write_yaml("telegram:\n  enabled: false\ndata:\n  source: spreadsheet\n");
        let err = build(Some(file.path()), no_env()).unwrap_err();
        assert!(err.to_string().contains("data.path"));
    }

    #[test]
    fn test_unbounded_is_default_retention() {
        let config = ConversationConfig::default();
        assert_eq!(config.retention_policy(), RetentionPolicy::Unbounded);
        assert_eq!(config.collaborator_timeout(), Duration::from_secs(10));
    }
}
