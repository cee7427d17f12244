//! Configuration for the HR assistant
//!
//! Layered settings (defaults, YAML file, environment), reply templates,
//! intent rule definitions and shared constants.

pub mod constants;
pub mod intents;
pub mod settings;
pub mod templates;

pub use intents::{
    IntentKind, IntentRulesConfig, IntentRulesError, MatcherDefinition, RuleDefinition,
};
pub use settings::{
    load_settings, load_settings_from, ConfigError, ConversationConfig, DataConfig, DataSource,
    LogFormat, MailRelayConfig, ObjectStoreConfig, ObservabilityConfig, RelayConfig, RelayMode,
    RetentionMode, RetentionPolicy, ServerConfig, Settings, TelegramConfig,
};
pub use templates::{render, ReplyTemplates};
