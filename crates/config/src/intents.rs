//! Intent Rule Definitions
//!
//! Ordered rule table mapping normalized text to an intent kind. The first
//! matching rule wins. Rules can be replaced by a YAML file:
//!
//! ```yaml
//! rules:
//!   - intent: list_jobs
//!     contains_any: ["job opening", "vacancy"]
//!   - intent: apply_for_job
//!     prefix_and_contains: { prefix: "apply", contains: "id" }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Intent produced by a rule, before payload extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    ListJobs,
    /// Payload (job id) is extracted from the message digits
    ApplyForJob,
    Greeting,
    AskInterview,
    ContactHr,
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListJobs => "list_jobs",
            Self::ApplyForJob => "apply_for_job",
            Self::Greeting => "greeting",
            Self::AskInterview => "ask_interview",
            Self::ContactHr => "contact_hr",
        }
    }
}

/// Predicate over normalized (lowercased, trimmed) text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherDefinition {
    /// Any phrase appears as a substring
    ContainsAny(Vec<String>),
    /// Whole message equals one of the phrases
    ExactAny(Vec<String>),
    /// Message starts with `prefix` and contains `contains` anywhere
    PrefixAndContains { prefix: String, contains: String },
    /// Regular expression match
    Regex(String),
}

/// One row of the rule table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub intent: IntentKind,
    #[serde(flatten)]
    pub matcher: MatcherDefinition,
}

impl RuleDefinition {
    pub fn new(intent: IntentKind, matcher: MatcherDefinition) -> Self {
        Self { intent, matcher }
    }
}

/// Rule table loaded from YAML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRulesConfig {
    pub rules: Vec<RuleDefinition>,
}

fn phrases(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for IntentRulesConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                RuleDefinition::new(
                    IntentKind::ListJobs,
                    MatcherDefinition::ContainsAny(phrases(&["job opening", "vacancy"])),
                ),
                RuleDefinition::new(
                    IntentKind::ApplyForJob,
                    MatcherDefinition::PrefixAndContains {
                        prefix: "apply".to_string(),
                        contains: "id".to_string(),
                    },
                ),
                RuleDefinition::new(
                    IntentKind::Greeting,
                    MatcherDefinition::ExactAny(phrases(&["hi", "hello", "start", "/start"])),
                ),
                RuleDefinition::new(
                    IntentKind::AskInterview,
                    MatcherDefinition::ContainsAny(phrases(&["interview"])),
                ),
                RuleDefinition::new(
                    IntentKind::ContactHr,
                    MatcherDefinition::ContainsAny(phrases(&["contact hr"])),
                ),
            ],
        }
    }
}

impl IntentRulesConfig {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, IntentRulesError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            IntentRulesError::FileNotFound(path.as_ref().display().to_string(), e.to_string())
        })?;

        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| IntentRulesError::ParseError(e.to_string()))?;
        if config.rules.is_empty() {
            return Err(IntentRulesError::ParseError("rule table is empty".to_string()));
        }
        Ok(config)
    }
}

/// Errors when loading intent rules
#[derive(Debug)]
pub enum IntentRulesError {
    FileNotFound(String, String),
    ParseError(String),
}

impl fmt::Display for IntentRulesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound(path, err) => {
                write!(f, "Intent rules not found at {}: {}", path, err)
            }
            Self::ParseError(err) => write!(f, "Failed to parse intent rules: {}", err),
        }
    }
}

impl std::error::Error for IntentRulesError {}
