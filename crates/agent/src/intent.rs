//! Intent Classification
//!
//! Maps free text to an intent with an ordered rule table. No scoring: the
//! first rule whose matcher accepts the normalized text decides.

use regex::Regex;
use std::fmt;

use hr_assistant_config::{IntentKind, IntentRulesConfig, MatcherDefinition, RuleDefinition};
use hr_assistant_core::JobId;

/// Classified purpose of a text message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    ListJobs,
    ApplyForJob(JobId),
    Greeting,
    AskInterview,
    ContactHr,
    Unknown,
}

impl Intent {
    /// Label for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            Intent::ListJobs => "list_jobs",
            Intent::ApplyForJob(_) => "apply_for_job",
            Intent::Greeting => "greeting",
            Intent::AskInterview => "ask_interview",
            Intent::ContactHr => "contact_hr",
            Intent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::ApplyForJob(id) => write!(f, "apply_for_job({})", id),
            other => f.write_str(other.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    /// An application message carried no usable job number
    #[error("message does not contain a valid job id")]
    InvalidJobId,

    #[error("invalid rule pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Lowercase and trim
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Concatenate every ASCII digit of the message in order and parse it.
///
/// `"apply for job id 101 please call 2"` yields `1012`.
pub fn extract_job_id(text: &str) -> Result<JobId, ClassifyError> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(ClassifyError::InvalidJobId);
    }
    digits
        .parse::<u64>()
        .map(JobId::new)
        .map_err(|_| ClassifyError::InvalidJobId)
}

#[derive(Debug, Clone)]
enum Matcher {
    ContainsAny(Vec<String>),
    ExactAny(Vec<String>),
    PrefixAndContains { prefix: String, contains: String },
    Pattern(Regex),
}

impl Matcher {
    fn compile(definition: &MatcherDefinition) -> Result<Self, ClassifyError> {
        let lowered = |items: &[String]| items.iter().map(|s| normalize(s)).collect();
        Ok(match definition {
            MatcherDefinition::ContainsAny(items) => Matcher::ContainsAny(lowered(items)),
            MatcherDefinition::ExactAny(items) => Matcher::ExactAny(lowered(items)),
            MatcherDefinition::PrefixAndContains { prefix, contains } => {
                Matcher::PrefixAndContains {
                    prefix: normalize(prefix),
                    contains: normalize(contains),
                }
            }
            MatcherDefinition::Regex(pattern) => {
                let regex = Regex::new(pattern).map_err(|e| ClassifyError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
                Matcher::Pattern(regex)
            }
        })
    }

    fn matches(&self, text: &str) -> bool {
        match self {
            Matcher::ContainsAny(items) => items.iter().any(|item| text.contains(item.as_str())),
            Matcher::ExactAny(items) => items.iter().any(|item| text == item),
            Matcher::PrefixAndContains { prefix, contains } => {
                text.starts_with(prefix.as_str()) && text.contains(contains.as_str())
            }
            Matcher::Pattern(regex) => regex.is_match(text),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    intent: IntentKind,
    matcher: Matcher,
}

impl CompiledRule {
    fn compile(rule: &RuleDefinition) -> Result<Self, ClassifyError> {
        Ok(Self {
            intent: rule.intent,
            matcher: Matcher::compile(&rule.matcher)?,
        })
    }
}

/// Ordered rule-table classifier
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<CompiledRule>,
}

impl IntentClassifier {
    /// Compile a rule table; fails on invalid regex patterns
    pub fn from_config(config: &IntentRulesConfig) -> Result<Self, ClassifyError> {
        let rules = config
            .rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Classify a message. Pure: depends only on the text.
    pub fn classify(&self, text: &str) -> Result<Intent, ClassifyError> {
        let normalized = normalize(text);

        let Some(rule) = self.rules.iter().find(|r| r.matcher.matches(&normalized)) else {
            return Ok(Intent::Unknown);
        };
        tracing::debug!(intent = rule.intent.as_str(), "Intent rule matched");

        Ok(match rule.intent {
            IntentKind::ListJobs => Intent::ListJobs,
            IntentKind::ApplyForJob => Intent::ApplyForJob(extract_job_id(&normalized)?),
            IntentKind::Greeting => Intent::Greeting,
            IntentKind::AskInterview => Intent::AskInterview,
            IntentKind::ContactHr => Intent::ContactHr,
        })
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        // Built-in rules carry no regex patterns, so compilation cannot fail
        let rules = IntentRulesConfig::default()
            .rules
            .iter()
            .filter_map(|rule| CompiledRule::compile(rule).ok())
            .collect();
        Self { rules }
    }
}
