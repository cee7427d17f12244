//! Fallback Responders
//!
//! Consulted for messages no intent rule matched.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use hr_assistant_config::{render, ReplyTemplates};
use hr_assistant_core::{DataLookup, FallbackResponder};

/// Canned reply for every unmatched message
pub struct StaticHelpResponder {
    text: String,
}

impl StaticHelpResponder {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl FallbackResponder for StaticHelpResponder {
    async fn respond(&self, _user_id: &str, _text: &str) -> Option<String> {
        Some(self.text.clone())
    }
}

/// Topics the leave responder answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeaveTopic {
    Annual,
    Casual,
    Joining,
}

impl LeaveTopic {
    fn detect(question: &str) -> Option<Self> {
        if question.contains("annual leave") {
            Some(Self::Annual)
        } else if question.contains("casual leave") {
            Some(Self::Casual)
        } else if question.contains("join") || question.contains("appointment") {
            Some(Self::Joining)
        } else {
            None
        }
    }
}

/// Answers `"<employee no or name> <question>"` from staff records
///
/// Returns `None` for messages that don't look like a staff query so the
/// controller can fall back to its help text.
pub struct LeaveEntitlementResponder {
    lookup: Arc<dyn DataLookup>,
    templates: ReplyTemplates,
    timeout: Duration,
}

impl LeaveEntitlementResponder {
    pub fn new(lookup: Arc<dyn DataLookup>, templates: ReplyTemplates, timeout: Duration) -> Self {
        Self {
            lookup,
            templates,
            timeout,
        }
    }
}

fn format_days(days: f64) -> String {
    if days.fract() == 0.0 {
        format!("{}", days as i64)
    } else {
        format!("{}", days)
    }
}

#[async_trait]
impl FallbackResponder for LeaveEntitlementResponder {
    async fn respond(&self, user_id: &str, text: &str) -> Option<String> {
        let mut parts = text.split_whitespace();
        let identifier = parts.next()?;
        let question = parts.collect::<Vec<_>>().join(" ").to_lowercase();
        let topic = LeaveTopic::detect(&question);

        let employee =
            match tokio::time::timeout(self.timeout, self.lookup.lookup_employee(identifier)).await
            {
                Ok(Ok(employee)) => employee,
                Ok(Err(e)) => {
                    tracing::warn!(user_id, error = %e, "Employee lookup failed");
                    return topic.map(|_| self.templates.lookup_unavailable.clone());
                }
                Err(_) => {
                    tracing::warn!(user_id, "Employee lookup timed out");
                    return topic.map(|_| self.templates.lookup_unavailable.clone());
                }
            };

        let Some(employee) = employee else {
            // Only claim the message when it was clearly a staff question
            return topic.map(|_| self.templates.employee_not_found.clone());
        };

        // Without a leave topic a name match is too loose to act on
        let exact_number = employee.employee_no.trim().eq_ignore_ascii_case(identifier);
        if topic.is_none() && !exact_number {
            return None;
        }
        if question.is_empty() {
            return Some(render(
                &self.templates.leave_usage,
                &[("employee_no", employee.employee_no.trim())],
            ));
        }

        let name = employee.name.as_str();
        let reply = match topic {
            Some(LeaveTopic::Annual) => render(
                &self.templates.annual_leave,
                &[("name", name), ("days", &format_days(employee.annual_leave_days))],
            ),
            Some(LeaveTopic::Casual) => render(
                &self.templates.casual_leave,
                &[("name", name), ("days", &format_days(employee.casual_leave_days))],
            ),
            Some(LeaveTopic::Joining) => match employee.joined_on {
                Some(date) => render(
                    &self.templates.joined_on,
                    &[("name", name), ("date", &date.format("%Y-%m-%d").to_string())],
                ),
                None => render(&self.templates.joined_on_missing, &[("name", name)]),
            },
            None => render(&self.templates.leave_topics, &[("name", name)]),
        };
        Some(reply)
    }
}
