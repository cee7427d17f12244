//! Conversation State
//!
//! One record per user. The job identifier lives inside the stages that
//! carry it, so a job id exists exactly while a user is awaiting a resume
//! or has completed an application.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric job identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(u64);

impl JobId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for JobId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Conversation phase without attached data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Listing,
    AwaitingResume,
    Done,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Idle,
        Stage::Listing,
        Stage::AwaitingResume,
        Stage::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Listing => "listing",
            Stage::AwaitingResume => "awaiting_resume",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-user conversation record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "stage", content = "job_id", rename_all = "snake_case")]
pub enum ConversationState {
    /// No conversation yet, or nothing in progress
    #[default]
    Idle,
    /// Job listings were shown
    Listing,
    /// Applied for a job, waiting for the resume upload
    AwaitingResume(JobId),
    /// Resume received for the job
    Done(JobId),
}

impl ConversationState {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Idle => Stage::Idle,
            Self::Listing => Stage::Listing,
            Self::AwaitingResume(_) => Stage::AwaitingResume,
            Self::Done(_) => Stage::Done,
        }
    }

    /// Job tracked in the current application cycle, if any
    pub fn job_id(&self) -> Option<JobId> {
        match self {
            Self::AwaitingResume(id) | Self::Done(id) => Some(*id),
            Self::Idle | Self::Listing => None,
        }
    }

    /// Representative state for a stage; job-carrying stages use `job_id`
    pub fn from_stage(stage: Stage, job_id: JobId) -> Self {
        match stage {
            Stage::Idle => Self::Idle,
            Stage::Listing => Self::Listing,
            Stage::AwaitingResume => Self::AwaitingResume(job_id),
            Stage::Done => Self::Done(job_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle_without_job() {
        let state = ConversationState::default();
        assert_eq!(state.stage(), Stage::Idle);
        assert_eq!(state.job_id(), None);
    }

    #[test]
    fn test_job_id_present_only_in_application_stages() {
        let id = JobId::new(101);
        assert_eq!(ConversationState::Listing.job_id(), None);
        assert_eq!(ConversationState::AwaitingResume(id).job_id(), Some(id));
        assert_eq!(ConversationState::Done(id).job_id(), Some(id));
    }

    #[test]
    fn test_state_serialization() {
        let state = ConversationState::AwaitingResume(JobId::new(7));
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"stage":"awaiting_resume","job_id":7}"#);

        let back: ConversationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);

        let idle: ConversationState = serde_json::from_str(r#"{"stage":"idle"}"#).unwrap();
        assert_eq!(idle, ConversationState::Idle);
    }
}
