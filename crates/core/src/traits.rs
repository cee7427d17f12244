//! Collaborator Traits
//!
//! Narrow interfaces the dialogue controller consumes. Implementations live
//! in the persistence and delivery crates; tests use in-memory doubles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::conversation::{ConversationState, JobId};
use crate::error::{DeliveryError, LookupError, StoreError};
use crate::events::DocumentRef;
use crate::records::{EmployeeRecord, InterviewSlot, JobListing};

/// Read-only tabular data source
#[async_trait]
pub trait DataLookup: Send + Sync {
    /// All open job listings
    async fn list_open_jobs(&self) -> Result<Vec<JobListing>, LookupError>;

    /// Interview scheduled for a job; first match wins on duplicates
    async fn interview_for(&self, job_id: JobId) -> Result<Option<InterviewSlot>, LookupError>;

    /// Employee by number, falling back to a case-insensitive name match
    async fn lookup_employee(
        &self,
        id_or_name: &str,
    ) -> Result<Option<EmployeeRecord>, LookupError>;

    /// Single job listing by id
    async fn job(&self, job_id: JobId) -> Result<Option<JobListing>, LookupError> {
        Ok(self
            .list_open_jobs()
            .await?
            .into_iter()
            .find(|job| job.job_id == job_id))
    }
}

/// Where a received document is forwarded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelayDestination {
    Email { to: String, subject: String },
    ObjectStore { key: String },
}

/// Side-effecting outbound boundary
#[async_trait]
pub trait DeliveryGateway: Send + Sync {
    /// Send a text reply to a chat
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError>;

    /// Forward an uploaded document to its destination
    async fn relay_document(
        &self,
        document: &DocumentRef,
        destination: &RelayDestination,
    ) -> Result<(), DeliveryError>;
}

/// Per-user conversation storage
///
/// `get` returns `ConversationState::Idle` for users never seen before.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<ConversationState, StoreError>;

    async fn put(&self, user_id: &str, state: ConversationState) -> Result<(), StoreError>;

    async fn remove(&self, user_id: &str) -> Result<(), StoreError>;

    /// Drop entries past their retention window, returning how many were removed
    async fn purge_expired(&self) -> Result<usize, StoreError>;

    /// Number of tracked users
    async fn len(&self) -> Result<usize, StoreError>;
}

/// Answers messages no intent rule matched
#[async_trait]
pub trait FallbackResponder: Send + Sync {
    /// Reply text, or `None` when this responder cannot help
    async fn respond(&self, user_id: &str, text: &str) -> Option<String>;
}
