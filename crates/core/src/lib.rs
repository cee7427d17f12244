//! Core types and traits for the HR assistant
//!
//! Domain-neutral contracts shared by every other crate:
//! - **Conversation** (`conversation`): per-user stage record and job identifiers
//! - **Records** (`records`): read-only rows served by the data lookup
//! - **Events** (`events`): normalized inbound events and outbound actions
//! - **Traits** (`traits`): collaborator boundaries (lookup, delivery, storage, fallback)
//! - **Errors** (`error`): error taxonomy used across crate boundaries

pub mod conversation;
pub mod error;
pub mod events;
pub mod records;
pub mod traits;

pub use conversation::{ConversationState, JobId, Stage};
pub use error::{AdapterError, DeliveryError, LookupError, StoreError};
pub use events::{ChatId, DocumentRef, InboundEvent, OutboundAction, UserId};
pub use records::{EmployeeRecord, InterviewSlot, JobListing};
pub use traits::{
    ConversationStore, DataLookup, DeliveryGateway, FallbackResponder, RelayDestination,
};
