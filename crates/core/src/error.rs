//! Error taxonomy shared across crates
//!
//! Lookup misses are `None`, not errors. Invalid uploads are modelled as
//! replies. What remains here are the failures of collaborators and of the
//! inbound adapter.

/// Data source could not be consulted
#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
    #[error("data source unavailable: {0}")]
    Unavailable(String),

    #[error("lookup timed out after {0} ms")]
    Timeout(u64),
}

/// Outbound delivery failed
#[derive(Debug, Clone, thiserror::Error)]
pub enum DeliveryError {
    #[error("delivery timed out after {0} ms")]
    Timeout(u64),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("rejected by {service} with status {status}: {body}")]
    Rejected {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("delivery channel not configured: {0}")]
    NotConfigured(String),
}

/// Conversation store failure
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("conversation store backend error: {0}")]
    Backend(String),
}

/// Inbound payload rejected before reaching the dialogue controller
#[derive(Debug, Clone, thiserror::Error)]
pub enum AdapterError {
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    #[error("unsupported update: {0}")]
    Unsupported(String),
}
