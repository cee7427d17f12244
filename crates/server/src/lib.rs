//! Webhook server for the HR assistant
//!
//! Wires settings, data lookup, delivery gateway and conversation store into
//! a `DialogueController` and serves it over HTTP.

pub mod adapter;
pub mod bootstrap;
pub mod http;
pub mod state;
pub mod sweeper;
pub mod telemetry;

pub use adapter::parse_update;
pub use bootstrap::{build_controller, ServerError};
pub use http::create_router;
pub use state::AppState;
