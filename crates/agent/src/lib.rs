//! Conversational core for the HR assistant
//!
//! - **Intent** (`intent`): ordered rule table classifying normalized text
//! - **Store** (`store`): in-memory conversation store with a retention policy
//! - **Locks** (`locks`): per-user serialization of event handling
//! - **Controller** (`controller`): the stage state machine
//! - **Fallback** (`fallback`): responders for messages no rule matched

pub mod controller;
pub mod fallback;
pub mod intent;
pub mod locks;
pub mod store;

pub use controller::{ControllerConfig, DialogueController, Turn};
pub use fallback::{LeaveEntitlementResponder, StaticHelpResponder};
pub use intent::{extract_job_id, normalize, ClassifyError, Intent, IntentClassifier};
pub use locks::KeyedLocks;
pub use store::InMemoryConversationStore;
