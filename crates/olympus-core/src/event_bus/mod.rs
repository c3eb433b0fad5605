//! EventBus - the observability sink for lifecycle and routing events.
//!
//! Constructed explicitly and handed to the lifecycle manager and router.
//! Hooks run synchronously in registration order, then the event fans out
//! to async subscribers over a `tokio::broadcast` channel.

mod bus;
mod types;


pub use bus::{EventBus, EventHook};
pub use types::OlympusEvent;
