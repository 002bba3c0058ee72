//! Convenience re-exports for signal handling

pub use crate::event::ActivationEvent;
pub use crate::registry::{ActivationRegistry, CallbackId};
