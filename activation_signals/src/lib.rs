//! Signal registry for activation-state changes
//!
//! This crate provides the synchronous publish/subscribe mechanism used to
//! announce active/inactive transitions of records in the activatable
//! ecosystem.

pub mod event;
pub mod prelude;
pub mod registry;

pub use event::ActivationEvent;
pub use registry::{ActivationRegistry, CallbackId};
