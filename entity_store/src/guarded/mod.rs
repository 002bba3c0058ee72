//! Guarded store implementation
//!
//! This module provides the store that rewrites deletion into activation
//! toggles and announces every state write through the signal registry.

mod activatable;
mod core;
mod store;

#[cfg(test)]
mod tests;

pub use core::GuardedStore;
