//! Reactive refresh triggers and their per-node subscription diffing.

pub(crate) mod coordinator;

pub use coordinator::{HookRegistry, HookService, HookSubscriptions, HookTrigger, required_triggers};
