//! Typed pointer interactions attached to overlays.
//!
//! Interactions never evaluate code themselves: matching actions are handed to an
//! [`InteractionHandler`] supplied by the caller.

use serde::{Deserialize, Serialize};

use crate::foundation::ids::EntityId;

/// Pointer event that can trigger an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Listener {
    /// Pointer entered the overlay.
    HoverIn,
    /// Pointer left the overlay.
    HoverOut,
    /// Left click.
    ClickLeft,
    /// Left double click.
    ClickLeft2,
    /// Right click.
    ClickRight,
    /// Right double click.
    ClickRight2,
}

/// What an interaction does when triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum InteractionAction {
    /// Run a script through the host's sandboxed executor.
    Script(String),
    /// Execute a named macro.
    Macro(String),
    /// Toggle a named effect on the entity.
    ToggleEffect(String),
    /// Toggle a named filter preset on the entity.
    TogglePreset(String),
}

/// One configured interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    /// Pointer event that fires the action.
    #[serde(alias = "listener")]
    pub trigger: Listener,
    /// Action to run.
    pub action: InteractionAction,
}

/// Pointer event participation of a render node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventMode {
    /// Ignores pointer events.
    #[default]
    None,
    /// Does not handle events itself but lets descendants receive them.
    Passive,
    /// Receives pointer events.
    Static,
}

/// Executes interaction actions on behalf of the engine.
pub trait InteractionHandler {
    /// Run `action` for the overlay attached to `entity`.
    fn handle(&mut self, entity: &EntityId, action: &InteractionAction);
}

/// Run every interaction matching `listener`; returns `true` when at least one ran and the
/// event should be considered consumed.
pub(crate) fn dispatch(
    interactions: &[Interaction],
    listener: Listener,
    entity: &EntityId,
    handler: &mut dyn InteractionHandler,
) -> bool {
    let mut consumed = false;
    for i in interactions.iter().filter(|i| i.trigger == listener) {
        tracing::debug!(entity = %entity, ?listener, action = ?i.action, "overlay interaction");
        handler.handle(entity, &i.action);
        consumed = true;
    }
    consumed
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/mod.rs"]
mod tests;
