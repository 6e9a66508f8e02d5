//! Read-only views of the external world: entity state, the viewing user, and the stage.

pub(crate) mod entity;

pub use entity::{DetectionLevel, EntityProvider, EntityState, SceneState, SceneView, ViewerState};
