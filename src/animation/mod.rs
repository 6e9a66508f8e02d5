//! Named, cancellable continuous rotation bound to an overlay's lifetime.

pub(crate) mod rotation;

pub use rotation::{AnimationScheduler, AnimationState, RotationAnimator, RotationRequest};
