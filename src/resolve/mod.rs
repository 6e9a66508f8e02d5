//! Pure resolution of an overlay's render transform and sort order from its configuration and
//! the live state of the entity (or parent overlay) it follows.

pub(crate) mod transform;
pub(crate) mod zorder;

pub use transform::{
    IntrinsicSize, ParentBox, ResolveInput, ResolvedTransform, ShapesPlacement, resolve_alpha,
    resolve_angle, resolve_scale, resolve_tint, resolve_transform, screen_position,
};
pub use zorder::{ZOrder, resolve_zorder};
