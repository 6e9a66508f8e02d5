//! Declarative overlay configuration: the full default record, partial-patch merging, and
//! tint color helpers.

pub(crate) mod color;
pub(crate) mod model;

pub use color::{interpolate_color, parse_tint};
pub use model::{Anchor, AnimationConfig, InterpolateColor, OverlayConfig};
