//! Configuration-driven overlays for tokens in a 2D scene graph.
//!
//! An overlay is a sprite (image, video, shape batch, text or HTML) attached to an entity or
//! to another overlay. Its transform, visibility, filters and rotation animation are all
//! derived from a declarative [`OverlayConfig`] plus the live [`EntityState`] it follows:
//!
//! - [`resolve_transform`] and [`evaluate_visibility`] are pure functions over those inputs
//! - [`OverlayLayer`] owns the nodes, drives their lifecycle, and talks to the host through
//!   the [`Host`] traits (content loading, hook subscriptions, animation scheduling, filter
//!   construction)
#![forbid(unsafe_code)]

pub(crate) mod animation;
pub(crate) mod config;
pub(crate) mod content;
pub(crate) mod effects;
pub(crate) mod eval;
pub(crate) mod foundation;
pub(crate) mod hooks;
pub(crate) mod interaction;
pub(crate) mod overlay;
pub(crate) mod render;
pub(crate) mod resolve;
pub(crate) mod scene;

pub use crate::animation::{AnimationScheduler, AnimationState, RotationAnimator, RotationRequest};
pub use crate::config::{
    Anchor, AnimationConfig, InterpolateColor, OverlayConfig, interpolate_color, parse_tint,
};
pub use crate::content::{
    ChildSlot, Content, ContentLoader, ContentSource, LiveStream, PlaybackOpts, ShapeBatch,
    StreamHandle, TextureHandle,
};
pub use crate::effects::{
    AppliedFilter, ArgStyle, FilterArgs, FilterDescriptor, FilterFactory, FilterOwner,
    FilterPipeline, FilterRegistry, OverlayFilter,
};
pub use crate::eval::{CompareOp, Comparator, VisibilityInput, evaluate_visibility};
pub use crate::foundation::core::{Affine, Point, Rgb8, Size, Vec2};
pub use crate::foundation::error::{OverlayError, OverlayResult};
pub use crate::foundation::ids::{EntityId, OverlayId};
pub use crate::hooks::{HookRegistry, HookService, HookSubscriptions, HookTrigger, required_triggers};
pub use crate::interaction::{EventMode, Interaction, InteractionAction, InteractionHandler, Listener};
pub use crate::overlay::{Host, LayerOpts, NodeState, OverlayLayer, OverlayNode, RefreshOpts, SetTextureOpts};
pub use crate::render::{HtmlBox, RenderNode};
pub use crate::resolve::{
    IntrinsicSize, ParentBox, ResolveInput, ResolvedTransform, ShapesPlacement, ZOrder,
    resolve_alpha, resolve_angle, resolve_scale, resolve_tint, resolve_transform,
    resolve_zorder, screen_position,
};
pub use crate::scene::{DetectionLevel, EntityProvider, EntityState, SceneState, SceneView, ViewerState};
