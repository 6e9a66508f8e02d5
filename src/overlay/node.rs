use std::collections::VecDeque;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::animation::RotationAnimator;
use crate::config::OverlayConfig;
use crate::content::{Content, ContentSource};
use crate::effects::FilterPipeline;
use crate::foundation::ids::{EntityId, OverlayId};
use crate::hooks::HookSubscriptions;
use crate::render::RenderNode;

/// Lifecycle state of an overlay node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    /// Waiting for live content to activate before the first refresh.
    Constructing,
    /// Stable; accepts refreshes.
    Ready,
    /// Inside a refresh pass.
    Refreshing,
    /// Resources released. Terminal.
    Destroyed,
}

/// Options of one refresh pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshOpts {
    /// Merge the patch for this pass only, without persisting it.
    pub preview: bool,
    /// Re-apply every resolver step (playback, rotation animation, filters).
    pub full_refresh: bool,
    /// Content to show while previewing; the current content is kept for revert.
    pub preview_texture: Option<ContentSource>,
    /// Re-apply filters even when they are current.
    pub refresh_filters: bool,
}

impl Default for RefreshOpts {
    fn default() -> Self {
        Self {
            preview: false,
            full_refresh: true,
            preview_texture: None,
            refresh_filters: false,
        }
    }
}

impl RefreshOpts {
    /// Incremental pass that leaves animation, playback and filters alone.
    pub fn partial() -> Self {
        Self {
            full_refresh: false,
            ..Self::default()
        }
    }

    /// Non-persisted pass, optionally showing `texture` in place of the current content.
    pub fn preview(texture: Option<ContentSource>) -> Self {
        Self {
            preview: true,
            full_refresh: false,
            preview_texture: texture,
            refresh_filters: false,
        }
    }
}

/// Options of a content swap.
#[derive(Debug, Clone, PartialEq)]
pub struct SetTextureOpts {
    /// Keep the current content for a later revert instead of releasing it.
    pub preview: bool,
    /// Refresh after the swap.
    pub refresh: bool,
    /// Configuration patch for the follow-up refresh.
    pub patch: Option<JsonValue>,
    /// Force filter re-application on the follow-up refresh.
    pub refresh_filters: bool,
}

impl Default for SetTextureOpts {
    fn default() -> Self {
        Self {
            preview: false,
            refresh: true,
            patch: None,
            refresh_filters: false,
        }
    }
}

/// Operation deferred while the node is constructing or mid-refresh.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PendingOp {
    Refresh {
        patch: Option<JsonValue>,
        opts: RefreshOpts,
    },
    SetTexture {
        source: Option<ContentSource>,
        opts: SetTextureOpts,
    },
}

/// One overlay attached to an entity.
#[derive(Debug)]
pub struct OverlayNode {
    pub(crate) id: OverlayId,
    pub(crate) entity: EntityId,
    pub(crate) state: NodeState,
    pub(crate) config: OverlayConfig,
    pub(crate) content: Content,
    pub(crate) original_content: Option<Content>,
    pub(crate) parent: Option<OverlayId>,
    pub(crate) children: Vec<OverlayId>,
    pub(crate) animator: RotationAnimator,
    pub(crate) hooks: HookSubscriptions,
    pub(crate) filters: FilterPipeline,
    pub(crate) render: RenderNode,
    pub(crate) ready: bool,
    pub(crate) pending: VecDeque<PendingOp>,
    pub(crate) overlay_sort: u32,
}

impl OverlayNode {
    /// Node handle.
    pub fn id(&self) -> OverlayId {
        self.id
    }

    /// Entity the node is attached to.
    pub fn entity(&self) -> &EntityId {
        &self.entity
    }

    /// Lifecycle state.
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Persisted configuration.
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Displayed content.
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Content stashed by a preview swap, restored on revert.
    pub fn original_content(&self) -> Option<&Content> {
        self.original_content.as_ref()
    }

    /// Parent overlay.
    pub fn parent(&self) -> Option<OverlayId> {
        self.parent
    }

    /// Child overlays, in attachment order.
    pub fn children(&self) -> &[OverlayId] {
        &self.children
    }

    /// Rotation animator.
    pub fn animator(&self) -> &RotationAnimator {
        &self.animator
    }

    /// Held hook subscriptions.
    pub fn hooks(&self) -> &HookSubscriptions {
        &self.hooks
    }

    /// Render properties.
    pub fn render(&self) -> &RenderNode {
        &self.render
    }

    /// Render properties, for host code that attaches its own filters.
    pub fn render_mut(&mut self) -> &mut RenderNode {
        &mut self.render
    }

    /// At least one refresh pass has completed.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether the node was destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.state == NodeState::Destroyed
    }

    /// Operations waiting for activation.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Insertion order among overlays.
    pub fn overlay_sort(&self) -> u32 {
        self.overlay_sort
    }

    /// A play-once stream has ended and pins alpha to zero.
    pub fn video_ended(&self) -> bool {
        self.content.live.is_some_and(|l| l.ended)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/node.rs"]
mod tests;
