use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::animation::{AnimationScheduler, RotationAnimator};
use crate::config::OverlayConfig;
use crate::content::{Content, ContentLoader, ContentSource};
use crate::effects::{FilterFactory, FilterPipeline, FilterRegistry};
use crate::eval::{VisibilityInput, evaluate_visibility};
use crate::foundation::core::Size;
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::foundation::ids::{EntityId, OverlayId};
use crate::hooks::{HookService, HookSubscriptions, HookTrigger};
use crate::interaction::{self, EventMode, InteractionHandler, Listener};
use crate::overlay::node::{NodeState, OverlayNode, PendingOp, RefreshOpts, SetTextureOpts};
use crate::render::RenderNode;
use crate::resolve::{
    IntrinsicSize, ParentBox, ResolveInput, resolve_transform, resolve_zorder, screen_position,
};
use crate::scene::{SceneState, SceneView, ViewerState};

/// Everything the engine needs from its host.
pub trait Host: ContentLoader + HookService + AnimationScheduler + FilterFactory {}

impl<T> Host for T where T: ContentLoader + HookService + AnimationScheduler + FilterFactory {}

/// Engine-wide options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerOpts {
    /// Distance `top`/`bottom` overlays are pushed past the entity's own sort keys.
    pub sort_offset: f64,
    /// Prefix of rotation animation names.
    pub animation_prefix: String,
    /// Re-apply filters on every full refresh.
    pub always_refresh_filters: bool,
}

impl Default for LayerOpts {
    fn default() -> Self {
        Self {
            sort_offset: 9999.0,
            animation_prefix: "overlay.".to_owned(),
            always_refresh_filters: false,
        }
    }
}

impl LayerOpts {
    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> OverlayResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| OverlayError::serde(format!("parse layer options JSON: {e}")))
    }
}

/// Arena of overlay nodes and the host collaborators they drive.
///
/// All mutation happens through `&mut self` on one thread. Host callbacks (activation,
/// stream end, animation progress, hooks) re-enter through the `on_*` methods, which are
/// no-ops for destroyed or unknown nodes. Destroyed nodes stay as tombstones until
/// [`OverlayLayer::prune`].
pub struct OverlayLayer<H: Host> {
    host: H,
    opts: LayerOpts,
    registry: FilterRegistry,
    nodes: BTreeMap<OverlayId, OverlayNode>,
    next_id: u32,
    next_sort: u32,
}

impl<H: Host> OverlayLayer<H> {
    /// Layer with default options and the stock filter registry.
    pub fn new(host: H) -> Self {
        Self::with_opts(host, LayerOpts::default(), FilterRegistry::with_builtin())
    }

    /// Layer with explicit options and filter registry.
    pub fn with_opts(host: H, opts: LayerOpts, registry: FilterRegistry) -> Self {
        Self {
            host,
            opts,
            registry,
            nodes: BTreeMap::new(),
            next_id: 1,
            next_sort: 0,
        }
    }

    /// Host collaborators.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Host collaborators, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Engine options.
    pub fn opts(&self) -> &LayerOpts {
        &self.opts
    }

    /// Filter registry, for registering host filters.
    pub fn registry_mut(&mut self) -> &mut FilterRegistry {
        &mut self.registry
    }

    /// Node by handle, tombstones included.
    pub fn node(&self, id: OverlayId) -> Option<&OverlayNode> {
        self.nodes.get(&id)
    }

    /// Mutable node by handle, tombstones included.
    pub fn node_mut(&mut self, id: OverlayId) -> Option<&mut OverlayNode> {
        self.nodes.get_mut(&id)
    }

    /// Live overlays of `entity` in insertion order.
    pub fn nodes_for_entity(&self, entity: &EntityId) -> Vec<OverlayId> {
        let mut out: Vec<&OverlayNode> = self
            .nodes
            .values()
            .filter(|n| !n.is_destroyed() && &n.entity == entity)
            .collect();
        out.sort_by_key(|n| n.overlay_sort);
        out.into_iter().map(|n| n.id).collect()
    }

    /// Live overlay of `entity` whose configuration `id` is `config_id`.
    pub fn find(&self, entity: &EntityId, config_id: &str) -> Option<OverlayId> {
        self.find_by_config(entity, config_id, None)
    }

    /// Load `source` and attach a new overlay to `entity`.
    ///
    /// Static content is refreshed immediately. Live content waits for
    /// [`OverlayLayer::on_content_ready`]; refreshes issued meanwhile are queued.
    #[tracing::instrument(skip_all, fields(entity = %entity))]
    pub fn create(
        &mut self,
        entity: EntityId,
        source: &ContentSource,
        config: &JsonValue,
        view: SceneView<'_>,
    ) -> OverlayResult<OverlayId> {
        let content = self.host.load(source)?;
        Ok(self.create_with_content(entity, content, config, view))
    }

    /// Attach a new overlay showing already loaded `content`.
    pub fn create_with_content(
        &mut self,
        entity: EntityId,
        mut content: Content,
        config: &JsonValue,
        view: SceneView<'_>,
    ) -> OverlayId {
        let config = OverlayConfig::from_json_value(config);
        let id = OverlayId(self.next_id);
        self.next_id += 1;
        let overlay_sort = self.next_sort;
        self.next_sort += 1;

        let live = content.is_live();
        if let Some(stream) = content.live.as_mut() {
            stream.begin_activation(&mut self.host, config.play_once);
        }

        let animation = format!("{}{}.{}", self.opts.animation_prefix, entity, id.0);
        let render = RenderNode::new(content.texture, content.size, content.child_slot());
        let mut node = OverlayNode {
            id,
            entity,
            state: NodeState::Constructing,
            config,
            content,
            original_content: None,
            parent: None,
            children: Vec::new(),
            animator: RotationAnimator::new(animation),
            hooks: HookSubscriptions::default(),
            filters: FilterPipeline::default(),
            render,
            ready: false,
            pending: VecDeque::new(),
            overlay_sort,
        };
        node.hooks.sync(&mut self.host, id, &node.config);
        tracing::debug!(overlay = %id, entity = %node.entity, live, "overlay created");
        self.nodes.insert(id, node);

        self.link_parent(id);
        self.adopt_orphans(id);

        if !live {
            self.activate(id, view);
        }
        id
    }

    /// Live content of `id` became playable.
    pub fn on_content_ready(&mut self, id: OverlayId, view: SceneView<'_>) {
        match self.nodes.get(&id).map(|n| n.state) {
            Some(NodeState::Constructing) => self.activate(id, view),
            Some(NodeState::Destroyed) => {
                tracing::debug!(overlay = %id, "activation resolved after destroy; ignored");
            }
            Some(_) => tracing::trace!(overlay = %id, "overlay already active"),
            None => tracing::debug!(overlay = %id, "activation for unknown overlay ignored"),
        }
    }

    /// Refresh `id`, merging `patch` into its configuration.
    ///
    /// Deferred while the node is constructing and applied in issue order once it is ready.
    /// A no-op on destroyed nodes.
    #[tracing::instrument(skip_all, fields(overlay = %id))]
    pub fn refresh(
        &mut self,
        id: OverlayId,
        patch: Option<&JsonValue>,
        opts: RefreshOpts,
        view: SceneView<'_>,
    ) -> OverlayResult<()> {
        let node = self.nodes.get_mut(&id).ok_or_else(|| unknown(id))?;
        match node.state {
            NodeState::Destroyed => {
                tracing::debug!("refresh of destroyed overlay ignored");
                return Ok(());
            }
            NodeState::Constructing | NodeState::Refreshing => {
                node.pending.push_back(PendingOp::Refresh {
                    patch: patch.cloned(),
                    opts,
                });
                tracing::debug!(pending = node.pending.len(), "refresh deferred");
                return Ok(());
            }
            NodeState::Ready => {}
        }
        self.run(id, patch, opts, view);
        self.drain_pending(id, view);
        Ok(())
    }

    /// Swap the displayed content of `id`.
    ///
    /// `source` is loaded through the host. A preview swap keeps the current content for a
    /// later revert; a non-preview swap first reverts any preview, then replaces the content
    /// when `source` is given. Child overlays move to the new content's child slot.
    #[tracing::instrument(skip_all, fields(overlay = %id))]
    pub fn set_texture(
        &mut self,
        id: OverlayId,
        source: Option<&ContentSource>,
        opts: SetTextureOpts,
        view: SceneView<'_>,
    ) -> OverlayResult<()> {
        let node = self.nodes.get_mut(&id).ok_or_else(|| unknown(id))?;
        match node.state {
            NodeState::Destroyed => {
                tracing::debug!("content swap on destroyed overlay ignored");
                return Ok(());
            }
            NodeState::Constructing | NodeState::Refreshing => {
                node.pending.push_back(PendingOp::SetTexture {
                    source: source.cloned(),
                    opts,
                });
                tracing::debug!(pending = node.pending.len(), "content swap deferred");
                return Ok(());
            }
            NodeState::Ready => {}
        }
        self.apply_set_texture(id, source, opts, view)?;
        self.drain_pending(id, view);
        Ok(())
    }

    /// Re-evaluate every overlay of `entity`, parents before children.
    pub fn refresh_entity(&mut self, entity: &EntityId, view: SceneView<'_>) {
        let roots: Vec<OverlayId> = self
            .nodes_for_entity(entity)
            .into_iter()
            .filter(|id| self.nodes.get(id).is_some_and(|n| n.parent.is_none()))
            .collect();
        for id in roots {
            if let Err(err) = self.refresh(id, None, RefreshOpts::default(), view) {
                tracing::warn!(overlay = %id, %err, "entity refresh failed");
            }
        }
    }

    /// Move a screen-space overlay to its current screen position.
    pub fn update_position(&mut self, id: OverlayId, scene: &SceneState) {
        if let Some(node) = self.nodes.get_mut(&id)
            && !node.is_destroyed()
            && node.config.ui
        {
            node.render.position = screen_position(&node.config, scene);
        }
    }

    /// Deliver a hook trigger to every ready overlay subscribed to it.
    pub fn on_hook(&mut self, trigger: HookTrigger, view: SceneView<'_>) {
        let ids: Vec<OverlayId> = self
            .nodes
            .values()
            .filter(|n| n.state == NodeState::Ready && n.hooks.active().contains(&trigger))
            .map(|n| n.id)
            .collect();
        for id in ids {
            match trigger {
                HookTrigger::CanvasPan => {
                    if let Err(err) = self.refresh(id, None, RefreshOpts::partial(), view) {
                        tracing::warn!(overlay = %id, %err, "hook refresh failed");
                    }
                }
                HookTrigger::Ticker => self.update_position(id, view.scene),
            }
        }
    }

    /// A play-once stream finished: hide the overlay until its content changes.
    pub fn on_stream_ended(&mut self, id: OverlayId) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        if node.is_destroyed() {
            return;
        }
        if let Some(stream) = node.content.live.as_mut()
            && stream.mark_ended()
        {
            node.render.alpha = 0.0;
            tracing::debug!(overlay = %id, "play-once stream ended; overlay hidden");
        }
    }

    /// Per-tick progress of a rotation run.
    pub fn animation_step(&mut self, name: &str, progress: f64) {
        let Some(id) = self.node_by_animation(name) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(&id)
            && let Some(angle) = node.animator.step(progress)
        {
            node.render.angle = angle;
        }
    }

    /// A rotation run ended. Completed runs chain into the next turn while rotation is still
    /// configured.
    pub fn on_animation_finished(&mut self, name: &str, completed: bool) {
        let Some(id) = self.node_by_animation(name) else {
            tracing::trace!(animation = name, "finished animation has no live overlay");
            return;
        };
        let host = &mut self.host;
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        if completed && let Some(end) = node.animator.current().map(|r| r.to_deg) {
            node.render.angle = end;
        }
        node.animator
            .on_finished(host, &node.config.animation, completed);
    }

    /// Destroy `id` and, recursively, its child overlays.
    ///
    /// Cancels animation, drops hook subscriptions, releases content and discards queued
    /// operations. Returns whether anything was destroyed; repeated calls are no-ops.
    #[tracing::instrument(skip(self))]
    pub fn destroy(&mut self, id: OverlayId) -> bool {
        if let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent)
            && let Some(p) = self.nodes.get_mut(&parent)
        {
            p.children.retain(|c| *c != id);
        }

        let mut work = vec![id];
        let mut destroyed = false;
        while let Some(next) = work.pop() {
            let host = &mut self.host;
            let Some(node) = self.nodes.get_mut(&next) else {
                continue;
            };
            if node.is_destroyed() {
                continue;
            }
            node.animator.stop(host);
            node.hooks.clear(host, next);
            node.pending.clear();
            release_content(host, &mut node.content);
            if let Some(mut original) = node.original_content.take() {
                release_content(host, &mut original);
            }
            node.render.filters.retain(|f| !f.is_engine());
            node.state = NodeState::Destroyed;
            node.ready = false;
            work.extend(node.children.drain(..));
            tracing::debug!(overlay = %next, "overlay destroyed");
            destroyed = true;
        }
        destroyed
    }

    /// Destroy every overlay of `entity`. Returns how many were destroyed.
    pub fn destroy_entity(&mut self, entity: &EntityId) -> usize {
        self.nodes_for_entity(entity)
            .into_iter()
            .filter(|id| self.destroy(*id))
            .count()
    }

    /// Drop tombstones of destroyed nodes. Returns how many were dropped.
    pub fn prune(&mut self) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|_, n| !n.is_destroyed());
        before - self.nodes.len()
    }

    /// Computed visibility of `id` for `viewer`; a hidden parent hides its children.
    pub fn is_visible(&self, id: OverlayId, viewer: &ViewerState, view: SceneView<'_>) -> bool {
        let mut seen = BTreeSet::new();
        let mut cursor = Some(id);
        while let Some(next) = cursor {
            if !seen.insert(next) {
                return false;
            }
            let Some(node) = self.nodes.get(&next) else {
                return false;
            };
            if node.is_destroyed() {
                return false;
            }
            let Some(entity) = view.entities.entity(&node.entity) else {
                return false;
            };
            let visible = evaluate_visibility(&VisibilityInput {
                config: &node.config,
                entity,
                viewer,
                entities: view.entities,
                ready: node.ready,
            });
            if !visible {
                return false;
            }
            cursor = node.parent;
        }
        true
    }

    /// Run the interactions of `id` bound to `listener`. Returns whether any ran.
    pub fn dispatch_interaction(
        &self,
        id: OverlayId,
        listener: Listener,
        handler: &mut dyn InteractionHandler,
    ) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        if node.is_destroyed() || node.render.event_mode != EventMode::Static {
            return false;
        }
        interaction::dispatch(&node.config.interactivity, listener, &node.entity, handler)
    }

    fn activate(&mut self, id: OverlayId, view: SceneView<'_>) {
        let host = &mut self.host;
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        if node.state != NodeState::Constructing {
            return;
        }
        let looping = node.config.loop_playback;
        if let Some(stream) = node.content.live.as_mut()
            && let Some(texture) = stream.complete_activation(host, looping)
        {
            node.render.texture = texture;
        }
        node.state = NodeState::Ready;
        tracing::debug!(overlay = %id, "overlay ready");

        self.run(id, None, RefreshOpts::default(), view);
        self.drain_pending(id, view);
    }

    fn drain_pending(&mut self, id: OverlayId, view: SceneView<'_>) {
        loop {
            let Some(node) = self.nodes.get_mut(&id) else {
                return;
            };
            if node.state != NodeState::Ready {
                return;
            }
            let Some(op) = node.pending.pop_front() else {
                return;
            };
            match op {
                PendingOp::Refresh { patch, opts } => self.run(id, patch.as_ref(), opts, view),
                PendingOp::SetTexture { source, opts } => {
                    if let Err(err) = self.apply_set_texture(id, source.as_ref(), opts, view) {
                        tracing::warn!(overlay = %id, %err, "deferred content swap failed");
                    }
                }
            }
        }
    }

    fn apply_set_texture(
        &mut self,
        id: OverlayId,
        source: Option<&ContentSource>,
        opts: SetTextureOpts,
        view: SceneView<'_>,
    ) -> OverlayResult<()> {
        let incoming = source.map(|s| self.host.load(s)).transpose()?;
        self.swap_content(id, incoming, opts.preview);
        if opts.refresh {
            let refresh = RefreshOpts {
                preview: opts.preview,
                full_refresh: !opts.preview,
                preview_texture: None,
                refresh_filters: opts.refresh_filters,
            };
            self.run(id, opts.patch.as_ref(), refresh, view);
        }
        Ok(())
    }

    /// Refresh `id`, then its descendants, parents first.
    fn run(&mut self, id: OverlayId, patch: Option<&JsonValue>, opts: RefreshOpts, view: SceneView<'_>) {
        let child_opts = RefreshOpts {
            preview: opts.preview,
            full_refresh: opts.full_refresh,
            preview_texture: None,
            refresh_filters: false,
        };
        let mut seen = BTreeSet::from([id]);
        let mut queue: VecDeque<OverlayId> = self.refresh_pass(id, patch, opts, view).into();
        while let Some(child) = queue.pop_front() {
            if !seen.insert(child) {
                continue;
            }
            if self.nodes.get(&child).map(|n| n.state) != Some(NodeState::Ready) {
                continue;
            }
            queue.extend(self.refresh_pass(child, None, child_opts.clone(), view));
        }
    }

    /// One refresh pass over a single node. Returns the children to propagate to.
    fn refresh_pass(
        &mut self,
        id: OverlayId,
        patch: Option<&JsonValue>,
        opts: RefreshOpts,
        view: SceneView<'_>,
    ) -> Vec<OverlayId> {
        match &opts.preview_texture {
            Some(source) => match self.host.load(source) {
                Ok(content) => self.swap_content(id, Some(content), true),
                Err(err) => {
                    tracing::warn!(overlay = %id, %err, "preview content failed to load; keeping current content");
                }
            },
            None => {
                let stashed = self
                    .nodes
                    .get(&id)
                    .is_some_and(|n| n.original_content.is_some());
                if stashed && !opts.preview {
                    self.swap_content(id, None, false);
                }
            }
        }

        // Configuration snapshot for the whole pass.
        let config = {
            let Some(node) = self.nodes.get_mut(&id) else {
                return Vec::new();
            };
            node.state = NodeState::Refreshing;
            let config = match patch {
                Some(p) => node.config.merged(p),
                None => node.config.clone(),
            };
            if !opts.preview {
                if config.filter_id() != node.config.filter_id()
                    || config.filter_options != node.config.filter_options
                {
                    node.filters.mark_stale();
                }
                node.config = config.clone();
            }
            node.hooks.sync(&mut self.host, id, &config);
            config
        };
        if patch.is_some() && !opts.preview {
            self.link_parent(id);
            self.relink_children(id);
            self.adopt_orphans(id);
        }
        self.sync_event_mode(id, !config.interactivity.is_empty());

        let parent = self.parent_box(id);
        let host = &mut self.host;
        let Some(node) = self.nodes.get_mut(&id) else {
            return Vec::new();
        };

        if opts.full_refresh
            && let Some(stream) = node.content.live.as_mut()
        {
            stream.sync_loop(host, config.loop_playback && !config.play_once);
        }

        match view.entities.entity(&node.entity) {
            Some(entity) => {
                let input = ResolveInput {
                    config: &config,
                    entity,
                    scene: view.scene,
                    parent,
                    intrinsic: IntrinsicSize {
                        texture: node.content.size,
                        shapes: node.content.shapes.map(|s| s.size),
                    },
                    full_refresh: opts.full_refresh,
                    video_ended: node.video_ended(),
                };
                let transform = resolve_transform(&input);
                node.render.apply(&transform);
                node.render.z_order =
                    resolve_zorder(&config, entity, self.opts.sort_offset, node.overlay_sort);
            }
            None => {
                tracing::debug!(overlay = %id, entity = %node.entity, "entity state unavailable; transform unchanged");
            }
        }

        if opts.full_refresh {
            if config.animation.rotate {
                node.animator
                    .start(host, &config.animation, node.render.angle);
            } else {
                node.animator.stop(host);
            }
        }

        let force = opts.refresh_filters || self.opts.always_refresh_filters;
        if node.filters.needs_apply(opts.full_refresh, force) {
            node.filters
                .apply(&config, &self.registry, host, &mut node.render.filters);
        }

        node.render.html_box = node
            .content
            .html
            .then(|| node.render.compute_html_box());

        node.ready = true;
        node.state = NodeState::Ready;
        tracing::trace!(overlay = %id, preview = opts.preview, full = opts.full_refresh, "refresh pass complete");
        node.children.clone()
    }

    /// Replace the displayed content. See [`OverlayLayer::set_texture`].
    fn swap_content(&mut self, id: OverlayId, incoming: Option<Content>, preview: bool) {
        let host = &mut self.host;
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let from = node.render.child_slot;

        if preview {
            let Some(incoming) = incoming else {
                return;
            };
            let mut previous = std::mem::replace(&mut node.content, incoming);
            if node.original_content.is_none() {
                node.original_content = Some(previous);
            } else {
                release_content(host, &mut previous);
            }
        } else {
            if let Some(original) = node.original_content.take() {
                let mut previous = std::mem::replace(&mut node.content, original);
                release_content(host, &mut previous);
            }
            if let Some(incoming) = incoming {
                let mut previous = std::mem::replace(&mut node.content, incoming);
                release_content(host, &mut previous);
            }
        }

        let (play_once, looping) = (node.config.play_once, node.config.loop_playback);
        let mut texture = node.content.texture;
        if let Some(stream) = node.content.live.as_mut() {
            // A restored preview original keeps playing where it was.
            texture = match stream.clone_texture {
                Some(t) => t,
                None => {
                    stream.begin_activation(host, play_once);
                    stream.complete_activation(host, looping).unwrap_or(texture)
                }
            };
        }

        node.render.texture = texture;
        node.render.size = node.content.size;
        node.render.child_slot = node.content.child_slot();
        if !node.content.html {
            node.render.html_box = None;
        }
        tracing::debug!(
            overlay = %id,
            from = ?from,
            to = ?node.render.child_slot,
            children = node.children.len(),
            preview,
            "content swapped"
        );
    }

    fn parent_box(&self, id: OverlayId) -> Option<ParentBox> {
        let parent = self.nodes.get(&self.nodes.get(&id)?.parent?)?;
        if parent.is_destroyed() {
            return None;
        }
        let r = &parent.render;
        Some(ParentBox {
            anchor: r.anchor,
            scale: r.scale,
            displayed: r.displayed_size(),
            shapes: parent.content.shapes.map(|s| {
                Size::new(
                    s.size.width * r.scale.x.abs(),
                    s.size.height * r.scale.y.abs(),
                )
            }),
        })
    }

    fn sync_event_mode(&mut self, id: OverlayId, interactive: bool) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        if interactive {
            node.render.event_mode = EventMode::Static;
        } else {
            if node.render.event_mode == EventMode::Static {
                node.render.event_mode = EventMode::None;
            }
            return;
        }

        let mut seen = BTreeSet::from([id]);
        let mut cursor = node.parent;
        while let Some(pid) = cursor {
            if !seen.insert(pid) {
                break;
            }
            let Some(p) = self.nodes.get_mut(&pid) else {
                break;
            };
            if p.render.event_mode == EventMode::None {
                p.render.event_mode = EventMode::Passive;
            }
            cursor = p.parent;
        }
    }

    fn find_by_config(
        &self,
        entity: &EntityId,
        config_id: &str,
        exclude: Option<OverlayId>,
    ) -> Option<OverlayId> {
        if config_id.is_empty() {
            return None;
        }
        self.nodes
            .values()
            .filter(|n| !n.is_destroyed() && &n.entity == entity && Some(n.id) != exclude)
            .find(|n| n.config.id == config_id)
            .map(|n| n.id)
    }

    fn node_by_animation(&self, name: &str) -> Option<OverlayId> {
        self.nodes
            .values()
            .find(|n| !n.is_destroyed() && n.animator.name() == name)
            .map(|n| n.id)
    }

    /// Whether `ancestor` appears on the parent chain of `id` (or is `id`).
    fn is_ancestor(&self, ancestor: OverlayId, id: OverlayId) -> bool {
        let mut seen = BTreeSet::new();
        let mut cursor = Some(id);
        while let Some(next) = cursor {
            if next == ancestor {
                return true;
            }
            if !seen.insert(next) {
                return false;
            }
            cursor = self.nodes.get(&next).and_then(|n| n.parent);
        }
        false
    }

    /// Point `id` at the overlay its `parentID` names, if any.
    fn link_parent(&mut self, id: OverlayId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let current = node.parent;
        let mut wanted = node
            .config
            .parent()
            .and_then(|pid| self.find_by_config(&node.entity, pid, Some(id)));
        if wanted == current {
            return;
        }
        if let Some(w) = wanted
            && self.is_ancestor(id, w)
        {
            tracing::warn!(overlay = %id, parent = %w, "parent link would form a cycle; left unparented");
            wanted = None;
        }

        if let Some(old) = current
            && let Some(p) = self.nodes.get_mut(&old)
        {
            p.children.retain(|c| *c != id);
        }
        if let Some(new) = wanted
            && let Some(p) = self.nodes.get_mut(&new)
        {
            p.children.push(id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = wanted;
        }
        tracing::debug!(overlay = %id, parent = ?wanted, "overlay parent linked");
    }

    fn relink_children(&mut self, id: OverlayId) {
        let children = self
            .nodes
            .get(&id)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            self.link_parent(child);
        }
    }

    /// Link existing unparented overlays that name `id` as their parent.
    fn adopt_orphans(&mut self, id: OverlayId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        if node.config.id.is_empty() {
            return;
        }
        let orphans: Vec<OverlayId> = self
            .nodes
            .values()
            .filter(|n| {
                !n.is_destroyed()
                    && n.id != id
                    && n.parent.is_none()
                    && n.entity == node.entity
                    && n.config.parent() == Some(node.config.id.as_str())
            })
            .map(|n| n.id)
            .collect();
        for orphan in orphans {
            self.link_parent(orphan);
        }
    }
}

/// Release what `content` owns. Safe to call more than once.
fn release_content(host: &mut dyn ContentLoader, content: &mut Content) {
    if let Some(stream) = content.live.as_mut() {
        stream.release(host);
    }
    if let Some(shapes) = content.shapes.take() {
        host.release_shapes(&shapes);
    }
    if content.exclusive {
        host.release_texture(content.texture);
        content.exclusive = false;
    }
}

fn unknown(id: OverlayId) -> OverlayError {
    OverlayError::lifecycle(format!("unknown {id}"))
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/layer.rs"]
mod tests;
