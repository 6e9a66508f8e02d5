use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::foundation::core::{Affine, Point, Size, Vec2};
use crate::foundation::ids::EntityId;

/// How precisely the viewer perceives an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionLevel {
    /// Fully seen.
    #[default]
    Precise,
    /// Sensed without a clear view (e.g. heard, not seen).
    Imprecise,
}

/// Snapshot of the entity an overlay is attached to.
///
/// The engine only ever reads this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityState {
    /// Stable identifier.
    pub id: EntityId,
    /// Top-left corner in canvas pixels.
    pub x: f64,
    /// Top-left corner in canvas pixels.
    pub y: f64,
    /// Box width in canvas pixels.
    pub w: f64,
    /// Box height in canvas pixels.
    pub h: f64,
    /// Width in grid units.
    pub width: f64,
    /// Height in grid units.
    pub height: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Texture scale; a negative value means mirrored.
    pub texture_scale_x: f64,
    /// Texture scale; a negative value means mirrored.
    pub texture_scale_y: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
    /// Entity tint as a hex string.
    pub tint: Option<String>,
    /// Whether the entity is visible to the viewer.
    pub visible: bool,
    /// Whether the viewer owns the entity.
    pub is_owner: bool,
    /// Perceptual detection level for the viewer.
    pub detection_level: DetectionLevel,
    /// Pointer hover state.
    pub hover: bool,
    /// Controlled (selected) by the viewer.
    pub controlled: bool,
    /// HUD currently open.
    pub has_active_hud: bool,
    /// Users currently targeting the entity.
    pub targeted_by: Vec<String>,
    /// Names of active effects.
    pub effects: Vec<String>,
    /// Arbitrary attribute document used by comparator expressions.
    pub data: JsonValue,
    /// Sort key of the entity's mesh.
    pub sort: f64,
    /// Elevation of the entity's mesh.
    pub elevation: f64,
    /// z-index of the entity's mesh.
    pub z_index: f64,
    /// Sort layer of the entity's mesh.
    pub sort_layer: f64,
    /// Position of the entity's mesh in the last sort of its container.
    pub last_sorted_index: u32,
}

impl Default for EntityState {
    fn default() -> Self {
        Self {
            id: EntityId::default(),
            x: 0.0,
            y: 0.0,
            w: 0.0,
            h: 0.0,
            width: 1.0,
            height: 1.0,
            rotation: 0.0,
            texture_scale_x: 1.0,
            texture_scale_y: 1.0,
            alpha: 1.0,
            tint: None,
            visible: true,
            is_owner: false,
            detection_level: DetectionLevel::Precise,
            hover: false,
            controlled: false,
            has_active_hud: false,
            targeted_by: Vec::new(),
            effects: Vec::new(),
            data: JsonValue::Null,
            sort: 0.0,
            elevation: 0.0,
            z_index: 0.0,
            sort_layer: 0.0,
            last_sorted_index: 0,
        }
    }
}

impl EntityState {
    /// Center of the entity box.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Mirror sign per axis (`-1` when mirrored, `1` otherwise).
    pub fn mirror_sign(&self) -> Vec2 {
        Vec2::new(
            if self.texture_scale_x < 0.0 { -1.0 } else { 1.0 },
            if self.texture_scale_y < 0.0 { -1.0 } else { 1.0 },
        )
    }
}

/// The user looking at the scene.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerState {
    /// Viewer's user identifier.
    pub user_id: String,
    /// Entity the viewer currently speaks as (controlled or assigned).
    pub speaker: Option<EntityId>,
    /// A measurement ruler is being dragged.
    pub ruler_active: bool,
    /// Scene-wide highlighting is active.
    pub highlight_objects: bool,
}

/// Stage and viewport state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneState {
    /// Canvas-to-client transform of the stage.
    pub stage_transform: Affine,
    /// Client viewport size in pixels.
    pub viewport: Size,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            stage_transform: Affine::IDENTITY,
            viewport: Size::ZERO,
        }
    }
}

impl SceneState {
    /// Zoom of the stage per axis.
    pub fn stage_scale(&self) -> Vec2 {
        let [a, b, c, d, _, _] = self.stage_transform.as_coeffs();
        Vec2::new(a.hypot(b), c.hypot(d))
    }

    /// Map a client-space point back into canvas space.
    ///
    /// A degenerate stage transform maps points unchanged.
    pub fn canvas_from_client(&self, p: Point) -> Point {
        if self.stage_transform.determinant().abs() < f64::EPSILON {
            return p;
        }
        self.stage_transform.inverse() * p
    }
}

/// Read-only lookup of entity state by identifier.
pub trait EntityProvider {
    /// State of `id`, or `None` when it does not exist.
    fn entity(&self, id: &EntityId) -> Option<&EntityState>;
}

impl EntityProvider for BTreeMap<EntityId, EntityState> {
    fn entity(&self, id: &EntityId) -> Option<&EntityState> {
        self.get(id)
    }
}

impl EntityProvider for HashMap<EntityId, EntityState> {
    fn entity(&self, id: &EntityId) -> Option<&EntityState> {
        self.get(id)
    }
}

impl EntityProvider for [EntityState] {
    fn entity(&self, id: &EntityId) -> Option<&EntityState> {
        self.iter().find(|e| &e.id == id)
    }
}

impl EntityProvider for Vec<EntityState> {
    fn entity(&self, id: &EntityId) -> Option<&EntityState> {
        self.as_slice().entity(id)
    }
}

/// Everything a refresh pass reads from the outside world, passed explicitly per call.
#[derive(Clone, Copy)]
pub struct SceneView<'a> {
    /// Entity lookup.
    pub entities: &'a dyn EntityProvider,
    /// Stage state.
    pub scene: &'a SceneState,
}

impl<'a> SceneView<'a> {
    /// Bundle an entity provider with stage state.
    pub fn new(entities: &'a dyn EntityProvider, scene: &'a SceneState) -> Self {
        Self { entities, scene }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/entity.rs"]
mod tests;
