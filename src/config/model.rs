use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::eval::Comparator;
use crate::foundation::core::Vec2;
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::interaction::Interaction;

/// Sentinel filter identifier meaning "no filter".
pub(crate) const NO_FILTER: &str = "NONE";

/// Anchor point in normalized content space (`0..1` on each axis).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Anchor {
    /// Horizontal anchor.
    pub x: f64,
    /// Vertical anchor.
    pub y: f64,
}

impl Anchor {
    /// Center anchor `(0.5, 0.5)`.
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };

    /// Convert into a kurbo vector.
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl<'de> Deserialize<'de> for Anchor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f64; 2]),
            Obj { x: f64, y: f64 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y]) => Ok(Self { x, y }),
            Repr::Obj { x, y } => Ok(Self { x, y }),
        }
    }
}

/// Continuous rotation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationConfig {
    /// Rotate indefinitely while this is set.
    pub rotate: bool,
    /// Direction of the rotation.
    pub clockwise: bool,
    /// Duration of one full turn in milliseconds.
    pub duration: f64,
    /// Rotate around the content center instead of the anchor.
    pub relative: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            rotate: false,
            clockwise: true,
            duration: 5000.0,
            relative: false,
        }
    }
}

/// Second color and blend factor for tint interpolation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterpolateColor {
    /// Target color (hex string).
    pub color2: Option<String>,
    /// Blend percentage in `[0, 1]`.
    pub prc: f64,
}

impl Default for InterpolateColor {
    fn default() -> Self {
        Self {
            color2: None,
            prc: 0.0,
        }
    }
}

/// Full overlay configuration record.
///
/// Every field has a default, so any partial JSON object can be merged over
/// [`OverlayConfig::default`] (see [`OverlayConfig::merged`]). Wire names follow the camelCase
/// convention of the configuration forms that produce these records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlayConfig {
    /// Identifier of this overlay among its siblings on the same entity.
    pub id: String,
    /// Identifier of the sibling overlay this one is parented to.
    #[serde(rename = "parentID")]
    pub parent_id: Option<String>,

    /// Render in screen space instead of following the entity.
    pub ui: bool,
    /// Sort above the entity.
    pub top: bool,
    /// Sort below the entity.
    pub bottom: bool,

    /// Offset as a fraction of the entity (or parent) box.
    pub offset_x: f64,
    /// Offset as a fraction of the entity (or parent) box.
    pub offset_y: f64,
    /// Offset in pixels.
    pub p_offset_x: f64,
    /// Offset in pixels.
    pub p_offset_y: f64,
    /// Content anchor; center when absent.
    pub anchor: Option<Anchor>,

    /// Scale the x axis by the entity's grid width.
    pub link_dimensions_x: bool,
    /// Scale the y axis by the entity's grid height.
    pub link_dimensions_y: bool,
    /// Fit the content to the entity box preserving aspect ratio.
    pub link_scale: bool,
    /// Counteract the stage zoom.
    pub link_stage_scale: bool,
    /// Follow the entity's mirror flags.
    pub link_mirror: bool,
    /// Add the entity's rotation to `angle`.
    pub link_rotation: bool,
    /// Use the entity's alpha instead of `alpha`.
    pub link_opacity: bool,

    /// Scale multiplier applied after linkage.
    pub scale_x: f64,
    /// Scale multiplier applied after linkage.
    pub scale_y: f64,
    /// Explicit displayed width in pixels.
    pub width: Option<f64>,
    /// Explicit displayed height in pixels.
    pub height: Option<f64>,
    /// Rotation in degrees.
    pub angle: f64,

    /// Base tint as a hex string.
    pub tint: Option<String>,
    /// Copy the entity tint.
    pub inherit_tint: bool,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
    /// Optional second color blended into `tint`.
    pub interpolate_color: Option<InterpolateColor>,

    /// Show even when the entity itself is hidden.
    pub always_visible: bool,
    /// Only show to owners of the entity.
    pub limited_to_owner: bool,
    /// Only show to these users (empty means everyone).
    pub limited_users: Vec<String>,
    /// Only show while the viewer's entity carries this effect.
    pub limit_on_effect: Option<String>,
    /// Only show while the viewer's entity satisfies this comparator.
    pub limit_on_property: Option<String>,
    /// Show while the entity is hovered.
    pub limit_on_hover: bool,
    /// Show while the entity is controlled.
    pub limit_on_control: bool,
    /// Show while scene highlighting is active.
    pub limit_on_highlight: bool,
    /// Show while the entity HUD is open.
    #[serde(rename = "limitOnHUD")]
    pub limit_on_hud: bool,
    /// Show while the viewer targets the entity.
    pub limit_on_target: bool,
    /// Show while anyone targets the entity.
    pub limit_on_any_target: bool,
    /// Visibility used when the entity is only imprecisely detected.
    pub imprecise_visible: bool,

    /// Continuous rotation.
    pub animation: AnimationConfig,

    /// Filter identifier; `None`, empty or `"NONE"` mean no filter.
    pub filter: Option<String>,
    /// Filter options merged over the filter's declared defaults.
    pub filter_options: Map<String, JsonValue>,

    /// Loop live content.
    #[serde(rename = "loop")]
    pub loop_playback: bool,
    /// Play live content once, then hide the overlay.
    pub play_once: bool,

    /// Pointer interactions.
    pub interactivity: Vec<Interaction>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            parent_id: None,
            ui: false,
            top: false,
            bottom: false,
            offset_x: 0.0,
            offset_y: 0.0,
            p_offset_x: 0.0,
            p_offset_y: 0.0,
            anchor: None,
            link_dimensions_x: false,
            link_dimensions_y: false,
            link_scale: true,
            link_stage_scale: false,
            link_mirror: true,
            link_rotation: true,
            link_opacity: false,
            scale_x: 1.0,
            scale_y: 1.0,
            width: None,
            height: None,
            angle: 0.0,
            tint: None,
            inherit_tint: false,
            alpha: 1.0,
            interpolate_color: None,
            always_visible: false,
            limited_to_owner: false,
            limited_users: Vec::new(),
            limit_on_effect: None,
            limit_on_property: None,
            limit_on_hover: false,
            limit_on_control: false,
            limit_on_highlight: false,
            limit_on_hud: false,
            limit_on_target: false,
            limit_on_any_target: false,
            imprecise_visible: false,
            animation: AnimationConfig::default(),
            filter: None,
            filter_options: Map::new(),
            loop_playback: true,
            play_once: false,
            interactivity: Vec::new(),
        }
    }
}

impl OverlayConfig {
    /// Merge a partial JSON object over the default record.
    pub fn from_json_value(patch: &JsonValue) -> Self {
        Self::default().merged(patch)
    }

    /// Parse a partial JSON object and merge it over the default record.
    ///
    /// Only syntactically invalid JSON is an error; individual malformed fields fall back to
    /// their defaults.
    pub fn from_json_str(s: &str) -> OverlayResult<Self> {
        let v: JsonValue = serde_json::from_str(s)
            .map_err(|e| OverlayError::serde(format!("parse overlay config JSON: {e}")))?;
        Ok(Self::from_json_value(&v))
    }

    /// Return a new record with `patch` deep-merged over `self`.
    ///
    /// Keys are applied one at a time; a key whose merged value does not deserialize is
    /// skipped with a warning and the previous value is kept.
    pub fn merged(&self, patch: &JsonValue) -> Self {
        let JsonValue::Object(patch) = patch else {
            if !patch.is_null() {
                tracing::warn!(?patch, "overlay config patch is not an object; ignored");
            }
            return self.clone();
        };

        let mut base = match serde_json::to_value(self) {
            Ok(JsonValue::Object(m)) => m,
            _ => return self.clone(),
        };

        for (key, value) in migrate_legacy(patch) {
            let mut candidate = base.clone();
            match candidate.get_mut(&key) {
                Some(slot) => merge_json(slot, &value),
                None => {
                    tracing::trace!(key = %key, "unknown overlay config key ignored");
                    continue;
                }
            }
            match serde_json::from_value::<Self>(JsonValue::Object(candidate.clone())) {
                Ok(_) => base = candidate,
                Err(err) => {
                    tracing::warn!(key = %key, %err, "malformed overlay config field; keeping previous value");
                }
            }
        }

        let merged: Self =
            serde_json::from_value(JsonValue::Object(base)).unwrap_or_else(|_| self.clone());
        if patch.contains_key("limitOnProperty")
            && let Some(expr) = merged.limit_property()
            && let Err(err) = Comparator::parse(expr)
        {
            tracing::warn!(%err, expr, "limitOnProperty comparator rejected; overlay stays hidden while it is set");
        }
        merged
    }

    /// Parent overlay identifier, ignoring empty strings.
    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|p| !p.is_empty())
    }

    /// Filter identifier, ignoring empty strings and the `"NONE"` sentinel.
    pub fn filter_id(&self) -> Option<&str> {
        self.filter
            .as_deref()
            .filter(|f| !f.is_empty() && *f != NO_FILTER)
    }

    /// Effect name required on the viewer's entity, ignoring empty strings.
    pub fn limit_effect(&self) -> Option<&str> {
        self.limit_on_effect.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Comparator required on the viewer's entity, ignoring empty strings.
    pub fn limit_property(&self) -> Option<&str> {
        self.limit_on_property
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    /// Whether any hover/control/highlight/HUD/target predicate is configured.
    pub fn has_interaction_limits(&self) -> bool {
        self.limit_on_hover
            || self.limit_on_control
            || self.limit_on_highlight
            || self.limit_on_hud
            || self.limit_on_target
            || self.limit_on_any_target
    }

    /// Explicit width when positive and finite.
    pub fn explicit_width(&self) -> Option<f64> {
        self.width.filter(|w| w.is_finite() && *w > 0.0)
    }

    /// Explicit height when positive and finite.
    pub fn explicit_height(&self) -> Option<f64> {
        self.height.filter(|h| h.is_finite() && *h > 0.0)
    }

    /// Resolved anchor, center when unset.
    pub fn anchor_or_center(&self) -> Anchor {
        self.anchor.unwrap_or(Anchor::CENTER)
    }
}

/// `linkDimensions` predates the per-axis flags; expand it when the patch does not already
/// carry the new fields.
fn migrate_legacy(patch: &Map<String, JsonValue>) -> Map<String, JsonValue> {
    let mut out = patch.clone();
    if let Some(legacy) = out.remove("linkDimensions")
        && !out.contains_key("linkDimensionsX")
        && legacy.as_bool() == Some(true)
    {
        out.insert("linkDimensionsX".to_owned(), JsonValue::Bool(true));
        out.insert("linkDimensionsY".to_owned(), JsonValue::Bool(true));
    }
    out
}

/// Deep-merge `patch` into `slot`: objects merge key by key, everything else replaces.
fn merge_json(slot: &mut JsonValue, patch: &JsonValue) {
    match (slot, patch) {
        (JsonValue::Object(dst), JsonValue::Object(src)) => {
            for (k, v) in src {
                match dst.get_mut(k) {
                    Some(existing) => merge_json(existing, v),
                    None => {
                        dst.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (slot, patch) => *slot = patch.clone(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
