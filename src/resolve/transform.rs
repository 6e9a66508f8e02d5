use serde::Serialize;

use crate::config::{OverlayConfig, interpolate_color, parse_tint};
use crate::foundation::core::{Point, Rgb8, Size, Vec2, div_scale, finite_or};
use crate::scene::{EntityState, SceneState};

/// Intrinsic size of the overlay's own content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntrinsicSize {
    /// Texture size.
    pub texture: Size,
    /// Shape batch size, overriding the texture size for layout.
    pub shapes: Option<Size>,
}

impl IntrinsicSize {
    /// Size used for fitting and explicit dimensions.
    pub fn layout(&self) -> Size {
        self.shapes.unwrap_or(self.texture)
    }
}

/// Publicly exposed box of a parent overlay, read by its children.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentBox {
    /// Parent's resolved anchor.
    pub anchor: Vec2,
    /// Parent's resolved scale.
    pub scale: Vec2,
    /// Parent's displayed size (absolute scale times texture size).
    pub displayed: Size,
    /// Shape batch override of the parent, in displayed pixels.
    pub shapes: Option<Size>,
}

impl ParentBox {
    /// Parent box in the parent's local (unscaled) space.
    pub fn local_size(&self) -> Size {
        let s = self.shapes.unwrap_or(self.displayed);
        Size::new(
            div_scale(s.width, self.scale.x),
            div_scale(s.height, self.scale.y),
        )
    }
}

/// Placement of a shape batch inside the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapesPlacement {
    /// Offset of the batch so the anchor lands on the node origin.
    pub position: Point,
    /// Pivot of the batch.
    pub pivot: Vec2,
}

/// Inputs of one transform resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolveInput<'a> {
    /// Configuration snapshot.
    pub config: &'a OverlayConfig,
    /// Entity the overlay is attached to.
    pub entity: &'a EntityState,
    /// Stage state.
    pub scene: &'a SceneState,
    /// Parent overlay box when parented to another overlay.
    pub parent: Option<ParentBox>,
    /// Own content size.
    pub intrinsic: IntrinsicSize,
    /// Full (non-incremental) refresh.
    pub full_refresh: bool,
    /// A play-once stream has ended.
    pub video_ended: bool,
}

/// Output of transform resolution, written to the render node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTransform {
    /// Node position in canvas space.
    pub position: Point,
    /// Node scale (negative when mirrored).
    pub scale: Vec2,
    /// Node pivot.
    pub pivot: Vec2,
    /// Node anchor.
    pub anchor: Vec2,
    /// Rotation in degrees; `None` leaves the current angle untouched.
    pub angle: Option<f64>,
    /// Tint.
    pub tint: Rgb8,
    /// Opacity.
    pub alpha: f64,
    /// Shape batch placement when the content has one.
    pub shapes: Option<ShapesPlacement>,
}

/// Resolve the full render transform.
pub fn resolve_transform(input: &ResolveInput<'_>) -> ResolvedTransform {
    let config = input.config;
    let entity = input.entity;

    let scale = resolve_scale(
        config,
        entity,
        input.scene,
        input.intrinsic,
        input.parent.is_some(),
    );
    let anchor = config.anchor_or_center().to_vec2();
    let anchor = Vec2::new(finite_or(anchor.x, 0.5), finite_or(anchor.y, 0.5));
    let relative = config.animation.relative;

    // Pivot term for relative rotation, and the matching position correction.
    let mut pivot = Vec2::ZERO;
    let mut rel_off = Vec2::ZERO;
    let shapes = input.intrinsic.shapes.map(|s| {
        let mut placement = ShapesPlacement {
            position: Point::new(-anchor.x * s.width, -anchor.y * s.height),
            pivot: Vec2::ZERO,
        };
        if relative {
            placement.pivot = Vec2::new((0.5 - anchor.x) * s.width, (0.5 - anchor.y) * s.height);
            rel_off = Vec2::new(placement.pivot.x * scale.x, placement.pivot.y * scale.y);
        }
        placement
    });
    if shapes.is_none() && relative {
        let tex = input.intrinsic.texture;
        rel_off = Vec2::new(
            (0.5 - anchor.x) * tex.width * scale.x.abs(),
            (0.5 - anchor.y) * tex.height * scale.y.abs(),
        );
        pivot = Vec2::new((0.5 - anchor.x) * tex.width, (0.5 - anchor.y) * tex.height);
    }

    let p_off = Vec2::new(
        finite_or(config.p_offset_x, 0.0),
        finite_or(config.p_offset_y, 0.0),
    );
    let off = Vec2::new(
        finite_or(config.offset_x, 0.0),
        finite_or(config.offset_y, 0.0),
    );

    let position = if config.ui {
        screen_position(config, input.scene)
    } else if let Some(parent) = input.parent {
        let pa = parent.anchor;
        let ps = parent.local_size();
        Point::new(
            p_off.x - off.x * ps.width - pa.x * ps.width + ps.width / 2.0,
            p_off.y - off.y * ps.height - pa.y * ps.height + ps.height / 2.0,
        )
    } else if relative {
        let c = entity.center();
        Point::new(
            c.x + p_off.x - off.x * entity.w + rel_off.x,
            c.y + p_off.y - off.y * entity.h + rel_off.y,
        )
    } else {
        pivot = Vec2::new(
            div_scale(-p_off.x, scale.x) + div_scale(off.x * entity.w, scale.x),
            div_scale(-p_off.y, scale.y) + div_scale(off.y * entity.h, scale.y),
        );
        entity.center()
    };

    ResolvedTransform {
        position,
        scale,
        pivot,
        anchor,
        angle: resolve_angle(config, entity, input.full_refresh),
        tint: resolve_tint(config, entity),
        alpha: resolve_alpha(config, entity, input.video_ended),
        shapes,
    }
}

/// Resolve the per-axis scale by linkage precedence, then apply the configured multipliers and
/// mirror linkage.
///
/// Precedence: `linkScale` (unparented only), `linkStageScale`, `linkDimensionsX/Y`, explicit
/// `width`/`height`, native size. In `linkDimensions` mode an unlinked axis stays at native
/// size.
pub fn resolve_scale(
    config: &OverlayConfig,
    entity: &EntityState,
    scene: &SceneState,
    intrinsic: IntrinsicSize,
    parented: bool,
) -> Vec2 {
    let dims = intrinsic.layout();
    let parented = parented || config.parent().is_some();

    let mut scale = if config.link_scale && !parented {
        let aspect = if dims.height > 0.0 {
            dims.width / dims.height
        } else {
            1.0
        };
        if aspect >= 1.0 {
            let s = div_scale(entity.w * entity.texture_scale_x.abs(), dims.width);
            Vec2::new(s, s)
        } else {
            let s = div_scale(entity.h * entity.texture_scale_y.abs(), dims.height);
            Vec2::new(s, s)
        }
    } else if config.link_stage_scale {
        let stage = scene.stage_scale();
        Vec2::new(div_scale(1.0, stage.x), div_scale(1.0, stage.y))
    } else if config.link_dimensions_x || config.link_dimensions_y {
        Vec2::new(
            if config.link_dimensions_x { entity.width } else { 1.0 },
            if config.link_dimensions_y { entity.height } else { 1.0 },
        )
    } else {
        Vec2::new(
            config
                .explicit_width()
                .map_or(1.0, |w| div_scale(w, dims.width)),
            config
                .explicit_height()
                .map_or(1.0, |h| div_scale(h, dims.height)),
        )
    };

    scale.x *= finite_or(config.scale_x, 1.0);
    scale.y *= finite_or(config.scale_y, 1.0);
    scale = Vec2::new(finite_or(scale.x, 1.0), finite_or(scale.y, 1.0));

    if config.link_mirror && !parented {
        let sign = entity.mirror_sign();
        scale = Vec2::new(scale.x.abs() * sign.x, scale.y.abs() * sign.y);
    }
    scale
}

/// Resolve the rotation in degrees.
///
/// Incremental refreshes leave the angle alone while a rotation animation is configured so the
/// animation's own interpolation is not overwritten.
pub fn resolve_angle(config: &OverlayConfig, entity: &EntityState, full_refresh: bool) -> Option<f64> {
    let base = finite_or(config.angle, 0.0);
    let linked = base + finite_or(entity.rotation, 0.0);
    if full_refresh {
        Some(if config.link_rotation { linked } else { base })
    } else if !config.animation.rotate && config.link_rotation {
        Some(linked)
    } else {
        None
    }
}

/// Resolve the tint; opaque white when nothing resolves.
pub fn resolve_tint(config: &OverlayConfig, entity: &EntityState) -> Rgb8 {
    let tint = if config.inherit_tint {
        entity.tint.as_deref().and_then(parse_tint)
    } else {
        interpolate_color(config.tint.as_deref(), config.interpolate_color.as_ref())
    };
    tint.unwrap_or(Rgb8::WHITE)
}

/// Resolve opacity. An ended play-once stream pins alpha at zero.
pub fn resolve_alpha(config: &OverlayConfig, entity: &EntityState, video_ended: bool) -> f64 {
    if video_ended {
        return 0.0;
    }
    let alpha = if config.link_opacity {
        entity.alpha
    } else {
        config.alpha
    };
    finite_or(alpha, 1.0).clamp(0.0, 1.0)
}

/// Canvas position of a screen-space overlay: the viewport center shifted by the offsets as
/// fractions of the viewport.
pub fn screen_position(config: &OverlayConfig, scene: &SceneState) -> Point {
    let vp = scene.viewport;
    let client = Point::new(
        vp.width / 2.0 + finite_or(config.offset_x, 0.0) * vp.width,
        vp.height / 2.0 + finite_or(config.offset_y, 0.0) * vp.height,
    );
    scene.canvas_from_client(client)
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/transform.rs"]
mod tests;
