use serde::Serialize;

use crate::content::{ChildSlot, TextureHandle};
use crate::effects::{AppliedFilter, OverlayFilter};
use crate::foundation::core::{Point, Rgb8, Size, Vec2};
use crate::interaction::EventMode;
use crate::resolve::{ResolvedTransform, ShapesPlacement, ZOrder};

/// Screen box of embedded HTML content, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct HtmlBox {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Displayed width.
    pub width: f64,
    /// Displayed height.
    pub height: f64,
    /// Rotation in degrees.
    pub angle: f64,
}

/// Mutable render properties of one overlay.
#[derive(Debug)]
pub struct RenderNode {
    /// Displayed texture.
    pub texture: TextureHandle,
    /// Content size in texture pixels.
    pub size: Size,
    /// Position in canvas space.
    pub position: Point,
    /// Scale (negative when mirrored).
    pub scale: Vec2,
    /// Rotation in degrees.
    pub angle: f64,
    /// Opacity.
    pub alpha: f64,
    /// Tint.
    pub tint: Rgb8,
    /// Pivot.
    pub pivot: Vec2,
    /// Anchor.
    pub anchor: Vec2,
    /// Filters in application order, engine and external.
    pub filters: Vec<AppliedFilter>,
    /// Sort keys.
    pub z_order: ZOrder,
    /// Pointer event participation.
    pub event_mode: EventMode,
    /// Shape batch placement.
    pub shapes: Option<ShapesPlacement>,
    /// Box of embedded HTML content.
    pub html_box: Option<HtmlBox>,
    /// Where child overlays are attached.
    pub child_slot: ChildSlot,
}

impl RenderNode {
    pub(crate) fn new(texture: TextureHandle, size: Size, child_slot: ChildSlot) -> Self {
        Self {
            texture,
            size,
            position: Point::ORIGIN,
            scale: Vec2::new(1.0, 1.0),
            angle: 0.0,
            alpha: 1.0,
            tint: Rgb8::WHITE,
            pivot: Vec2::ZERO,
            anchor: Vec2::new(0.5, 0.5),
            filters: Vec::new(),
            z_order: ZOrder::default(),
            event_mode: EventMode::None,
            shapes: None,
            html_box: None,
            child_slot,
        }
    }

    /// Write a resolved transform. A `None` angle keeps the current one.
    pub(crate) fn apply(&mut self, t: &ResolvedTransform) {
        self.position = t.position;
        self.scale = t.scale;
        self.pivot = t.pivot;
        self.anchor = t.anchor;
        if let Some(angle) = t.angle {
            self.angle = angle;
        }
        self.tint = t.tint;
        self.alpha = t.alpha;
        self.shapes = t.shapes;
    }

    /// Displayed size (absolute scale times content size).
    pub fn displayed_size(&self) -> Size {
        Size::new(
            self.size.width * self.scale.x.abs(),
            self.size.height * self.scale.y.abs(),
        )
    }

    /// Box an HTML element must occupy to line up with this node.
    pub fn compute_html_box(&self) -> HtmlBox {
        let d = self.displayed_size();
        HtmlBox {
            left: self.position.x - self.pivot.x * self.scale.x - d.width * self.anchor.x,
            top: self.position.y - self.pivot.y * self.scale.y - d.height * self.anchor.y,
            width: d.width,
            height: d.height,
            angle: self.angle,
        }
    }

    /// Attach a filter owned by code outside the engine.
    pub fn push_external_filter(&mut self, id: impl Into<String>, filter: Box<dyn OverlayFilter>) {
        self.filters.push(AppliedFilter::external(id, filter));
    }

    /// Engine-owned filters.
    pub fn engine_filters(&self) -> impl Iterator<Item = &AppliedFilter> {
        self.filters.iter().filter(|f| f.is_engine())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/node.rs"]
mod tests;
