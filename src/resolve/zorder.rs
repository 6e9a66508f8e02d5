use serde::Serialize;

use crate::config::OverlayConfig;
use crate::scene::EntityState;

/// Sort keys of an overlay relative to its entity's mesh.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZOrder {
    /// Sort layer shared with the entity.
    pub sort_layer: f64,
    /// Sort key.
    pub sort: f64,
    /// Elevation.
    pub elevation: f64,
    /// z-index.
    pub z_index: f64,
    /// Tie-breaker: the entity's last sorted index plus the overlay's insertion order.
    pub last_sorted_index: u32,
}

/// Derive sort keys from the entity. `offset` is the distance used to push `top` and `bottom`
/// overlays past everything else.
pub fn resolve_zorder(
    config: &OverlayConfig,
    entity: &EntityState,
    offset: f64,
    overlay_sort: u32,
) -> ZOrder {
    let sort = if config.top {
        entity.sort + offset
    } else if config.bottom {
        entity.sort - offset
    } else {
        entity.sort
    };

    let elevation = if config.bottom && entity.elevation > 0.0 {
        0.0
    } else if config.top {
        entity.elevation + offset
    } else {
        entity.elevation
    };

    let z_index = if config.ui && config.bottom {
        entity.z_index - offset
    } else {
        entity.z_index
    };

    ZOrder {
        sort_layer: entity.sort_layer,
        sort,
        elevation,
        z_index,
        last_sorted_index: entity.last_sorted_index.saturating_add(overlay_sort),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/zorder.rs"]
mod tests;
