use crate::config::OverlayConfig;
use crate::eval::comparator::Comparator;
use crate::scene::{DetectionLevel, EntityProvider, EntityState, ViewerState};

/// Inputs of one visibility query.
#[derive(Clone, Copy)]
pub struct VisibilityInput<'a> {
    /// Configuration snapshot of the overlay.
    pub config: &'a OverlayConfig,
    /// Entity the overlay is attached to.
    pub entity: &'a EntityState,
    /// The viewing user.
    pub viewer: &'a ViewerState,
    /// Lookup for the viewer's own entity.
    pub entities: &'a dyn EntityProvider,
    /// Whether the overlay has completed at least one refresh.
    pub ready: bool,
}

/// Evaluate the visibility rule chain. The first decisive rule wins.
///
/// This is recomputed on every query; hover, control and targeting change every frame.
pub fn evaluate_visibility(input: &VisibilityInput<'_>) -> bool {
    let VisibilityInput {
        config: ov,
        entity,
        viewer,
        entities,
        ready,
    } = *input;

    if !ready || !(entity.visible || ov.always_visible) {
        return false;
    }

    if ov.limited_to_owner && !entity.is_owner {
        return false;
    }
    if !ov.limited_users.is_empty() && !ov.limited_users.iter().any(|u| *u == viewer.user_id) {
        return false;
    }

    let effect = ov.limit_effect();
    let property = ov.limit_property();
    if effect.is_some() || property.is_some() {
        let Some(speaker) = viewer.speaker.as_ref().and_then(|id| entities.entity(id)) else {
            return false;
        };
        if let Some(effect) = effect
            && !speaker.effects.iter().any(|e| e == effect)
        {
            return false;
        }
        if let Some(expr) = property {
            let holds = match Comparator::parse(expr) {
                Ok(c) => c.evaluate(speaker),
                Err(err) => {
                    tracing::trace!(%err, "limitOnProperty comparator rejected");
                    false
                }
            };
            if !holds {
                return false;
            }
        }
    }

    if entity.detection_level == DetectionLevel::Imprecise {
        return ov.imprecise_visible;
    }

    if ov.has_interaction_limits() {
        return (ov.limit_on_hover && !viewer.ruler_active && entity.hover)
            || (ov.limit_on_control && entity.controlled)
            || (ov.limit_on_highlight && viewer.highlight_objects)
            || (ov.limit_on_hud && entity.has_active_hud)
            || (ov.limit_on_any_target && !entity.targeted_by.is_empty())
            || (ov.limit_on_target && entity.targeted_by.iter().any(|u| *u == viewer.user_id));
    }

    true
}

#[cfg(test)]
#[path = "../../tests/unit/eval/visibility.rs"]
mod tests;
