use std::fmt;

use serde_json::{Map, Value as JsonValue};

use crate::config::OverlayConfig;
use crate::effects::registry::{ArgStyle, FilterArgs, FilterDescriptor, FilterRegistry};

/// Capability surface of a constructed filter instance.
pub trait OverlayFilter: fmt::Debug {
    /// Current uniform values.
    fn uniforms(&self) -> &Map<String, JsonValue>;

    /// Apply new option values in place.
    fn update(&mut self, options: &Map<String, JsonValue>);
}

/// Host-side filter construction.
pub trait FilterFactory {
    /// Construct filter `id`, or `None` when the host has no such filter.
    fn construct(&mut self, id: &str, args: FilterArgs) -> Option<Box<dyn OverlayFilter>>;
}

/// Who put a filter on a render node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOwner {
    /// Managed by the overlay engine; replaced on reconfiguration.
    Engine,
    /// Applied by unrelated code; never touched by the engine.
    External,
}

/// A filter attached to a render node.
#[derive(Debug)]
pub struct AppliedFilter {
    /// Owner tag.
    pub owner: FilterOwner,
    /// Filter identifier.
    pub id: String,
    /// Filter instance.
    pub filter: Box<dyn OverlayFilter>,
}

impl AppliedFilter {
    /// Tag a filter as externally owned.
    pub fn external(id: impl Into<String>, filter: Box<dyn OverlayFilter>) -> Self {
        Self {
            owner: FilterOwner::External,
            id: id.into(),
            filter,
        }
    }

    /// Whether the engine owns this filter.
    pub fn is_engine(&self) -> bool {
        self.owner == FilterOwner::Engine
    }
}

/// Tracks whether a node's engine filters reflect its configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterPipeline {
    applied: bool,
}

impl FilterPipeline {
    /// Whether filters should be (re)applied on this refresh.
    pub fn needs_apply(&self, full_refresh: bool, force: bool) -> bool {
        full_refresh && (force || !self.applied)
    }

    /// Force re-application on the next full refresh.
    pub fn mark_stale(&mut self) {
        self.applied = false;
    }

    /// Rebuild the engine-owned filters in `filters` from `config`.
    ///
    /// External filters keep their relative order. An absent or unconstructible filter leaves
    /// no engine filter behind.
    pub fn apply(
        &mut self,
        config: &OverlayConfig,
        registry: &FilterRegistry,
        factory: &mut dyn FilterFactory,
        filters: &mut Vec<AppliedFilter>,
    ) {
        self.applied = true;

        let Some(id) = config.filter_id() else {
            clear_engine(filters);
            return;
        };

        let fallback = FilterDescriptor::default();
        let descriptor = registry.get(id).unwrap_or(&fallback);
        let options = descriptor.merged_options(&config.filter_options);

        if descriptor.arg_style == ArgStyle::Options
            && let Some(existing) = filters.iter_mut().find(|f| f.is_engine() && f.id == id)
        {
            existing.filter.update(&options);
            tracing::trace!(filter = id, "engine filter updated in place");
            return;
        }

        match factory.construct(id, descriptor.build_args(&options)) {
            Some(filter) => {
                clear_engine(filters);
                filters.push(AppliedFilter {
                    owner: FilterOwner::Engine,
                    id: id.to_owned(),
                    filter,
                });
                tracing::debug!(filter = id, "engine filter applied");
            }
            None => {
                tracing::warn!(filter = id, "unknown filter; clearing engine filters");
                clear_engine(filters);
            }
        }
    }
}

fn clear_engine(filters: &mut Vec<AppliedFilter>) {
    filters.retain(|f| !f.is_engine());
}

#[cfg(test)]
#[path = "../../tests/unit/effects/pipeline.rs"]
mod tests;
