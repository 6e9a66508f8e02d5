//! Post-processing filters: a registry of constructible filter descriptors and the per-node
//! pipeline that keeps engine-owned filters apart from externally applied ones.

pub(crate) mod pipeline;
pub(crate) mod registry;

pub use pipeline::{AppliedFilter, FilterFactory, FilterOwner, FilterPipeline, OverlayFilter};
pub use registry::{ArgStyle, FilterArgs, FilterDescriptor, FilterRegistry};
