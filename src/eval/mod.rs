//! Per-query evaluators: the visibility rule chain and the property comparator it uses.

pub(crate) mod comparator;
pub(crate) mod visibility;

pub use comparator::{CompareOp, Comparator};
pub use visibility::{VisibilityInput, evaluate_visibility};
