//! The composition root: overlay nodes, their lifecycle state machine, and the layer that
//! owns them together with the host collaborators.

pub(crate) mod layer;
pub(crate) mod node;

pub use layer::{Host, LayerOpts, OverlayLayer};
pub use node::{NodeState, OverlayNode, RefreshOpts, SetTextureOpts};
