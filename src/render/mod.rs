//! The renderable node the engine writes on each refresh; the host composites it.

pub(crate) mod node;

pub use node::{HtmlBox, RenderNode};
