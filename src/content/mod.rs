//! Uniform view over displayable content (images, video, shape batches, text and HTML) and
//! the host loader that produces and releases it.

pub(crate) mod live;
pub(crate) mod source;

pub use live::{LiveStream, PlaybackOpts, StreamHandle};
pub use source::{ChildSlot, Content, ContentLoader, ContentSource, ShapeBatch, TextureHandle};
