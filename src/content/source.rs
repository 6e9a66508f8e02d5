use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::content::live::{LiveStream, PlaybackOpts, StreamHandle};
use crate::foundation::core::Size;
use crate::foundation::error::OverlayResult;

/// Descriptor of content to display, resolved by the host's [`ContentLoader`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentSource {
    /// Static image file.
    Image {
        /// Asset path.
        path: String,
    },
    /// Video file, played as live content.
    Video {
        /// Asset path.
        path: String,
    },
    /// Rendered text label.
    Text {
        /// Label text.
        text: String,
        /// Host-specific style block.
        #[serde(default)]
        style: JsonValue,
    },
    /// Batch of vector shapes composited under one wrapper.
    Shapes {
        /// Host-specific shape list.
        shapes: JsonValue,
    },
    /// Embedded HTML.
    Html {
        /// Markup.
        html: String,
    },
}

/// Opaque host texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

/// Shape batch container that children can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeBatch {
    /// Opaque host handle.
    pub handle: u64,
    /// Composited size of the batch; overrides the texture size for layout.
    pub size: Size,
}

/// Where child overlays are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChildSlot {
    /// Directly under the overlay node.
    #[default]
    Node,
    /// Under the content's shape batch.
    Shapes,
}

/// Loaded content owned by exactly one overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    /// Texture drawn by the overlay.
    pub texture: TextureHandle,
    /// Intrinsic texture size in pixels.
    pub size: Size,
    /// Live stream backing the texture, if any.
    pub live: Option<LiveStream>,
    /// Shape batch, if any.
    pub shapes: Option<ShapeBatch>,
    /// Content is rendered as an HTML element positioned over the canvas.
    pub html: bool,
    /// The texture was generated for this overlay alone (text labels, shape renders) and is
    /// released with it.
    pub exclusive: bool,
}

impl Content {
    /// Plain image content backed by a shared texture.
    pub fn image(texture: TextureHandle, size: Size) -> Self {
        Self {
            texture,
            size,
            live: None,
            shapes: None,
            html: false,
            exclusive: false,
        }
    }

    /// Whether this content is backed by a live stream.
    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    /// Size used for layout: the shape batch override when present, else the texture size.
    pub fn layout_size(&self) -> Size {
        self.shapes.map(|s| s.size).unwrap_or(self.size)
    }

    /// Slot children attach to while this content is displayed.
    pub fn child_slot(&self) -> ChildSlot {
        if self.shapes.is_some() {
            ChildSlot::Shapes
        } else {
            ChildSlot::Node
        }
    }
}

/// Host asset layer: produces content from descriptors and owns the underlying resources.
pub trait ContentLoader {
    /// Resolve a descriptor into content.
    fn load(&mut self, source: &ContentSource) -> OverlayResult<Content>;

    /// Clone a stream so playback is independent per overlay.
    fn clone_stream(&mut self, stream: StreamHandle) -> StreamHandle;

    /// Build a texture that samples `stream`.
    fn texture_for_stream(&mut self, stream: StreamHandle) -> TextureHandle;

    /// Start or restart playback.
    fn play(&mut self, stream: StreamHandle, opts: PlaybackOpts);

    /// Stop playback.
    fn stop(&mut self, stream: StreamHandle);

    /// Release a texture.
    fn release_texture(&mut self, texture: TextureHandle);

    /// Release a shape batch and the shapes it owns.
    fn release_shapes(&mut self, shapes: &ShapeBatch);

    /// Release a stream clone.
    fn release_stream(&mut self, stream: StreamHandle);
}
