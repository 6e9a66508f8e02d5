use serde::{Deserialize, Serialize};

use crate::content::source::{ContentLoader, TextureHandle};

/// Opaque host media stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StreamHandle(pub u64);

/// Playback options handed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackOpts {
    /// Loop at the end of the stream.
    pub looping: bool,
    /// Volume in `[0, 1]`.
    pub volume: f64,
    /// Start offset in seconds.
    pub offset: f64,
}

impl PlaybackOpts {
    /// Muted playback from the start.
    pub fn muted(looping: bool) -> Self {
        Self {
            looping,
            volume: 0.0,
            offset: 0.0,
        }
    }
}

/// Playback state of live (video) content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveStream {
    /// Stream shared by every user of the source.
    pub source: StreamHandle,
    /// Per-overlay clone, present once activation started.
    pub clone: Option<StreamHandle>,
    /// Texture sampling the clone, present once the clone can play.
    pub clone_texture: Option<TextureHandle>,
    /// Current loop flag of the clone.
    pub looping: bool,
    /// Hide the overlay when the stream ends.
    pub play_once: bool,
    /// A play-once stream reached its end; terminal until content changes.
    pub ended: bool,
}

impl LiveStream {
    /// Fresh state for a shared source stream.
    pub fn new(source: StreamHandle) -> Self {
        Self {
            source,
            clone: None,
            clone_texture: None,
            looping: false,
            play_once: false,
            ended: false,
        }
    }

    /// Clone the source stream for this overlay. Returns the existing clone when already
    /// started.
    pub fn begin_activation(&mut self, loader: &mut dyn ContentLoader, play_once: bool) -> StreamHandle {
        if let Some(clone) = self.clone {
            return clone;
        }
        let clone = loader.clone_stream(self.source);
        self.clone = Some(clone);
        self.play_once = play_once;
        clone
    }

    /// The clone can play: build its texture and start muted playback.
    ///
    /// Returns the texture to display, or `None` when activation never began.
    pub fn complete_activation(
        &mut self,
        loader: &mut dyn ContentLoader,
        looping: bool,
    ) -> Option<TextureHandle> {
        let clone = self.clone?;
        let texture = match self.clone_texture {
            Some(t) => t,
            None => {
                let t = loader.texture_for_stream(clone);
                self.clone_texture = Some(t);
                t
            }
        };
        self.looping = looping && !self.play_once;
        loader.play(clone, PlaybackOpts::muted(self.looping));
        Some(texture)
    }

    /// Reconcile the clone's loop flag with the configuration on a full refresh.
    pub fn sync_loop(&mut self, loader: &mut dyn ContentLoader, want_loop: bool) {
        let Some(clone) = self.clone else {
            return;
        };
        if !self.looping && want_loop {
            loader.play(clone, PlaybackOpts::muted(true));
        } else if self.looping && !want_loop {
            loader.stop(clone);
        }
        self.looping = want_loop;
    }

    /// Record the end of a play-once stream. Returns `true` when the overlay must be hidden.
    pub fn mark_ended(&mut self) -> bool {
        if self.play_once {
            self.ended = true;
        }
        self.ended
    }

    /// Release the per-overlay clone and its texture. Idempotent.
    pub fn release(&mut self, loader: &mut dyn ContentLoader) {
        if let Some(t) = self.clone_texture.take() {
            loader.release_texture(t);
        }
        if let Some(clone) = self.clone.take() {
            loader.stop(clone);
            loader.release_stream(clone);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/live.rs"]
mod tests;
