//! Playback engine boundary
//!
//! **Architecture**: the UI shell never talks to GStreamer directly. All
//! transport control goes through the [`PlaybackEngine`] trait, so the
//! engine can be swapped out (or mocked in tests) without touching the UI.
//!
//! **Used by**: app (UI shell), main (engine construction)

use std::path::Path;

use thiserror::Error;

pub mod playbin;

#[cfg(test)]
pub mod mock;

pub use playbin::PlaybinEngine;

/// Volume range accepted by the engine boundary (percent).
pub const VOLUME_MAX: i32 = 100;

/// Clamp a volume value to the engine's accepted range.
pub fn clamp_volume(volume: i32) -> i32 {
    volume.clamp(0, VOLUME_MAX)
}

/// Errors surfaced by the playback engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `play()` was called before any media was loaded.
    #[error("no media loaded")]
    NoMedia,
    /// The engine recognized the file but has no plugins to play it.
    #[error("unsupported media: {0}")]
    Unsupported(String),
    /// The file is unreadable or metadata extraction failed.
    #[error("failed to load media: {0}")]
    Load(String),
    #[error(transparent)]
    Glib(#[from] glib::Error),
    #[error(transparent)]
    Bool(#[from] glib::BoolError),
    #[error("engine state change failed: {0}")]
    StateChange(#[from] gstreamer::StateChangeError),
}

/// Metadata extracted by the engine when media is loaded.
#[derive(Debug, Clone, Default)]
pub struct MediaInfo {
    /// Title tag, if the container carries one.
    pub title: Option<String>,
}

/// Facade over the external playback engine.
///
/// Position is normalized to [0,1]; volume is an integer percent [0,100].
/// All calls are synchronous at the call site and return immediately.
pub trait PlaybackEngine {
    /// Load media from a filesystem path, replacing the current media
    /// wholesale. Returns once metadata extraction completes.
    fn load(&mut self, path: &Path) -> Result<MediaInfo, EngineError>;

    /// Start or resume playback. Fails with [`EngineError::NoMedia`] when
    /// nothing is loaded.
    fn play(&mut self) -> Result<(), EngineError>;

    /// Pause playback, keeping the current position.
    fn pause(&mut self);

    /// Halt playback. The media stays loaded so playback can restart from
    /// the beginning.
    fn stop(&mut self);

    /// True while the engine is actually playing and end-of-stream has not
    /// been reached.
    fn is_playing(&mut self) -> bool;

    /// Normalized playback position in [0,1]; 0.0 when unknown.
    fn position(&mut self) -> f32;

    /// Seek to a normalized position, clamped to [0,1].
    fn set_position(&mut self, fraction: f32);

    /// Last applied volume in [0,100].
    fn volume(&self) -> i32;

    /// Set volume; values outside [0,100] are clamped.
    fn set_volume(&mut self, volume: i32);

    /// Whether a media reference is currently loaded.
    fn has_media(&self) -> bool;

    /// Title of the currently loaded media, if any.
    fn media_title(&self) -> Option<&str>;

    /// Asynchronous engine failure observed since the last call, if any.
    fn take_error(&mut self) -> Option<String> {
        None
    }

    /// Place video output inside the window (physical pixels). No-op for
    /// engines without an output surface.
    fn set_render_rect(&mut self, _x: i32, _y: i32, _width: i32, _height: i32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_volume_passes_range_through() {
        assert_eq!(clamp_volume(0), 0);
        assert_eq!(clamp_volume(50), 50);
        assert_eq!(clamp_volume(100), 100);
    }

    #[test]
    fn test_clamp_volume_rejects_out_of_range() {
        assert_eq!(clamp_volume(-5), 0);
        assert_eq!(clamp_volume(140), 100);
    }
}
