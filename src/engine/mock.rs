//! Scripted engine for UI shell tests.

use std::path::{Path, PathBuf};

use super::{clamp_volume, EngineError, MediaInfo, PlaybackEngine};

/// In-memory engine that records every facade call.
#[derive(Debug, Default)]
pub struct MockEngine {
    pub media: Option<PathBuf>,
    pub title: Option<String>,
    pub playing: bool,
    pub position: f32,
    pub volume: i32,
    /// Every fraction passed to `set_position`, in order.
    pub seeks: Vec<f32>,
    pub stop_calls: usize,
    /// Every raw value passed to `set_volume`, in order.
    pub volume_sets: Vec<i32>,
    /// Force the next `load` to fail.
    pub fail_load: bool,
    /// Handed out once by `take_error`.
    pub async_error: Option<String>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlaybackEngine for MockEngine {
    fn load(&mut self, path: &Path) -> Result<MediaInfo, EngineError> {
        if self.fail_load {
            return Err(EngineError::Load(format!("{}: boom", path.display())));
        }
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned());
        self.media = Some(path.to_path_buf());
        self.title = title.clone();
        self.playing = false;
        self.position = 0.0;
        Ok(MediaInfo { title })
    }

    fn play(&mut self) -> Result<(), EngineError> {
        if self.media.is_none() {
            return Err(EngineError::NoMedia);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn stop(&mut self) {
        self.playing = false;
        self.position = 0.0;
        self.stop_calls += 1;
    }

    fn is_playing(&mut self) -> bool {
        self.playing
    }

    fn position(&mut self) -> f32 {
        self.position
    }

    fn set_position(&mut self, fraction: f32) {
        let fraction = fraction.clamp(0.0, 1.0);
        self.seeks.push(fraction);
        self.position = fraction;
    }

    fn volume(&self) -> i32 {
        self.volume
    }

    fn set_volume(&mut self, volume: i32) {
        self.volume_sets.push(volume);
        self.volume = clamp_volume(volume);
    }

    fn has_media(&self) -> bool {
        self.media.is_some()
    }

    fn media_title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn take_error(&mut self) -> Option<String> {
        self.async_error.take()
    }
}
