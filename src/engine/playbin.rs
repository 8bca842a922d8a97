//! GStreamer playbin implementation of the engine boundary
//!
//! playbin owns decoding, audio output and video rendering; this module
//! only translates facade calls into pipeline state changes, seeks and
//! property writes. Metadata is extracted synchronously with the pbutils
//! Discoverer before the uri is handed to the pipeline, so `load` rejects
//! unreadable/unsupported files up front instead of failing mid-playback.

use std::path::{Path, PathBuf};

use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_pbutils as gst_pbutils;
use gstreamer_video as gst_video;
use gstreamer_video::prelude::*;
use log::{debug, warn};
use raw_window_handle::{HasWindowHandle, RawWindowHandle};

use super::{clamp_volume, EngineError, MediaInfo, PlaybackEngine};

/// Discoverer timeout for metadata extraction.
const PARSE_TIMEOUT_SECS: u64 = 5;

/// The media reference currently loaded into the pipeline.
///
/// Owned exclusively by the engine; replaced wholesale on the next `load`.
#[derive(Debug, Clone)]
struct MediaRef {
    path: PathBuf,
    title: Option<String>,
}

/// Playback engine over a GStreamer `playbin` pipeline.
pub struct PlaybinEngine {
    playbin: gst::Element,
    media: Option<MediaRef>,
    /// Native window handle for video output, when the platform exposes one.
    window_handle: Option<usize>,
    render_rect: Option<(i32, i32, i32, i32)>,
    volume: i32,
    /// End-of-stream seen on the bus; cleared by play/seek/load.
    eos: bool,
    /// Last asynchronous pipeline error, handed to the UI once.
    async_error: Option<String>,
}

impl PlaybinEngine {
    /// Initialize GStreamer and build an empty playbin pipeline.
    pub fn new() -> Result<Self, EngineError> {
        gst::init()?;
        let playbin = gst::ElementFactory::make("playbin").build()?;

        Ok(Self {
            playbin,
            media: None,
            window_handle: None,
            render_rect: None,
            volume: 0,
            eos: false,
            async_error: None,
        })
    }

    /// Bind video output to a native window handle.
    ///
    /// Must be called before playback starts; playbin routes its video sink
    /// into the given surface, clipped by [`set_render_rect`] afterwards.
    ///
    /// [`set_render_rect`]: PlaybackEngine::set_render_rect
    pub fn attach_window(&mut self, window: &dyn HasWindowHandle) {
        match native_window_handle(window) {
            Some(handle) => {
                debug!("binding video output to window handle {handle:#x}");
                self.window_handle = Some(handle);
                if let Some(overlay) = self.overlay() {
                    unsafe { overlay.set_window_handle(handle) };
                }
            }
            None => {
                // Wayland and friends: playbin opens its own video window.
                warn!("no embeddable window handle on this platform, video opens in a separate window");
            }
        }
    }

    fn overlay(&self) -> Option<&gst_video::VideoOverlay> {
        self.playbin.dynamic_cast_ref::<gst_video::VideoOverlay>()
    }

    /// Drain pending bus messages, recording end-of-stream and errors.
    fn drain_bus(&mut self) {
        let Some(bus) = self.playbin.bus() else {
            return;
        };
        while let Some(msg) = bus.pop() {
            use gst::MessageView;
            match msg.view() {
                MessageView::Eos(..) => {
                    debug!("end of stream");
                    self.eos = true;
                }
                MessageView::Error(err) => {
                    warn!(
                        "pipeline error from {:?}: {}",
                        err.src().map(|s| s.path_string()),
                        err.error()
                    );
                    self.async_error = Some(err.error().to_string());
                    let _ = self.playbin.set_state(gst::State::Ready);
                }
                _ => {}
            }
        }
    }

    fn duration(&self) -> Option<gst::ClockTime> {
        self.playbin.query_duration::<gst::ClockTime>()
    }

    /// Path of the currently loaded media, if any.
    pub fn media_path(&self) -> Option<&Path> {
        self.media.as_ref().map(|m| m.path.as_path())
    }
}

impl PlaybackEngine for PlaybinEngine {
    fn load(&mut self, path: &Path) -> Result<MediaInfo, EngineError> {
        if !path.is_file() {
            return Err(EngineError::Load(format!(
                "{}: not a readable file",
                path.display()
            )));
        }
        let uri = glib::filename_to_uri(path, None)?;

        // Synchronous metadata parse; also the unsupported-format gate.
        let discoverer = gst_pbutils::Discoverer::new(gst::ClockTime::from_seconds(
            PARSE_TIMEOUT_SECS,
        ))?;
        let info = discoverer
            .discover_uri(&uri)
            .map_err(|e| EngineError::Load(e.to_string()))?;
        if info.result() == gst_pbutils::DiscovererResult::MissingPlugins {
            return Err(EngineError::Unsupported(path.display().to_string()));
        }
        let title = info
            .tags()
            .and_then(|tags| tags.get::<gst::tags::Title>().map(|t| t.get().to_string()));

        // Replace the current media wholesale.
        self.playbin.set_state(gst::State::Ready)?;
        self.playbin.set_property("uri", uri.as_str());
        if let Some(handle) = self.window_handle
            && let Some(overlay) = self.overlay()
        {
            unsafe { overlay.set_window_handle(handle) };
        }
        self.eos = false;
        self.async_error = None;
        self.media = Some(MediaRef {
            path: path.to_path_buf(),
            title: title.clone(),
        });

        debug!("loaded {} (title: {:?})", path.display(), title);
        Ok(MediaInfo { title })
    }

    fn play(&mut self) -> Result<(), EngineError> {
        if self.media.is_none() {
            return Err(EngineError::NoMedia);
        }
        if self.eos {
            // Natural end reached earlier: restart from the top.
            self.playbin.set_state(gst::State::Ready)?;
            self.eos = false;
        }
        self.playbin.set_state(gst::State::Playing)?;
        Ok(())
    }

    fn pause(&mut self) {
        if let Err(e) = self.playbin.set_state(gst::State::Paused) {
            warn!("pause failed: {e}");
        }
    }

    fn stop(&mut self) {
        // Ready keeps the uri set, so play() restarts from the beginning.
        if let Err(e) = self.playbin.set_state(gst::State::Ready) {
            warn!("stop failed: {e}");
        }
        self.eos = false;
    }

    fn is_playing(&mut self) -> bool {
        self.drain_bus();
        if self.eos {
            return false;
        }
        let (_, current, pending) = self.playbin.state(gst::ClockTime::ZERO);
        is_playing_state(current, pending)
    }

    fn position(&mut self) -> f32 {
        self.drain_bus();
        let pos = self.playbin.query_position::<gst::ClockTime>();
        match (pos, self.duration()) {
            (Some(p), Some(d)) if d.nseconds() > 0 => {
                (p.nseconds() as f64 / d.nseconds() as f64) as f32
            }
            _ => 0.0,
        }
    }

    fn set_position(&mut self, fraction: f32) {
        let fraction = fraction.clamp(0.0, 1.0);
        let Some(duration) = self.duration() else {
            return;
        };
        let target =
            gst::ClockTime::from_nseconds((duration.nseconds() as f64 * fraction as f64) as u64);
        if let Err(e) = self
            .playbin
            .seek_simple(gst::SeekFlags::FLUSH | gst::SeekFlags::KEY_UNIT, target)
        {
            warn!("seek to {fraction:.3} failed: {e}");
        }
        self.eos = false;
    }

    fn volume(&self) -> i32 {
        self.volume
    }

    fn set_volume(&mut self, volume: i32) {
        let volume = clamp_volume(volume);
        // playbin's volume property is linear 0.0..1.0
        self.playbin
            .set_property("volume", volume as f64 / 100.0);
        self.volume = volume;
    }

    fn has_media(&self) -> bool {
        self.media.is_some()
    }

    fn media_title(&self) -> Option<&str> {
        self.media.as_ref()?.title.as_deref()
    }

    fn take_error(&mut self) -> Option<String> {
        self.drain_bus();
        self.async_error.take()
    }

    fn set_render_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        if self.window_handle.is_none() {
            return;
        }
        let rect = (x, y, width, height);
        if self.render_rect == Some(rect) {
            return;
        }
        if let Some(overlay) = self.overlay() {
            if let Err(e) = overlay.set_render_rectangle(x, y, width, height) {
                warn!("set_render_rectangle failed: {e}");
                return;
            }
            overlay.expose();
        }
        self.render_rect = Some(rect);
    }
}

impl Drop for PlaybinEngine {
    fn drop(&mut self) {
        let _ = self.playbin.set_state(gst::State::Null);
    }
}

/// Whether a pipeline state pair counts as playing.
///
/// `set_state(Playing)` commits asynchronously: during preroll the current
/// state is still Ready/Paused with Playing pending. A pending Playing must
/// count, otherwise a poll tick during preroll reads "not playing" and
/// force-stops a file that was just opened.
fn is_playing_state(current: gst::State, pending: gst::State) -> bool {
    current == gst::State::Playing || pending == gst::State::Playing
}

/// Extract a native window handle usable by the video overlay.
///
/// Returns None on platforms without an embeddable handle (Wayland);
/// playbin then falls back to its own output window.
fn native_window_handle(window: &dyn HasWindowHandle) -> Option<usize> {
    let handle = window.window_handle().ok()?;
    match handle.as_raw() {
        RawWindowHandle::Win32(h) => Some(h.hwnd.get() as usize),
        RawWindowHandle::Xlib(h) => Some(h.window as usize),
        RawWindowHandle::AppKit(h) => Some(h.ns_view.as_ptr() as usize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_playing_counts_as_playing() {
        // Preroll: Playing requested but not yet committed.
        assert!(is_playing_state(gst::State::Ready, gst::State::Playing));
        assert!(is_playing_state(gst::State::Paused, gst::State::Playing));
        // Settled playback.
        assert!(is_playing_state(gst::State::Playing, gst::State::VoidPending));
    }

    #[test]
    fn test_settled_non_playing_states_are_not_playing() {
        assert!(!is_playing_state(gst::State::Paused, gst::State::VoidPending));
        assert!(!is_playing_state(gst::State::Ready, gst::State::VoidPending));
        assert!(!is_playing_state(gst::State::Null, gst::State::Null));
    }
}
