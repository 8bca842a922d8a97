//! Player window: state machine and event wiring
//!
//! **Architecture**: ShellApp owns the engine behind the [`PlaybackEngine`]
//! trait and mirrors engine state into the widgets; it keeps no independent
//! copy of playback state beyond the paused flag and the slider value.
//!
//! # State Machine
//!
//! Two observable states: {Stopped/Paused, Playing}. Transitions:
//! - Play/Pause button: toggle
//! - Stop button: force Stopped
//! - File open (menu / drag-and-drop / CLI): load, then auto-play
//! - Poll tick: force Stopped when playback naturally ended
//!
//! # Poll
//!
//! While Playing, a 100ms tick mirrors engine position into the slider and
//! detects end-of-stream. Implemented as a recurring repaint request, not a
//! thread; the tick body lives in [`ShellApp::poll`] so tests drive it
//! directly.

use std::path::{Path, PathBuf};
use std::time::Duration;

use eframe::egui;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::engine::{clamp_volume, EngineError, PlaybackEngine};
use crate::ui::{self, UiAction, SLIDER_MAX};
use crate::utils::media;

/// Poll period while playing, in seconds.
const POLL_INTERVAL: f64 = 0.1;

/// Default volume applied on first run.
pub const DEFAULT_VOLUME: i32 = 50;

/// Settings persisted through eframe storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub volume: i32,
    pub last_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            last_dir: None,
        }
    }
}

/// Main application window, generic over the engine so tests can drive a
/// scripted one.
pub struct ShellApp<E: PlaybackEngine> {
    engine: E,
    /// User paused explicitly (as opposed to playback ending on its own).
    is_paused: bool,
    /// Position poll running; implies the Playing state in the UI.
    poll_active: bool,
    last_poll: f64,
    /// Position slider value in 0..=SLIDER_MAX, mirrored from the engine.
    slider_pos: u32,
    volume: i32,
    last_dir: Option<PathBuf>,
    error_msg: Option<String>,
    /// Set when play() found no media; opens the file dialog next frame.
    request_open_dialog: bool,
    /// Window title to apply on the next update.
    pending_title: Option<String>,
}

impl<E: PlaybackEngine> ShellApp<E> {
    pub fn new(engine: E, settings: Settings) -> Self {
        let mut app = Self {
            engine,
            is_paused: false,
            poll_active: false,
            last_poll: 0.0,
            slider_pos: 0,
            volume: clamp_volume(settings.volume),
            last_dir: settings.last_dir,
            error_msg: None,
            request_open_dialog: false,
            pending_title: None,
        };
        app.engine.set_volume(app.volume);
        app
    }

    /// Settings snapshot for persistence.
    pub fn settings(&self) -> Settings {
        Settings {
            volume: self.volume,
            last_dir: self.last_dir.clone(),
        }
    }

    /// Playing as far as the UI is concerned (button label, poll).
    pub fn is_playing_ui(&self) -> bool {
        self.poll_active && !self.is_paused
    }

    /// Status line label for the current state.
    pub fn state_label(&self) -> &'static str {
        if self.is_playing_ui() {
            "Playing"
        } else if self.is_paused {
            "Paused"
        } else {
            "Stopped"
        }
    }

    pub fn slider_pos(&self) -> u32 {
        self.slider_pos
    }

    pub fn volume(&self) -> i32 {
        self.volume
    }

    pub fn error_msg(&self) -> Option<&String> {
        self.error_msg.as_ref()
    }

    pub fn pending_title(&self) -> Option<&String> {
        self.pending_title.as_ref()
    }

    pub fn open_dialog_requested(&self) -> bool {
        self.request_open_dialog
    }

    /// Play/Pause toggle. Playing → pause and stop the poll; otherwise try
    /// to play. With no media loaded this requests the file dialog instead.
    pub fn play_pause(&mut self) {
        if self.engine.is_playing() {
            self.engine.pause();
            self.is_paused = true;
            self.poll_active = false;
        } else {
            match self.engine.play() {
                Ok(()) => {
                    self.is_paused = false;
                    self.poll_active = true;
                    self.error_msg = None;
                }
                Err(EngineError::NoMedia) => {
                    debug!("play without media, requesting file dialog");
                    self.request_open_dialog = true;
                }
                Err(e) => {
                    error!("play failed: {e}");
                    self.error_msg = Some(e.to_string());
                }
            }
        }
    }

    /// Stop button: halt playback, reset the slider, label goes back to Play.
    pub fn stop(&mut self) {
        self.engine.stop();
        self.is_paused = false;
        self.poll_active = false;
        self.slider_pos = 0;
    }

    /// Load a media file and auto-transition to Playing. A failed load
    /// surfaces in the status line and leaves playback state untouched.
    pub fn open_path(&mut self, path: &Path) {
        match self.engine.load(path) {
            Ok(info) => {
                let title = info.title.unwrap_or_else(|| {
                    path.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string())
                });
                info!("loaded {} ({title})", path.display());
                self.pending_title = Some(title);
                self.last_dir = path.parent().map(PathBuf::from);
                self.error_msg = None;
                self.slider_pos = 0;
                self.is_paused = false;
                self.poll_active = false;
                self.play_pause();
            }
            Err(e) => {
                error!("failed to load {}: {e}", path.display());
                self.error_msg = Some(format!("{}: {e}", path.display()));
            }
        }
    }

    /// Poll tick body: mirror engine position into the slider and force
    /// Stopped when playback ended without an explicit pause.
    pub fn poll(&mut self) {
        if !self.poll_active {
            return;
        }
        self.slider_pos = (self.engine.position() * SLIDER_MAX as f32).round() as u32;
        if let Some(err) = self.engine.take_error() {
            self.error_msg = Some(err);
        }
        if !self.engine.is_playing() {
            self.poll_active = false;
            if !self.is_paused {
                self.stop();
            }
        }
    }

    /// Slider drag: write `value / 1000` to the engine.
    pub fn seek(&mut self, value: u32) {
        self.slider_pos = value.min(SLIDER_MAX);
        self.engine
            .set_position(self.slider_pos as f32 / SLIDER_MAX as f32);
    }

    pub fn set_volume(&mut self, volume: i32) {
        self.volume = clamp_volume(volume);
        self.engine.set_volume(self.volume);
    }

    fn apply_action(&mut self, action: UiAction, ctx: &egui::Context) {
        match action {
            UiAction::PlayPause => self.play_pause(),
            UiAction::Stop => self.stop(),
            UiAction::Seek(value) => self.seek(value),
            UiAction::SetVolume(volume) => self.set_volume(volume),
            UiAction::OpenFile => self.request_open_dialog = true,
            UiAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }

    /// Show the file dialog and load the selection; cancel leaves state
    /// unchanged.
    fn open_file_dialog(&mut self) {
        self.request_open_dialog = false;
        let mut dialog = ui::create_media_dialog("Choose Media File");
        if let Some(dir) = &self.last_dir {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.pick_file() {
            self.open_path(&path);
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        for path in dropped {
            if media::is_media(&path) {
                info!("file dropped: {}", path.display());
                self.open_path(&path);
                break;
            }
            warn!("ignoring dropped non-media file: {}", path.display());
        }
    }

    fn handle_keyboard_input(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.play_pause();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape) || i.key_pressed(egui::Key::Q)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    /// Run the 100ms poll off egui's repaint clock while playing.
    fn schedule_poll(&mut self, ctx: &egui::Context) {
        if !self.poll_active {
            return;
        }
        let now = ctx.input(|i| i.time);
        if now - self.last_poll >= POLL_INTERVAL {
            self.last_poll = now;
            self.poll();
        }
        ctx.request_repaint_after(Duration::from_secs_f64(POLL_INTERVAL));
    }

    /// Hand the video surface placement to the engine, in physical pixels.
    fn place_video_output(&mut self, ctx: &egui::Context, rect: egui::Rect) {
        let ppp = ctx.pixels_per_point();
        self.engine.set_render_rect(
            (rect.min.x * ppp).round() as i32,
            (rect.min.y * ppp).round() as i32,
            (rect.width() * ppp).round() as i32,
            (rect.height() * ppp).round() as i32,
        );
    }
}

impl<E: PlaybackEngine> eframe::App for ShellApp<E> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions: Vec<UiAction> = Vec::new();

        if let Some(title) = self.pending_title.take() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            actions.extend(ui::render_menu_bar(ui));
        });

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            actions.extend(ui::render_position_slider(ui, &mut self.slider_pos));
            ui.add_space(4.0);
            let playing = self.is_playing_ui();
            actions.extend(ui::render_transport_row(ui, playing, &mut self.volume));
            ui.add_space(4.0);
            ui.separator();
            ui::render_status_line(
                ui,
                self.engine.media_title(),
                self.state_label(),
                self.volume,
                self.error_msg.as_ref(),
            );
            ui.add_space(2.0);
        });

        // Video surface: black central panel, engine renders into it via
        // the window overlay. Double-click opens the file dialog.
        let mut video_rect = None;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let panel_rect = ui.max_rect();
                video_rect = Some(panel_rect);

                let response = ui.interact(
                    panel_rect,
                    ui.id().with("video_surface"),
                    egui::Sense::click(),
                );
                if response.double_clicked() {
                    actions.push(UiAction::OpenFile);
                }

                if !self.engine.has_media() {
                    ui.centered_and_justified(|ui| {
                        ui.label("Drag'n'drop a media file here or use File → Load Video");
                    });
                }
            });

        for action in actions {
            self.apply_action(action, ctx);
        }

        self.handle_keyboard_input(ctx);
        self.handle_dropped_files(ctx);

        if self.request_open_dialog {
            self.open_file_dialog();
        }

        if let Some(rect) = video_rect {
            self.place_video_output(ctx, rect);
        }

        self.schedule_poll(ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Ok(json) = serde_json::to_string(&self.settings()) {
            storage.set_string(eframe::APP_KEY, json);
            debug!("settings saved: volume={}", self.volume);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockEngine;

    fn app_with_mock(engine: MockEngine) -> ShellApp<MockEngine> {
        ShellApp::new(engine, Settings::default())
    }

    #[test]
    fn test_open_valid_file_plays_and_sets_title() {
        let mut app = app_with_mock(MockEngine::new());

        app.open_path(Path::new("/media/holiday.mp4"));

        assert!(app.is_playing_ui());
        assert_eq!(app.pending_title(), Some(&"holiday".to_string()));
        assert_eq!(app.state_label(), "Playing");
    }

    #[test]
    fn test_play_pause_toggles_and_controls_poll() {
        let mut app = app_with_mock(MockEngine::new());
        app.open_path(Path::new("/media/clip.mkv"));
        assert!(app.poll_active);

        app.play_pause();
        assert_eq!(app.state_label(), "Paused");
        assert!(!app.poll_active, "pausing must stop the poll");

        app.play_pause();
        assert_eq!(app.state_label(), "Playing");
        assert!(app.poll_active, "resuming must restart the poll");
    }

    #[test]
    fn test_volume_is_clamped_before_reaching_engine() {
        let mut app = app_with_mock(MockEngine::new());

        app.set_volume(250);
        assert_eq!(app.volume(), 100);

        app.set_volume(-10);
        assert_eq!(app.volume(), 0);

        // The engine only ever sees clamped values (the construction-time
        // default is forwarded first).
        assert_eq!(app.engine.volume_sets, vec![DEFAULT_VOLUME, 100, 0]);
    }

    #[test]
    fn test_slider_drag_sets_exact_fraction() {
        let mut engine = MockEngine::new();
        engine.media = Some(PathBuf::from("/media/clip.mp4"));
        let mut app = app_with_mock(engine);

        app.seek(250);
        app.seek(1000);

        assert_eq!(app.engine.seeks, vec![0.25, 1.0]);
    }

    #[test]
    fn test_natural_end_forces_stopped() {
        let mut app = app_with_mock(MockEngine::new());
        app.open_path(Path::new("/media/clip.mp4"));
        assert!(app.is_playing_ui());

        // Engine reports playback ended on its own (no explicit pause).
        app.engine.playing = false;
        app.poll();

        assert_eq!(app.state_label(), "Stopped");
        assert!(!app.poll_active);
        assert_eq!(app.slider_pos(), 0);
    }

    #[test]
    fn test_paused_playback_is_not_forced_to_stopped() {
        let mut app = app_with_mock(MockEngine::new());
        app.open_path(Path::new("/media/clip.mp4"));

        app.play_pause(); // pause
        app.poll_active = true; // simulate a stray tick racing the pause
        app.poll();

        assert_eq!(app.state_label(), "Paused");
        assert_eq!(app.engine.stop_calls, 0);
    }

    #[test]
    fn test_poll_surfaces_async_engine_error() {
        let mut app = app_with_mock(MockEngine::new());
        app.open_path(Path::new("/media/clip.mp4"));

        app.engine.async_error = Some("decoder choked".to_string());
        app.poll();

        assert_eq!(app.error_msg(), Some(&"decoder choked".to_string()));
        // Still playing: an async error report alone does not change state.
        assert_eq!(app.state_label(), "Playing");
    }

    #[test]
    fn test_play_without_media_requests_dialog() {
        let mut app = app_with_mock(MockEngine::new());

        app.play_pause();

        assert!(app.open_dialog_requested());
        assert_eq!(app.state_label(), "Stopped");
    }

    #[test]
    fn test_failed_load_surfaces_error_and_keeps_state() {
        let mut engine = MockEngine::new();
        engine.fail_load = true;
        let mut app = app_with_mock(engine);

        app.open_path(Path::new("/media/broken.avi"));

        assert!(app.error_msg().is_some());
        assert!(!app.is_playing_ui());
        assert!(app.pending_title().is_none());
    }

    #[test]
    fn test_open_remembers_directory_and_replaces_media() {
        let mut app = app_with_mock(MockEngine::new());

        app.open_path(Path::new("/media/a.mp4"));
        app.open_path(Path::new("/other/b.mp3"));

        let settings = app.settings();
        assert_eq!(settings.last_dir, Some(PathBuf::from("/other")));
        assert_eq!(app.engine.media, Some(PathBuf::from("/other/b.mp3")));
    }
}
