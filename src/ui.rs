//! Control widgets for the player window
//!
//! Rendering only: every widget returns [`UiAction`]s and the app layer
//! applies them to the engine. Nothing in here touches playback state.

use eframe::egui;

use crate::utils::media;

/// Position slider resolution: the engine sees `value / SLIDER_MAX`.
pub const SLIDER_MAX: u32 = 1000;

/// User intents produced by the control widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    PlayPause,
    Stop,
    /// Slider dragged to a value in 0..=SLIDER_MAX.
    Seek(u32),
    SetVolume(i32),
    OpenFile,
    Quit,
}

/// Create configured file dialog for media selection
pub fn create_media_dialog(title: &str) -> rfd::FileDialog {
    rfd::FileDialog::new()
        .add_filter("Media Files", media::ALL_EXTS)
        .set_title(title)
}

/// Render the File menu bar (top panel content).
pub fn render_menu_bar(ui: &mut egui::Ui) -> Vec<UiAction> {
    let mut actions = Vec::new();

    egui::MenuBar::new().ui(ui, |ui| {
        ui.menu_button("File", |ui| {
            if ui.button("Load Video").clicked() {
                actions.push(UiAction::OpenFile);
                ui.close();
            }
            if ui.button("Close App").clicked() {
                actions.push(UiAction::Quit);
                ui.close();
            }
        });
    });

    actions
}

/// Render the position slider (full panel width).
///
/// Emits `Seek` while the user drags; engine position writes back into
/// `position` between drags via the poll.
pub fn render_position_slider(ui: &mut egui::Ui, position: &mut u32) -> Vec<UiAction> {
    let mut actions = Vec::new();

    ui.style_mut().spacing.slider_width = ui.available_width();
    let response = ui.add(
        egui::Slider::new(position, 0..=SLIDER_MAX)
            .show_value(false)
            .trailing_fill(true),
    );
    if response.changed() {
        actions.push(UiAction::Seek(*position));
    }
    response.on_hover_text("Position");

    actions
}

/// Render transport buttons and the volume slider in one row.
pub fn render_transport_row(ui: &mut egui::Ui, playing: bool, volume: &mut i32) -> Vec<UiAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        let play_text = if playing { "⏸ Pause" } else { "▶ Play" };
        if ui.button(play_text).clicked() {
            actions.push(UiAction::PlayPause);
        }

        if ui.button("⏹ Stop").clicked() {
            actions.push(UiAction::Stop);
        }

        // Volume lives on the right, away from the transport buttons
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let response = ui.add(
                egui::Slider::new(volume, 0..=100)
                    .show_value(false)
                    .trailing_fill(true),
            );
            if response.changed() {
                actions.push(UiAction::SetVolume(*volume));
            }
            response.on_hover_text("Volume");
            ui.label("🔊");
        });
    });

    actions
}

/// Render the status line: title, state, volume and any pending error.
pub fn render_status_line(
    ui: &mut egui::Ui,
    title: Option<&str>,
    state_label: &str,
    volume: i32,
    error_msg: Option<&String>,
) {
    ui.horizontal(|ui| {
        ui.monospace(title.unwrap_or("No media"));
        ui.separator();
        ui.monospace(state_label);
        ui.separator();
        ui.monospace(format!("Vol {volume:>3}"));
        if let Some(error) = error_msg {
            ui.separator();
            ui.colored_label(egui::Color32::RED, error);
        }
    });
}
