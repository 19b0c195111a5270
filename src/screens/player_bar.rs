use crate::app::player_app::PlaylistApp;
use crate::utils::formatting::format_progress;
use egui::{Color32, RichText};

const TIME_LABEL_WIDTH: f32 = 120.0;

/// Bottom bar: active track, seek bar with time label, playback errors
pub fn render_player_bar(app: &mut PlaylistApp, ui: &mut egui::Ui) {
    ui.add_space(8.0);

    match app.active_entry() {
        Some(entry) => {
            ui.horizontal(|ui| {
                ui.add(
                    egui::Label::new(
                        RichText::new(&entry.title)
                            .size(15.0)
                            .color(Color32::WHITE)
                            .strong(),
                    )
                    .truncate(),
                );
                ui.label(
                    RichText::new(&entry.artist)
                        .size(13.0)
                        .color(Color32::from_rgb(255, 85, 0)),
                );
            });
        }
        None => {
            ui.label(
                RichText::new("Nothing playing")
                    .size(15.0)
                    .color(Color32::GRAY),
            );
        }
    }

    ui.add_space(4.0);
    render_seek_row(app, ui);

    if let Some(error) = app.playback.last_error().map(str::to_owned) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(error)
                    .size(13.0)
                    .color(Color32::from_rgb(255, 100, 100)),
            );
            if ui.small_button("✖").on_hover_text("Dismiss").clicked() {
                app.playback.clear_error();
            }
        });
    }

    ui.add_space(8.0);
}

fn render_seek_row(app: &mut PlaylistApp, ui: &mut egui::Ui) {
    let seek_bar = app.playback.seek_bar();
    let loaded = app.playback.state().active_row().is_some();
    let mut value = app.ui.seek_drag_ms.unwrap_or(seek_bar.position_ms);

    ui.horizontal(|ui| {
        ui.spacing_mut().slider_width = (ui.available_width() - TIME_LABEL_WIDTH).max(60.0);

        let slider = egui::Slider::new(&mut value, 0..=seek_bar.max_ms).show_value(false);
        let response = ui.add_enabled(loaded && seek_bar.max_ms > 0, slider);

        // Hold the drag value locally; the stream is only re-opened on release
        if response.dragged() {
            app.ui.seek_drag_ms = Some(value);
        }
        if response.drag_stopped() || (response.changed() && !response.dragged()) {
            app.ui.seek_drag_ms = None;
            log::debug!("[PlayerBar] Seek to {}ms", value);
            app.playback.seek(value);
        }

        let label = match app.ui.seek_drag_ms {
            Some(drag) => format_progress(drag, seek_bar.max_ms),
            None => app.playback.time_label().to_string(),
        };
        ui.label(RichText::new(label).monospace().color(Color32::LIGHT_GRAY));
    });
}
