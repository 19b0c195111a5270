use crate::app::player_app::PlaylistApp;
use crate::constants::ROW_HEIGHT;
use crate::models::PlaylistEntry;
use crate::state::{LoadState, RowControl};
use egui::{Color32, RichText};
use std::time::Instant;

/// Click reported by a playlist row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Play(usize),
    Pause(usize),
}

impl RowAction {
    /// Action a row's single button triggers given the control it shows
    pub fn for_control(row: usize, control: RowControl) -> Self {
        match control {
            RowControl::Play => RowAction::Play(row),
            RowControl::Pause => RowAction::Pause(row),
        }
    }
}

/// Playlist screen - header, feed status and the virtualized row list
pub fn render_playlist_view(app: &mut PlaylistApp, ui: &mut egui::Ui) {
    ui.add_space(12.0);

    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Playlist")
                .size(22.0)
                .color(Color32::WHITE)
                .strong(),
        );

        if !app.entries.is_empty() {
            ui.add_space(10.0);
            ui.label(
                RichText::new(format!("({} tracks)", app.entries.len()))
                    .size(14.0)
                    .color(Color32::GRAY),
            );
        }
    });

    ui.add_space(10.0);

    match &app.ui.load_state {
        LoadState::Loading => {
            render_loading_state(ui);
            return;
        }
        LoadState::Failed(error) => {
            let retry = render_error_state(ui, error);
            if retry {
                app.start_playlist_load();
            }
            return;
        }
        LoadState::Loaded => {}
    }

    if app.entries.is_empty() {
        render_empty_state(ui);
        return;
    }

    let mut action = None;
    let output = egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show_rows(ui, ROW_HEIGHT, app.entries.len(), |ui, row_range| {
            for row in row_range.clone() {
                if let Some(entry) = app.entries.get(row) {
                    let control = app.playback.control_for(row);
                    if let Some(clicked) = render_row(ui, row, entry, control) {
                        action = Some(clicked);
                    }
                }
            }
            row_range
        });

    // Rows outside this range were not laid out this frame
    app.update_visible_rows(output.inner);

    if let Some(action) = action {
        log::debug!("[Playlist] Row action: {:?}", action);
        app.handle_row_action(action, Instant::now());
    }
}

/// One row: play/pause button, title and artist, duration label.
/// Pure renderer; returns the click instead of acting on it.
fn render_row(
    ui: &mut egui::Ui,
    row: usize,
    entry: &PlaylistEntry,
    control: RowControl,
) -> Option<RowAction> {
    let mut action = None;
    let size = egui::vec2(ui.available_width(), ROW_HEIGHT);

    ui.allocate_ui_with_layout(
        size,
        egui::Layout::left_to_right(egui::Align::Center),
        |ui| {
            ui.set_min_size(size);
            ui.add_space(8.0);

            let (icon, hover) = match control {
                RowControl::Play => ("▶", "Play"),
                RowControl::Pause => ("⏸", "Pause"),
            };
            let button = egui::Button::new(RichText::new(icon).size(18.0))
                .min_size(egui::vec2(40.0, 40.0));
            if ui.add(button).on_hover_text(hover).clicked() {
                action = Some(RowAction::for_control(row, control));
            }

            ui.add_space(10.0);

            let title_color = match control {
                RowControl::Pause => Color32::from_rgb(255, 85, 0),
                RowControl::Play => Color32::WHITE,
            };

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_space(12.0);
                ui.label(
                    RichText::new(&entry.duration_label)
                        .size(13.0)
                        .color(Color32::GRAY),
                );
                ui.add_space(10.0);

                ui.with_layout(egui::Layout::top_down(egui::Align::LEFT), |ui| {
                    ui.add_space(8.0);
                    ui.add(
                        egui::Label::new(
                            RichText::new(&entry.title)
                                .size(15.0)
                                .color(title_color)
                                .strong(),
                        )
                        .truncate(),
                    );
                    ui.add(
                        egui::Label::new(
                            RichText::new(&entry.artist)
                                .size(13.0)
                                .color(Color32::GRAY),
                        )
                        .truncate(),
                    );
                });
            });
        },
    );

    action
}

fn render_loading_state(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(100.0);
        ui.spinner();
        ui.add_space(10.0);
        ui.label(
            RichText::new("Loading playlist...")
                .size(16.0)
                .color(Color32::GRAY),
        );
    });
}

/// Returns true when Retry was clicked
fn render_error_state(ui: &mut egui::Ui, error: &str) -> bool {
    let mut retry = false;

    ui.vertical_centered(|ui| {
        ui.add_space(100.0);
        ui.label(
            RichText::new("Could not load playlist")
                .size(20.0)
                .color(Color32::from_rgb(255, 100, 100)),
        );
        ui.add_space(10.0);
        ui.label(
            RichText::new(error)
                .size(14.0)
                .color(Color32::from_rgb(180, 180, 180)),
        );
        ui.add_space(20.0);
        retry = ui.button("Retry").clicked();
    });

    retry
}

fn render_empty_state(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(100.0);
        ui.label(
            RichText::new("Playlist is empty")
                .size(20.0)
                .color(Color32::GRAY),
        );
        ui.add_space(10.0);
        ui.label(
            RichText::new("The feed returned no songs")
                .size(14.0)
                .color(Color32::DARK_GRAY),
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_action_follows_control() {
        assert_eq!(RowAction::Play(3), RowAction::for_control(3, RowControl::Play));
        assert_eq!(RowAction::Pause(0), RowAction::for_control(0, RowControl::Pause));
    }
}
