mod api;
mod app;
mod config;
mod constants;
mod models;
mod screens;
mod state;
mod utils;

use app::PlaylistApp;
use config::AppConfig;
use constants::{APP_HEIGHT, APP_WIDTH};

// App version and metadata
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_NAME: &str = "StreamList";
const APP_DESCRIPTION: &str = "Playlist Player";

fn main() -> Result<(), eframe::Error> {
    // Set RUST_LOG=debug for verbose output, RUST_LOG=info for normal logs
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("winit", log::LevelFilter::Warn)
        .filter_module("egui_glow", log::LevelFilter::Warn)
        .filter_module("symphonia", log::LevelFilter::Warn)
        .init();

    log::info!("[Main] Starting {} v{}", APP_NAME, APP_VERSION);

    let config = AppConfig::from_env();
    log::info!(
        "[Main] Playlist: {} | refresh every {:?} | prepare timeout {:?}",
        config.playlist_url,
        config.refresh_interval,
        config.prepare_timeout
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("{} v{} - {}", APP_NAME, APP_VERSION, APP_DESCRIPTION))
            .with_inner_size([APP_WIDTH, APP_HEIGHT])
            .with_min_inner_size([APP_WIDTH * 0.75, APP_HEIGHT * 0.5])
            .with_resizable(true)
            .with_decorations(true),
        vsync: true,
        ..Default::default()
    };

    eframe::run_native(
        &format!("{} v{}", APP_NAME, APP_VERSION),
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            cc.egui_ctx.style_mut(|style| {
                style.interaction.selectable_labels = false;
            });
            Ok(Box::new(PlaylistApp::new(config)))
        }),
    )
}
