pub mod playback;
pub mod player_app;

pub use playback::PlaybackController;
pub use player_app::PlaylistApp;
