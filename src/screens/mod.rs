pub mod player_bar;
pub mod playlist;

pub use player_bar::render_player_bar;
pub use playlist::{render_playlist_view, RowAction};
