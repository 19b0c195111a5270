// Playlist feed client

pub mod playlist;

// Re-export commonly used functions
pub use playlist::load_playlist;
