//! Application constants and configuration defaults

// === Window ===
pub const APP_WIDTH: f32 = 520.0;
pub const APP_HEIGHT: f32 = 760.0;
pub const ROW_HEIGHT: f32 = 56.0;

// Frame pacing when nothing is playing or loading
pub const REPAINT_INTERVAL_IDLE_MILLIS: u64 = 250;
// While the feed is loading or the seek bar is held
pub const REPAINT_INTERVAL_ACTIVE_MILLIS: u64 = 100;

// === Playlist Feed ===
pub const DEFAULT_PLAYLIST_URL: &str = "http://mad.mywork.gr/get_playlist.php?t=1546";

// === Playback ===
pub const DEFAULT_REFRESH_INTERVAL_MILLIS: u64 = 1000;
pub const DEFAULT_PREPARE_TIMEOUT_SECS: u64 = 10;
pub const IDLE_TIME_LABEL: &str = "00:00 / 00:00";

// === Streaming ===
pub const STREAM_STALL_TIMEOUT_SECS: u64 = 5;
