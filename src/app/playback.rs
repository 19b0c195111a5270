use std::time::{Duration, Instant};

use crate::constants::IDLE_TIME_LABEL;
use crate::models::PlaylistEntry;
use crate::state::{PlayState, RowControl, SeekBarState};
use crate::utils::errors::MediaError;
use crate::utils::formatting::format_progress;
use crate::utils::media::MediaHandle;
use crate::utils::ticker::Ticker;

/// Screen-scoped owner of the media handle.
///
/// Holds the tagged play state, the seek bar model, the time label and the
/// refresh ticker. Rows render `control_for(row)` and report clicks back;
/// they keep no playback flags of their own. Everything here runs on the UI
/// thread.
pub struct PlaybackController {
    handle: Box<dyn MediaHandle>,
    state: PlayState,
    ticker: Ticker,
    seek_bar: SeekBarState,
    time_label: String,
    last_error: Option<String>,
    // A seek was issued and the handle has not reported its outcome yet
    seek_pending: bool,
    torn_down: bool,
}

impl PlaybackController {
    pub fn new(handle: Box<dyn MediaHandle>, refresh_interval: Duration) -> Self {
        Self {
            handle,
            state: PlayState::Idle,
            ticker: Ticker::new(refresh_interval),
            seek_bar: SeekBarState::default(),
            time_label: IDLE_TIME_LABEL.to_string(),
            last_error: None,
            seek_pending: false,
            torn_down: false,
        }
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn control_for(&self, row: usize) -> RowControl {
        self.state.control_for(row)
    }

    pub fn seek_bar(&self) -> SeekBarState {
        self.seek_bar
    }

    pub fn time_label(&self) -> &str {
        &self.time_label
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn is_seeking(&self) -> bool {
        self.seek_pending
    }

    /// Play pressed on `row`
    pub fn play(&mut self, row: usize, entry: &PlaylistEntry, now: Instant) {
        if self.torn_down {
            log::warn!("[Playback] Ignoring play on row {} after teardown", row);
            return;
        }

        if self.state.active_row() == Some(row) {
            // Same stream already loaded: resume (or re-issue start) without reloading
            log::info!("[Playback] Resuming row {}", row);
            if let Err(e) = self.handle.start() {
                self.fail(row, entry, e);
                return;
            }
        } else {
            if let Some(previous) = self.state.active_row() {
                log::info!("[Playback] Switching from row {} to row {}", previous, row);
                self.reset_to_idle();
            }
            log::info!("[Playback] Loading row {}: {} by {}", row, entry.title, entry.artist);
            if let Err(e) = self.load(&entry.stream_url) {
                self.fail(row, entry, e);
                return;
            }
        }

        self.state = PlayState::Playing(row);
        self.last_error = None;
        self.ticker.start(now);
        self.refresh();
    }

    /// Pause pressed on `row`; only the playing row reacts
    pub fn pause(&mut self, row: usize) {
        if self.state != PlayState::Playing(row) {
            log::debug!("[Playback] Ignoring pause on row {} ({:?})", row, self.state);
            return;
        }

        self.handle.pause();
        self.ticker.cancel();
        self.state = PlayState::Paused(row);
        log::info!("[Playback] Paused row {}", row);
    }

    /// User dragged the seek bar to `position_ms`
    pub fn seek(&mut self, position_ms: u64) {
        if self.state.active_row().is_none() {
            return;
        }

        match self.handle.seek_to(Duration::from_millis(position_ms)) {
            Ok(()) => {
                self.seek_pending = true;
                self.seek_bar.position_ms = position_ms;
                self.time_label = format_progress(position_ms, self.seek_bar.max_ms);
            }
            Err(e) => {
                // nothing is left to play from
                log::error!("[Playback] Seek to {}ms failed: {}", position_ms, e);
                self.reset_to_idle();
                self.last_error = Some(format!("Seek failed: {}", e));
            }
        }
    }

    /// Pick up the outcome of an in-flight seek; call once per frame
    pub fn check_seek(&mut self) {
        if !self.seek_pending {
            return;
        }

        match self.handle.poll_seek() {
            None => {}
            Some(Ok(())) => {
                log::debug!("[Playback] Seek landed");
                self.seek_pending = false;
                self.refresh();
            }
            Some(Err(e)) => {
                // the previous stream is still playing; resync the bar to it
                log::warn!("[Playback] Seek failed, staying on current stream: {}", e);
                self.seek_pending = false;
                self.last_error = Some(format!("Seek failed: {}", e));
                self.refresh();
            }
        }
    }

    /// The row's view left the rendered range; an active row goes back to Idle
    pub fn row_detached(&mut self, row: usize) {
        if self.state.active_row() == Some(row) {
            log::info!("[Playback] Active row {} detached, stopping", row);
            self.reset_to_idle();
        }
    }

    /// Poll the handle for end of stream
    pub fn check_finished(&mut self) {
        if self.state.is_playing() && self.handle.is_finished() {
            log::info!("[Playback] Track finished");
            self.reset_to_idle();
        }
    }

    /// Drive the refresh loop; call once per frame
    pub fn tick(&mut self, now: Instant) {
        if !self.ticker.poll(now) {
            return;
        }
        if !self.state.is_playing() {
            self.ticker.cancel();
        } else if !self.seek_pending {
            // while seeking the bar keeps the requested position
            self.refresh();
        }
    }

    /// Time until the refresh loop wants another frame
    pub fn next_refresh_in(&self, now: Instant) -> Option<Duration> {
        self.ticker.time_until_next(now)
    }

    /// Stop and release the handle; safe to call any number of times
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        log::info!("[Playback] Tearing down ({:?})", self.state);
        self.ticker.cancel();
        self.seek_pending = false;
        self.handle.stop();
        self.handle.release();
        self.state = PlayState::Idle;
        self.seek_bar.reset();
        self.time_label = IDLE_TIME_LABEL.to_string();
    }

    fn load(&mut self, url: &str) -> Result<(), MediaError> {
        self.seek_pending = false;
        self.handle.reset();
        self.handle.set_source(url)?;
        self.handle.prepare()?;
        self.handle.start()
    }

    fn fail(&mut self, row: usize, entry: &PlaylistEntry, error: MediaError) {
        log::error!("[Playback] Could not play row {} ({}): {}", row, entry.stream_url, error);
        self.handle.reset();
        self.ticker.cancel();
        self.seek_pending = false;
        self.state = PlayState::Idle;
        self.seek_bar.reset();
        self.time_label = IDLE_TIME_LABEL.to_string();
        self.last_error = Some(format!("Could not play \"{}\": {}", entry.title, error));
    }

    fn reset_to_idle(&mut self) {
        self.ticker.cancel();
        self.seek_pending = false;
        self.handle.stop();
        self.state = PlayState::Idle;
        self.seek_bar.reset();
        self.time_label = IDLE_TIME_LABEL.to_string();
    }

    fn refresh(&mut self) {
        let position = duration_ms(self.handle.position());
        let total = self.handle.duration().map(duration_ms).unwrap_or(0);

        self.seek_bar.max_ms = total;
        self.seek_bar.position_ms = if total > 0 { position.min(total) } else { position };
        self.time_label = format_progress(position, total);
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
