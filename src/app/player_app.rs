use std::sync::mpsc::{channel, TryRecvError};
use std::time::{Duration, Instant};

use crate::app::PlaybackController;
use crate::config::AppConfig;
use crate::constants::*;
use crate::models::PlaylistEntry;
use crate::screens::{render_player_bar, render_playlist_view, RowAction};
use crate::state::{BackgroundTasks, LoadState, UIState};
use crate::utils::async_helper::spawn_and_send;
use crate::utils::media::MediaHandle;
use crate::utils::mediaplay::StreamPlayer;

pub struct PlaylistApp {
    pub config: AppConfig,

    // Feed contents in document order; row index == position here
    pub entries: Vec<PlaylistEntry>,

    // Owns the media handle and all playback state
    pub playback: PlaybackController,

    pub ui: UIState,

    // Background tasks (receivers for async operations)
    pub tasks: BackgroundTasks,
}

impl PlaylistApp {
    /// Create the app with the rodio stream player and start fetching the feed
    pub fn new(config: AppConfig) -> Self {
        let player = StreamPlayer::new(config.prepare_timeout);
        let mut app = Self::with_handle(config, Box::new(player));
        app.start_playlist_load();
        app
    }

    /// Create the app around any media handle without touching the network
    pub fn with_handle(config: AppConfig, handle: Box<dyn MediaHandle>) -> Self {
        let playback = PlaybackController::new(handle, config.refresh_interval);
        Self {
            config,
            entries: Vec::new(),
            playback,
            ui: UIState::default(),
            tasks: BackgroundTasks::default(),
        }
    }

    /// Fetch and parse the playlist on a background thread
    pub fn start_playlist_load(&mut self) {
        let url = self.config.playlist_url.clone();
        log::info!("[Playlist] Loading playlist from {}", url);

        let (tx, rx) = channel();
        self.tasks.playlist_rx = Some(rx);
        self.ui.load_state = LoadState::Loading;

        spawn_and_send(
            move || {
                Box::pin(async move {
                    crate::api::load_playlist(&url)
                        .await
                        .map_err(|e| e.to_string())
                })
            },
            tx,
        );
    }

    /// Apply a finished playlist load, if one arrived
    pub fn check_playlist_load(&mut self) {
        let result = match &self.tasks.playlist_rx {
            Some(rx) => rx.try_recv(),
            None => return,
        };

        match result {
            Ok(Ok(entries)) => {
                log::info!("[Playlist] Background load complete: {} entries", entries.len());
                self.entries = entries;
                self.ui.load_state = LoadState::Loaded;
                self.tasks.playlist_rx = None;
            }
            Ok(Err(e)) => {
                log::error!("[Playlist] Failed to load playlist: {}", e);
                self.ui.load_state = LoadState::Failed(e);
                self.tasks.playlist_rx = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                log::error!("[Playlist] Load task ended without a result");
                self.ui.load_state = LoadState::Failed("playlist task ended unexpectedly".to_string());
                self.tasks.playlist_rx = None;
            }
        }
    }

    /// Route a row click to the playback controller
    pub fn handle_row_action(&mut self, action: RowAction, now: Instant) {
        match action {
            RowAction::Play(row) => match self.entries.get(row) {
                Some(entry) => self.playback.play(row, entry, now),
                None => log::warn!("[Playlist] Play on unknown row {}", row),
            },
            RowAction::Pause(row) => self.playback.pause(row),
        }
    }

    /// Rows laid out this frame; an active row outside them has been recycled
    pub fn update_visible_rows(&mut self, rows: std::ops::Range<usize>) {
        if let Some(active) = self.playback.state().active_row() {
            if !rows.contains(&active) {
                self.playback.row_detached(active);
            }
        }
    }

    /// Entry whose stream is currently loaded
    pub fn active_entry(&self) -> Option<&PlaylistEntry> {
        self.playback
            .state()
            .active_row()
            .and_then(|row| self.entries.get(row))
    }

    /// Drop pending tasks and release the audio output
    pub fn cleanup(&mut self) {
        log::info!("[Shutdown] Releasing playback and background tasks");
        self.tasks.clear_all();
        self.playback.teardown();
    }

    fn repaint_interval(&self, now: Instant) -> Duration {
        let idle = Duration::from_millis(REPAINT_INTERVAL_IDLE_MILLIS);
        if self.tasks.has_active_tasks() || self.ui.seek_drag_ms.is_some() || self.playback.is_seeking() {
            return Duration::from_millis(REPAINT_INTERVAL_ACTIVE_MILLIS);
        }
        match self.playback.next_refresh_in(now) {
            Some(next) => next.min(idle),
            None => idle,
        }
    }
}

impl eframe::App for PlaylistApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        if ctx.input(|i| i.viewport().close_requested()) && !self.ui.is_shutting_down {
            self.ui.is_shutting_down = true;
            self.cleanup();
        }

        self.check_playlist_load();
        self.playback.check_finished();
        self.playback.check_seek();
        self.playback.tick(now);

        egui::TopBottomPanel::bottom("player_bar")
            .resizable(false)
            .show(ctx, |ui| {
                render_player_bar(self, ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            render_playlist_view(self, ui);
        });

        ctx.request_repaint_after(self.repaint_interval(now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PlayState;
    use crate::utils::async_helper::AsyncTaskResult;
    use crate::utils::media::engine::MockMediaHandle;

    fn quiet_handle() -> MockMediaHandle {
        let mut handle = MockMediaHandle::new();
        handle.expect_reset().return_const(());
        handle.expect_set_source().returning(|_| Ok(()));
        handle.expect_prepare().returning(|| Ok(()));
        handle.expect_start().returning(|| Ok(()));
        handle.expect_pause().return_const(());
        handle.expect_stop().return_const(());
        handle.expect_release().return_const(());
        handle.expect_is_finished().return_const(false);
        handle.expect_position().return_const(Duration::ZERO);
        handle.expect_duration().return_const(Some(Duration::from_secs(120)));
        handle
    }

    fn app_with_entries(count: usize) -> PlaylistApp {
        let mut app = PlaylistApp::with_handle(AppConfig::default(), Box::new(quiet_handle()));
        app.entries = (0..count)
            .map(|i| {
                PlaylistEntry::new(
                    format!("Song {}", i),
                    "Artist",
                    format!("http://h/{}.mp3", i),
                    "120",
                )
            })
            .collect();
        app.ui.load_state = LoadState::Loaded;
        app
    }

    #[test]
    fn test_playlist_load_success() {
        let mut app = PlaylistApp::with_handle(AppConfig::default(), Box::new(quiet_handle()));
        let (tx, rx) = channel::<AsyncTaskResult<Vec<PlaylistEntry>>>();
        app.tasks.playlist_rx = Some(rx);

        app.check_playlist_load();
        assert_eq!(LoadState::Loading, app.ui.load_state);

        tx.send(Ok(vec![PlaylistEntry::new("A", "X", "http://h/a.mp3", "180")]))
            .unwrap();
        app.check_playlist_load();

        assert_eq!(LoadState::Loaded, app.ui.load_state);
        assert_eq!(1, app.entries.len());
        assert!(!app.tasks.has_active_tasks());
    }

    #[test]
    fn test_playlist_load_failure() {
        let mut app = PlaylistApp::with_handle(AppConfig::default(), Box::new(quiet_handle()));
        let (tx, rx) = channel::<AsyncTaskResult<Vec<PlaylistEntry>>>();
        app.tasks.playlist_rx = Some(rx);

        tx.send(Err("server returned status 503".to_string())).unwrap();
        app.check_playlist_load();

        assert_eq!(
            LoadState::Failed("server returned status 503".to_string()),
            app.ui.load_state
        );
        assert!(app.entries.is_empty());
    }

    #[test]
    fn test_playlist_load_task_vanished() {
        let mut app = PlaylistApp::with_handle(AppConfig::default(), Box::new(quiet_handle()));
        let (tx, rx) = channel::<AsyncTaskResult<Vec<PlaylistEntry>>>();
        app.tasks.playlist_rx = Some(rx);
        drop(tx);

        app.check_playlist_load();

        assert!(matches!(app.ui.load_state, LoadState::Failed(_)));
        assert!(app.tasks.playlist_rx.is_none());
    }

    #[test]
    fn test_row_actions_drive_playback() {
        let now = Instant::now();
        let mut app = app_with_entries(3);

        app.handle_row_action(RowAction::Play(1), now);
        assert_eq!(PlayState::Playing(1), app.playback.state());
        assert_eq!(Some("Song 1"), app.active_entry().map(|e| e.title.as_str()));

        app.handle_row_action(RowAction::Pause(1), now);
        assert_eq!(PlayState::Paused(1), app.playback.state());

        app.handle_row_action(RowAction::Play(7), now);
        assert_eq!(PlayState::Paused(1), app.playback.state());
    }

    #[test]
    fn test_active_row_scrolled_out_resets() {
        let now = Instant::now();
        let mut app = app_with_entries(40);

        app.handle_row_action(RowAction::Play(2), now);
        app.update_visible_rows(0..12);
        assert_eq!(PlayState::Playing(2), app.playback.state());

        app.update_visible_rows(10..22);
        assert_eq!(PlayState::Idle, app.playback.state());
        assert_eq!(None, app.active_entry());
    }

    #[test]
    fn test_cleanup_is_repeatable() {
        let now = Instant::now();
        let mut app = app_with_entries(2);
        app.handle_row_action(RowAction::Play(0), now);

        app.cleanup();
        app.cleanup();

        assert_eq!(PlayState::Idle, app.playback.state());
        assert!(!app.tasks.has_active_tasks());
    }

    #[test]
    fn test_repaint_follows_refresh_ticker() {
        let now = Instant::now();
        let mut app = app_with_entries(1);
        let idle = Duration::from_millis(REPAINT_INTERVAL_IDLE_MILLIS);

        assert_eq!(idle, app.repaint_interval(now));

        app.handle_row_action(RowAction::Play(0), now);
        let next = app.repaint_interval(now + Duration::from_millis(900));
        assert!(next <= Duration::from_millis(100));
    }

    #[test]
    fn test_repaint_stays_fast_while_seek_opens() {
        let now = Instant::now();
        let mut handle = quiet_handle();
        handle.expect_seek_to().times(1).returning(|_| Ok(()));
        handle.expect_poll_seek().returning(|| None);
        let mut app = PlaylistApp::with_handle(AppConfig::default(), Box::new(handle));
        app.entries = vec![PlaylistEntry::new("A", "X", "http://h/a.mp3", "120")];

        app.handle_row_action(RowAction::Play(0), now);
        app.playback.pause(0);
        app.playback.seek(60_000);
        app.playback.check_seek();

        assert!(app.playback.is_seeking());
        assert_eq!(
            Duration::from_millis(REPAINT_INTERVAL_ACTIVE_MILLIS),
            app.repaint_interval(now)
        );
    }
}
