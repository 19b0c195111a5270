use std::sync::mpsc::Receiver;

use crate::models::PlaylistEntry;
use crate::utils::async_helper::AsyncTaskResult;

#[derive(Default)]
pub struct BackgroundTasks {
    // Playlist feed fetch + parse
    pub playlist_rx: Option<Receiver<AsyncTaskResult<Vec<PlaylistEntry>>>>,
}

impl BackgroundTasks {
    pub fn has_active_tasks(&self) -> bool {
        self.playlist_rx.is_some()
    }

    /// Drop all receivers; late results are discarded by their senders
    pub fn clear_all(&mut self) {
        self.playlist_rx = None;
    }
}
