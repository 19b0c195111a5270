/// Which row, if any, owns the media handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Idle,
    Playing(usize),
    Paused(usize),
}

impl PlayState {
    /// Row whose stream is loaded in the handle
    pub fn active_row(&self) -> Option<usize> {
        match *self {
            PlayState::Idle => None,
            PlayState::Playing(row) | PlayState::Paused(row) => Some(row),
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlayState::Playing(_))
    }

    /// Control a row should currently show
    pub fn control_for(&self, row: usize) -> RowControl {
        match *self {
            PlayState::Playing(active) if active == row => RowControl::Pause,
            _ => RowControl::Play,
        }
    }
}

/// The one control a row exposes at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowControl {
    Play,
    Pause,
}

/// Seek bar model in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeekBarState {
    pub position_ms: u64,
    pub max_ms: u64,
}

impl SeekBarState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_the_playing_row_shows_pause() {
        let state = PlayState::Playing(2);

        assert_eq!(RowControl::Pause, state.control_for(2));
        assert_eq!(RowControl::Play, state.control_for(0));
        assert_eq!(Some(2), state.active_row());
    }

    #[test]
    fn test_paused_row_shows_play() {
        let state = PlayState::Paused(1);

        assert_eq!(RowControl::Play, state.control_for(1));
        assert_eq!(Some(1), state.active_row());
        assert!(!state.is_playing());
    }

    #[test]
    fn test_idle_has_no_active_row() {
        assert_eq!(None, PlayState::Idle.active_row());
        assert_eq!(RowControl::Play, PlayState::default().control_for(0));
    }
}
