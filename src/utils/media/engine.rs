use crate::utils::errors::MediaError;
use std::time::Duration;

/// Single-stream playback handle.
///
/// Opens one source at a time. Loading a track is always
/// `reset` -> `set_source` -> `prepare` -> `start`; after that the handle can
/// be paused, restarted, stopped and seeked until the next `reset`. Only
/// `prepare` blocks; seeks complete in the background and are collected
/// with `poll_seek`.
#[cfg_attr(test, mockall::automock)]
pub trait MediaHandle {
    /// Drop any loaded stream and return to the unprepared state
    fn reset(&mut self);

    fn set_source(&mut self, url: &str) -> Result<(), MediaError>;

    /// Open the source and buffer enough to start; blocks until ready
    fn prepare(&mut self) -> Result<(), MediaError>;

    fn start(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self);
    fn stop(&mut self);

    /// Begin moving to `position`; the stream keeps playing until the move lands
    fn seek_to(&mut self, position: Duration) -> Result<(), MediaError>;

    /// Outcome of the last `seek_to` once known, None while it is still opening.
    /// A failed seek leaves the previous stream playing.
    fn poll_seek(&mut self) -> Option<Result<(), MediaError>>;

    /// True once a started stream has played to its end
    fn is_finished(&self) -> bool;

    fn position(&self) -> Duration;
    fn duration(&self) -> Option<Duration>;

    /// Free the output device; the handle must be prepared again before use
    fn release(&mut self);
}
