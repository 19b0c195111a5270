pub mod audio_state;
pub mod background_tasks;
pub mod ui_state;

pub use audio_state::{PlayState, RowControl, SeekBarState};
pub use background_tasks::BackgroundTasks;
pub use ui_state::{LoadState, UIState};
