/// Where the playlist feed stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Default)]
pub struct UIState {
    pub load_state: LoadState,
    pub is_shutting_down: bool,
    // Drag value on the seek bar while the pointer is held
    pub seek_drag_ms: Option<u64>,
}

