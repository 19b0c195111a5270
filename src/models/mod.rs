// Data models for the playlist feed

pub mod entry;

pub use entry::PlaylistEntry;
