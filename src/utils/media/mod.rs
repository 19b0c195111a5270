pub mod core;
pub mod engine;

pub use engine::MediaHandle;
