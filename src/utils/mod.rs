pub mod async_helper;
pub mod error_handling;
pub mod errors;
pub mod formatting;
pub mod http;
pub mod media;
pub mod mediaplay;
pub mod ticker;
