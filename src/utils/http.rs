use reqwest::Client;

/// HTTP client for feed requests and audio streams.
///
/// Built per call: every background thread drives its own short-lived
/// runtime, and pooled connections must not outlive the runtime that
/// spawned them.
pub fn client() -> Client {
    Client::builder()
        .user_agent(concat!("StreamList/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("[HTTP] Failed to build configured client ({}), using defaults", e);
            Client::new()
        })
}
