use thiserror::Error;

/// Failures while loading the playlist feed
#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed playlist document: {0}")]
    Xml(#[from] xmltree::ParseError),
}

/// Failures reported by a media handle while opening or driving a stream
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("invalid stream url '{url}': {reason}")]
    InvalidSource { url: String, reason: String },

    #[error("no source set")]
    NoSource,

    #[error("stream not prepared")]
    NotPrepared,

    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("could not open stream: {0}")]
    Open(String),

    #[error("stream did not start within {0:?}")]
    Timeout(std::time::Duration),
}
