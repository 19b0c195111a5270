/// One playlist item as delivered by the feed.
///
/// `duration_label` is carried verbatim for display only; the seek bar takes
/// its range from the media handle once the stream is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub title: String,
    pub artist: String,
    pub stream_url: String,
    pub duration_label: String,
}

impl PlaylistEntry {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        stream_url: impl Into<String>,
        duration_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            stream_url: stream_url.into(),
            duration_label: duration_label.into(),
        }
    }
}
