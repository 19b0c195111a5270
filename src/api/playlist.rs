// Playlist feed: one GET, one XML document, one entry per <song>
use crate::models::PlaylistEntry;
use crate::utils::errors::PlaylistError;
use xmltree::{Element, XMLNode};

const SONG_TAG: &str = "song";
const TITLE_TAG: &str = "title";
const ARTIST_TAG: &str = "artist";
const URL_TAG: &str = "url";
const DURATION_TAG: &str = "duration";

/// Fetch and parse the playlist at `url`
pub async fn load_playlist(url: &str) -> Result<Vec<PlaylistEntry>, PlaylistError> {
    let body = fetch_playlist(url).await?;
    parse_playlist(&body)
}

/// GET the playlist document and return the full body as text
pub async fn fetch_playlist(url: &str) -> Result<String, PlaylistError> {
    log::debug!("[Playlist] Fetching playlist: {}", url);

    let response = crate::utils::http::client().get(url).send().await?;

    if !response.status().is_success() {
        return Err(PlaylistError::Status(response.status()));
    }

    let body = response.text().await?;
    log::debug!("[Playlist] Received {} bytes", body.len());
    Ok(body)
}

/// Parse a playlist document into entries, in document order.
///
/// Every `song` element at any depth yields one entry built from the first
/// `title`, `artist`, `url` and `duration` elements beneath it. A song missing
/// one of them is skipped and logged; the rest of the document still loads.
/// Only a document that is not well-formed XML fails as a whole.
pub fn parse_playlist(xml: &str) -> Result<Vec<PlaylistEntry>, PlaylistError> {
    let root = Element::parse(xml.as_bytes())?;

    let mut songs = Vec::new();
    collect_elements(&root, SONG_TAG, &mut songs);

    let mut entries = Vec::with_capacity(songs.len());
    for (index, song) in songs.into_iter().enumerate() {
        match parse_song(song) {
            Ok(entry) => entries.push(entry),
            Err(missing) => {
                log::warn!(
                    "[Playlist] Skipping song #{}: missing <{}> element",
                    index,
                    missing
                );
            }
        }
    }

    log::info!("[Playlist] Parsed {} entries", entries.len());
    Ok(entries)
}

/// Build one entry, or name the first required child that is absent
fn parse_song(song: &Element) -> Result<PlaylistEntry, &'static str> {
    let field = |tag: &'static str| {
        find_descendant(song, tag)
            .map(text_content)
            .ok_or(tag)
    };

    Ok(PlaylistEntry::new(
        field(TITLE_TAG)?,
        field(ARTIST_TAG)?,
        field(URL_TAG)?,
        field(DURATION_TAG)?,
    ))
}

fn matches_tag(element: &Element, tag: &str) -> bool {
    element.prefix.is_none() && element.name == tag
}

fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(|node| match node {
        XMLNode::Element(child) => Some(child),
        _ => None,
    })
}

/// Pre-order walk collecting every element named `tag`, including `element` itself
fn collect_elements<'a>(element: &'a Element, tag: &str, out: &mut Vec<&'a Element>) {
    if matches_tag(element, tag) {
        out.push(element);
    }
    for child in child_elements(element) {
        collect_elements(child, tag, out);
    }
}

/// First element named `tag` strictly below `element`, in document order
fn find_descendant<'a>(element: &'a Element, tag: &str) -> Option<&'a Element> {
    for child in child_elements(element) {
        if matches_tag(child, tag) {
            return Some(child);
        }
        if let Some(found) = find_descendant(child, tag) {
            return Some(found);
        }
    }
    None
}

/// Concatenated text of all descendant text and CDATA nodes
fn text_content(element: &Element) -> String {
    let mut text = String::new();
    append_text(element, &mut text);
    text
}

fn append_text(element: &Element, out: &mut String) {
    for node in &element.children {
        match node {
            XMLNode::Text(text) | XMLNode::CData(text) => out.push_str(text),
            XMLNode::Element(child) => append_text(child, out),
            _ => {}
        }
    }
}
