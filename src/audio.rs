use crate::error::{Error, Result};
use crate::track::Track;
use lofty::config::WriteOptions;
use lofty::prelude::*;
use lofty::tag::{ItemKey, Tag};
use std::path::Path;
use tracing::debug;

/// The metadata written into every tagged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSet {
    /// Zero padded, as in the file name.
    pub track_num: String,
    pub title: String,
    /// Also written as the composer.
    pub artist: String,
    /// Also written as the comment and the genre.
    pub dance: String,
    /// The playlist name, also written as the album artist.
    pub album: String,
}

impl TagSet {
    pub fn new(track: &Track, album: &str) -> Self {
        TagSet {
            track_num: track.track_num.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            dance: track.dance.clone(),
            album: album.to_string(),
        }
    }
}

/// Access to the audio files themselves.
///
/// Renaming, parsing and playlist generation only ever go through this trait,
/// so they can be exercised without real MP3 data.
pub trait AudioBackend {
    /// Play duration in whole seconds, truncated.
    fn read_duration(&self, path: &Path) -> Result<u64>;

    /// Replaces comments and free-text items with `tags` and saves the file.
    fn write_tags(&self, path: &Path, tags: &TagSet) -> Result<()>;
}

/// [`AudioBackend`] on top of `lofty`.
#[derive(Debug, Default)]
pub struct LoftyBackend;

impl AudioBackend for LoftyBackend {
    fn read_duration(&self, path: &Path) -> Result<u64> {
        let tagged_file = lofty::read_from_path(path).map_err(|e| {
            Error::Audio(format!("Could not read audio file '{}': {}", path.display(), e))
        })?;
        Ok(tagged_file.properties().duration().as_secs())
    }

    fn write_tags(&self, path: &Path, tags: &TagSet) -> Result<()> {
        let mut tagged_file = lofty::read_from_path(path).map_err(|e| {
            Error::Audio(format!("Could not read audio file '{}': {}", path.display(), e))
        })?;

        if tagged_file.primary_tag().is_none() {
            let tag_type = tagged_file.primary_tag_type();
            debug!("'{}' has no {:?} tag, creating one", path.display(), tag_type);
            tagged_file.insert_tag(Tag::new(tag_type));
        }
        let tag = tagged_file.primary_tag_mut().ok_or_else(|| {
            Error::Audio(format!("'{}' does not support tags", path.display()))
        })?;

        tag.retain(|item| !matches!(item.key(), ItemKey::Comment | ItemKey::Unknown(_)));

        tag.insert_text(ItemKey::TrackNumber, tags.track_num.clone());
        tag.set_title(tags.title.clone());
        tag.set_artist(tags.artist.clone());
        tag.insert_text(ItemKey::Composer, tags.artist.clone());
        tag.set_genre(tags.dance.clone());
        tag.set_comment(tags.dance.clone());
        tag.set_album(tags.album.clone());
        tag.insert_text(ItemKey::AlbumArtist, tags.album.clone());

        tag.save_to_path(path, WriteOptions::default()).map_err(|e| {
            Error::Audio(format!("Could not write tags to '{}': {}", path.display(), e))
        })
    }
}
