use regex::Regex;
use std::sync::OnceLock;

static CANONICAL_NAME: OnceLock<Regex> = OnceLock::new();

/// The fields encoded in a canonical file name
/// (`NN_TITLE; ARTIST -- DANCE.mp3`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub track_num: String,
    pub title: String,
    pub artist: String,
    pub dance: String,
}

fn canonical_name() -> &'static Regex {
    CANONICAL_NAME.get_or_init(|| {
        Regex::new(r"^(\d{2})_(.*);\s(.*)\s--\s(.*)\.mp3$").expect("canonical name pattern")
    })
}

/**
 * Splits a canonical file name into its track fields.
 *
 * Only names produced by the renamer match, i.e. a two digit track number,
 * an underscore, the title, `; `, the artist, ` -- `, the dance and the
 * `.mp3` extension.
 *
 * @param file_name The bare file name, without any directory.
 * @return `Some(Track)` if the name is canonical, `None` otherwise.
 */
pub fn parse_filename(file_name: &str) -> Option<Track> {
    let caps = canonical_name().captures(file_name)?;
    Some(Track {
        track_num: caps[1].to_string(),
        title: caps[2].to_string(),
        artist: caps[3].to_string(),
        dance: caps[4].to_string(),
    })
}
