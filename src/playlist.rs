//! M3U playlist generation

use crate::audio::AudioBackend;
use crate::error::{Error, Result};
use crate::report::{Outcome, Report, Stage};
use crate::scan::{is_mp3, list_file_names};
use crate::track::parse_filename;
use colored::Colorize;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Everything but unreserved URL characters and the path separator.
const PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// One track of the playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub duration: u64,
    pub artist: String,
    pub title: String,
    /// Percent-encoded path of the file.
    pub location: String,
}

/// Percent-encodes `dir/file_name` for use as a playlist entry.
pub fn encode_location(dir: &Path, file_name: &str) -> String {
    let path = dir.join(file_name);
    utf8_percent_encode(&path.to_string_lossy(), PATH).to_string()
}

/// Generate the M3U playlist content, one `#EXTINF` line and one path line
/// per entry.
pub fn render_m3u(entries: &[PlaylistEntry]) -> String {
    let mut content = String::from("#EXTM3U\n");
    for entry in entries {
        content.push_str(&format!(
            "#EXTINF:{},{} - {}\n",
            entry.duration, entry.artist, entry.title
        ));
        content.push_str(&entry.location);
        content.push('\n');
    }
    content
}

fn collect_entries(
    dir: &Path,
    backend: &dyn AudioBackend,
    report: &mut Report,
) -> Result<Vec<PlaylistEntry>> {
    let mut entries = Vec::new();
    for file_name in list_file_names(dir)? {
        if !is_mp3(&file_name) {
            debug!("Leaving '{}' out of the playlist", file_name);
            continue;
        }
        let Some(track) = parse_filename(&file_name) else {
            warn!("Skipping '{}': not a canonical file name", file_name);
            report.record(
                file_name,
                Outcome::Skipped("not a canonical file name".to_string()),
            );
            continue;
        };

        let duration = match backend.read_duration(&dir.join(&file_name)) {
            Ok(secs) => secs,
            Err(err) => {
                warn!("Skipping '{}': {}", file_name, err);
                report.record(file_name, Outcome::Skipped(err.to_string()));
                continue;
            }
        };

        entries.push(PlaylistEntry {
            duration,
            artist: track.artist,
            title: track.title,
            location: encode_location(dir, &file_name),
        });
        report.record(file_name, Outcome::Done);
    }
    Ok(entries)
}

/**
 * Writes `<name>.m3u` and an identical `<name>.m3u8` into `out_dir`.
 *
 * The playlist lists every canonical MP3 of `dir` in file name order with its
 * duration in whole seconds. Files that cannot be parsed or read are left out.
 *
 * @param dir The music directory.
 * @param name The playlist name, used as the file stem.
 * @param out_dir Where the playlist files are written.
 * @param backend Reads the durations.
 * @return The path of the `.m3u` file and the per-file report.
 */
pub fn create_playlist_files(
    dir: &Path,
    name: &str,
    out_dir: &Path,
    backend: &dyn AudioBackend,
) -> Result<(PathBuf, Report)> {
    let mut report = Report::new(Stage::Playlist);
    let entries = collect_entries(dir, backend, &mut report)?;
    if entries.is_empty() {
        return Err(Error::Audio(format!(
            "No files could be added to the playlist from '{}'",
            dir.display()
        )));
    }

    let m3u = out_dir.join(format!("{}.m3u", name));
    let m3u8 = out_dir.join(format!("{}.m3u8", name));
    fs::write(&m3u, render_m3u(&entries)).map_err(|e| {
        Error::Tool(format!("Could not write playlist '{}': {}", m3u.display(), e))
    })?;
    fs::copy(&m3u, &m3u8).map_err(|e| {
        Error::Tool(format!("Could not write playlist '{}': {}", m3u8.display(), e))
    })?;

    println!(
        "{} '{}' and '{}' with {} tracks",
        "Created playlist files".green(),
        m3u.display(),
        m3u8.display(),
        entries.len()
    );
    Ok((m3u, report))
}
