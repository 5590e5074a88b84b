use crate::audio::{AudioBackend, TagSet};
use crate::error::{Error, Result};
use crate::report::{Outcome, Report, Stage};
use crate::scan::{is_mp3, list_file_names};
use crate::track::parse_filename;
use colored::Colorize;
use std::path::Path;
use tracing::warn;

/**
 * Writes the tags encoded in each canonical file name into the file itself.
 *
 * Every `.mp3` in `dir` whose name parses gets its track number, title,
 * artist and dance written, with `album` as album and album artist. Files
 * with other names are skipped, files that cannot be tagged are recorded as
 * failed. Neither stops the remaining files.
 *
 * @param dir The music directory.
 * @param album The playlist name.
 * @param backend Reads and writes the audio files.
 * @return The per-file report, or an `Error::Audio` if the directory holds
 *         no MP3s or none of them could be tagged.
 */
pub fn tag_directory(dir: &Path, album: &str, backend: &dyn AudioBackend) -> Result<Report> {
    let files: Vec<String> = list_file_names(dir)?
        .into_iter()
        .filter(|name| is_mp3(name))
        .collect();
    if files.is_empty() {
        return Err(Error::Audio(format!(
            "No MP3 files found in '{}'",
            dir.display()
        )));
    }

    let mut report = Report::new(Stage::Tag);
    for file_name in files {
        let Some(track) = parse_filename(&file_name) else {
            warn!("Skipping '{}': not a canonical file name", file_name);
            report.record(
                file_name,
                Outcome::Skipped("not a canonical file name".to_string()),
            );
            continue;
        };

        let path = dir.join(&file_name);
        match backend.write_tags(&path, &TagSet::new(&track, album)) {
            Ok(()) => {
                println!("{} '{}'", "Tagged:".blue(), file_name);
                report.record(file_name, Outcome::Done);
            }
            Err(err) => {
                warn!("{}", err);
                report.record(file_name, Outcome::Failed(err.to_string()));
            }
        }
    }

    if report.succeeded() == 0 {
        return Err(Error::Audio(format!(
            "No files could be tagged in '{}' ({} skipped, {} failed)",
            dir.display(),
            report.skipped(),
            report.failed()
        )));
    }

    Ok(report)
}
