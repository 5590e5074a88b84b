use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;

/**
 * Makes sure the music directory exists, is a directory and has at least
 * one entry, so a mistyped `--dir` fails before anything is renamed.
 */
pub fn validate_music_directory(dir: &Path) -> Result<()> {
    let meta = match fs::metadata(dir) {
        Ok(meta) => meta,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(Error::Audio(format!(
                "Music directory not found: '{}'",
                dir.display()
            )));
        }
        Err(err) => return Err(Error::audio_io("access", dir, err)),
    };
    if !meta.is_dir() {
        return Err(Error::Audio(format!(
            "Music path is not a directory: '{}'",
            dir.display()
        )));
    }

    let mut entries = fs::read_dir(dir).map_err(|err| Error::audio_io("read", dir, err))?;
    if entries.next().is_none() {
        return Err(Error::Audio(format!(
            "Music directory is empty: '{}'",
            dir.display()
        )));
    }

    Ok(())
}

/**
 * Lists the names of the regular files directly inside `dir`.
 *
 * Sub-directories are not descended into. Names are sorted, which makes
 * every stage see the files in the same order regardless of the platform.
 * Names that are not valid UTF-8 cannot be canonical and are skipped.
 */
pub fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(Error::Audio(format!(
                    "Could not list music directory '{}': {}",
                    dir.display(),
                    err
                )));
            }
            Err(err) => {
                warn!("Skipping unreadable entry in '{}': {}", dir.display(), err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        match entry.file_name().to_str() {
            Some(name) => names.push(name.to_string()),
            None => warn!("Skipping file with non UTF-8 name: {:?}", entry.path()),
        }
    }

    Ok(names)
}

pub fn is_mp3(file_name: &str) -> bool {
    file_name.ends_with(".mp3")
}
