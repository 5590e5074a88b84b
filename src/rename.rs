use crate::error::{Error, Result};
use crate::report::{Outcome, Report, Stage};
use crate::scan::list_file_names;
use colored::Colorize;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// `true` if `file_name` starts with `prefix` followed by `-` or `_`.
fn has_track_prefix(file_name: &str, prefix: &str) -> bool {
    file_name
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('-') || rest.starts_with('_'))
}

/**
 * Renames the numbered files in `dir` to the canonical names given by the
 * descriptor lines.
 *
 * The line at position `i` (starting at 1) claims the file whose name starts
 * with the zero padded `i` followed by `-` or `_`, and renames it to
 * `<line>.mp3`. If several files carry the same number the first one by name
 * wins. Missing files, existing targets and failed renames are recorded in
 * the report and do not stop the remaining renames.
 *
 * @param lines The validated descriptor lines.
 * @param dir The music directory.
 * @param dry_run Only print what would be renamed.
 * @return The per-track report, or an `Error::Audio` if not a single file
 *         could be renamed.
 */
pub fn rename_tracks(lines: &[String], dir: &Path, dry_run: bool) -> Result<Report> {
    let names = list_file_names(dir)?;
    let mut report = Report::new(Stage::Rename);
    let mut missing = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let prefix = format!("{:02}", idx + 1);
        let target_name = format!("{}.mp3", line);
        let candidates: Vec<&String> = names
            .iter()
            .filter(|name| has_track_prefix(name, &prefix))
            .collect();

        if candidates.iter().any(|name| **name == target_name) {
            debug!("'{}' already has its canonical name", target_name);
            if let Some(other) = candidates.iter().find(|name| ***name != target_name) {
                warn!(
                    "Not renaming '{}': '{}' already exists",
                    other, target_name
                );
                report.record(
                    other.as_str(),
                    Outcome::Skipped(format!("target '{}' already exists", target_name)),
                );
            }
            report.record(target_name, Outcome::Done);
            continue;
        }

        let Some(source_name) = candidates.first() else {
            warn!("No file found for track {} in '{}'", prefix, dir.display());
            missing.push(prefix);
            report.record(line.as_str(), Outcome::Skipped("missing".to_string()));
            continue;
        };
        if candidates.len() > 1 {
            warn!(
                "Found {} files for track {}, using '{}'",
                candidates.len(),
                prefix,
                source_name
            );
        }

        let source = dir.join(source_name.as_str());
        let target = dir.join(&target_name);
        if target.exists() {
            warn!(
                "Not renaming '{}': '{}' already exists",
                source_name, target_name
            );
            report.record(
                source_name.as_str(),
                Outcome::Skipped(format!("target '{}' already exists", target_name)),
            );
            continue;
        }

        if dry_run {
            println!(
                "{} '{}' to '{}'",
                "Would rename:".blue(),
                source_name,
                target_name.green()
            );
            report.record(source_name.as_str(), Outcome::Done);
            continue;
        }

        match fs::rename(&source, &target) {
            Ok(_) => {
                println!(
                    "{} '{}' to '{}'",
                    "Renamed:".blue(),
                    source_name,
                    target_name.green()
                );
                report.record(source_name.as_str(), Outcome::Done);
            }
            Err(err) => {
                let err = Error::audio_io("rename", &source, err);
                warn!("{}", err);
                report.record(source_name.as_str(), Outcome::Failed(err.to_string()));
            }
        }
    }

    if report.succeeded() == 0 {
        return Err(Error::Audio(format!(
            "No files were renamed in '{}'. Expected files starting with the track number, e.g. '01-Song.mp3'",
            dir.display()
        )));
    }

    println!(
        "{} {} of {} tracks",
        "Renamed".green(),
        report.succeeded(),
        lines.len()
    );
    if !missing.is_empty() {
        println!("{} {}", "Missing tracks:".yellow(), missing.join(", "));
    }

    Ok(report)
}
