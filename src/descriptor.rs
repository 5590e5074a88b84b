use crate::error::{Error, Result};
use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

static DESCRIPTOR_LINE: OnceLock<Regex> = OnceLock::new();

fn descriptor_line() -> &'static Regex {
    DESCRIPTOR_LINE
        .get_or_init(|| Regex::new(r"^\d{2}_.*; .* -- .*$").expect("descriptor line pattern"))
}

/**
 * Reads and validates a descriptor file.
 *
 * Every non-empty line describes one track as `NN_TITLE; ARTIST -- DANCE`,
 * where `NN` is the position of the entry, starting at `01`. Lines are
 * trimmed and blank lines are ignored.
 *
 * @param path The descriptor file to read.
 * @return The validated lines in file order, or an `Error::Descriptor`
 *         naming the first offending line and what is wrong with it.
 */
pub fn validate_descriptor_file(path: &Path) -> Result<Vec<String>> {
    let contents = read_descriptor(path)?;

    let mut entries = Vec::new();
    for (line_idx, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        validate_line(line, line_idx + 1, entries.len() + 1)?;
        entries.push(line.to_string());
    }

    if entries.is_empty() {
        return Err(Error::Descriptor(format!(
            "Descriptor file '{}' is empty or has no entries",
            path.display()
        )));
    }

    debug!("Descriptor '{}' has {} entries", path.display(), entries.len());
    Ok(entries)
}

fn read_descriptor(path: &Path) -> Result<String> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(Error::Descriptor(format!(
                "Descriptor file not found: '{}'",
                path.display()
            )));
        }
        Err(err) => return Err(read_error(path, err)),
    };
    if !meta.is_file() {
        return Err(Error::Descriptor(format!(
            "Descriptor path is not a file: '{}'",
            path.display()
        )));
    }

    let bytes = fs::read(path).map_err(|err| read_error(path, err))?;
    String::from_utf8(bytes).map_err(|err| {
        Error::Descriptor(format!(
            "Could not decode descriptor file '{}' as UTF-8: {}",
            path.display(),
            err
        ))
    })
}

fn read_error(path: &Path, err: io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::PermissionDenied => Error::Descriptor(format!(
            "Permission denied reading descriptor file: '{}'",
            path.display()
        )),
        _ => Error::Descriptor(format!(
            "Could not read descriptor file '{}': {}",
            path.display(),
            err
        )),
    }
}

/// Checks a single trimmed, non-empty line. `line_no` is the line in the
/// file, `track_no` the position among the entries.
fn validate_line(line: &str, line_no: usize, track_no: usize) -> Result<()> {
    if !line.contains(';') {
        if line.contains(',') {
            return Err(Error::Descriptor(format!(
                "Line {}: Found comma (,) but expected semicolon (;) between title and artist: '{}'",
                line_no, line
            )));
        }
        return Err(Error::Descriptor(format!(
            "Line {}: Missing semicolon (;) between title and artist: '{}'",
            line_no, line
        )));
    }

    if !line.contains(" -- ") {
        if line.contains(" - ") {
            return Err(Error::Descriptor(format!(
                "Line {}: Found single dash (-) but expected double dash (--) between artist and dance: '{}'",
                line_no, line
            )));
        }
        return Err(Error::Descriptor(format!(
            "Line {}: Missing double dash separator ( -- ) between artist and dance: '{}'",
            line_no, line
        )));
    }

    let expected = format!("{:02}", track_no);
    if !line.starts_with(&expected) {
        let found: String = line.chars().take(2).collect();
        return Err(Error::Descriptor(format!(
            "Line {}: Track number mismatch. Expected '{}' but found '{}'",
            line_no, expected, found
        )));
    }

    if !descriptor_line().is_match(line) {
        return Err(Error::Descriptor(format!(
            "Line {}: Invalid format, expected 'NN_Title; Artist -- Dance': '{}'",
            line_no, line
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_descriptor(contents: &[u8]) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tänze.txt");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    fn expect_error(contents: &str) -> String {
        let (_dir, path) = write_descriptor(contents.as_bytes());
        match validate_descriptor_file(&path) {
            Err(Error::Descriptor(msg)) => msg,
            other => panic!("Expected descriptor error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_descriptor() {
        let (_dir, path) = write_descriptor(
            b"01_Song; Artist -- Dance\n\n  02_Another Song, With Comma; Artist -- Style  \n",
        );
        let lines = validate_descriptor_file(&path).unwrap();
        assert_eq!(
            lines,
            vec![
                "01_Song; Artist -- Dance".to_string(),
                "02_Another Song, With Comma; Artist -- Style".to_string(),
            ]
        );
    }

    #[test]
    fn test_comma_in_title_allowed() {
        let (_dir, path) =
            write_descriptor(b"01_Song; Artist -- Dance\n02_Bad,Format; Artist -- Dance\n");
        let lines = validate_descriptor_file(&path).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("Bad,Format"));
    }

    #[test]
    fn test_file_not_found() {
        let dir = TempDir::new().unwrap();
        let err = validate_descriptor_file(&dir.path().join("nonexistent.txt")).unwrap_err();
        assert!(matches!(err, Error::Descriptor(_)));
        assert!(err.to_string().contains("Descriptor file not found"));
    }

    #[test]
    fn test_not_a_file() {
        let dir = TempDir::new().unwrap();
        let err = validate_descriptor_file(dir.path()).unwrap_err();
        assert!(err.to_string().contains("not a file"));
    }

    #[test]
    fn test_invalid_utf8() {
        let (_dir, path) = write_descriptor(b"01_T\xe4nze; Artist -- Dance\n");
        let err = validate_descriptor_file(&path).unwrap_err();
        assert!(err.to_string().contains("decode"));
    }

    #[test]
    fn test_empty_file() {
        let msg = expect_error("");
        assert!(msg.contains("empty"));
        let msg = expect_error("\n   \n\n");
        assert!(msg.contains("no entries"));
    }

    #[test]
    fn test_comma_instead_of_semicolon() {
        let msg = expect_error("01_Song, Artist -- Dance\n");
        assert!(msg.contains("Line 1"));
        assert!(msg.contains("Found comma (,) but expected semicolon (;)"));
    }

    #[test]
    fn test_missing_semicolon() {
        let msg = expect_error("01_Song Artist -- Dance\n");
        assert!(msg.contains("Line 1"));
        assert!(msg.contains("Missing semicolon"));
    }

    #[test]
    fn test_single_dash() {
        let msg = expect_error("01_Song; Artist - Dance\n");
        assert!(msg.contains("Line 1"));
        assert!(msg.contains("Found single dash (-) but expected double dash (--)"));
    }

    #[test]
    fn test_missing_double_dash() {
        let msg = expect_error("01_Song; Artist Dance\n");
        assert!(msg.contains("Missing double dash separator"));
    }

    #[test]
    fn test_track_number_mismatch() {
        let msg = expect_error("03_Song; Artist -- Dance\n");
        assert!(msg.contains("Line 1"));
        assert!(msg.contains("Track number mismatch"));
        assert!(msg.contains("Expected '01'"));
        assert!(msg.contains("but found '03'"));
    }

    #[test]
    fn test_track_number_mismatch_on_later_line() {
        let msg = expect_error("01_Song; Artist -- Dance\n01_Song; Artist -- Dance\n");
        assert!(msg.contains("Line 2"));
        assert!(msg.contains("Expected '02' but found '01'"));
    }

    #[test]
    fn test_invalid_format() {
        let msg = expect_error("01 Song; Artist -- Dance\n");
        assert!(msg.contains("Line 1"));
        assert!(msg.contains("Invalid format"));
    }
}
