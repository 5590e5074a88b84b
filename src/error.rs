use std::io;
use std::path::Path;

/// Errors that abort a stage of the pipeline.
///
/// Per-file problems inside a batch stage are not errors, they are recorded
/// as [`crate::report::Outcome`]s. Only a stage that cannot start, or one that
/// finishes without a single success, returns one of these.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The descriptor file is missing, unreadable or badly formatted.
    #[error("{0}")]
    Descriptor(String),
    /// A music file or directory could not be processed.
    #[error("{0}")]
    Audio(String),
    /// Anything else, e.g. the playlist could not be written.
    #[error("{0}")]
    Tool(String),
}

impl Error {
    /// A short hint printed below the error message.
    pub fn hint(&self) -> &'static str {
        match self {
            Error::Descriptor(_) => {
                "Each line of the descriptor file must look like: 01_Title; Artist -- Dance"
            }
            Error::Audio(_) => {
                "Check that the music directory exists and contains readable, numbered MP3 files."
            }
            Error::Tool(_) => "Check write permissions for the output directory.",
        }
    }

    /// Maps an I/O error on a music path to an [`Error::Audio`].
    pub fn audio_io(action: &str, path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Error::Audio(format!(
                "Permission denied while trying to {} '{}'",
                action,
                path.display()
            )),
            _ => Error::Audio(format!(
                "Could not {} '{}': {}",
                action,
                path.display(),
                err
            )),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
