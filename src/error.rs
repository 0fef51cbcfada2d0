use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by every diskplayer operation.
///
/// The command layer reports these to the user and exits non-zero; nothing
/// inside the library retries on its own.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A file the operation depends on does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The stored token could not be decoded.
    #[error("cannot decode token file {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing a local file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The interactive login did not complete.
    #[error("Spotify authentication failed: {0}")]
    Auth(String),

    /// No Spotify Connect device carries the configured name.
    #[error("Spotify device '{0}' not found")]
    DeviceNotFound(String),

    /// A caller supplied an unusable argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The player refused a command, for example because the account is not
    /// Premium.
    #[error("Spotify player refused the command: {message} ({reason})")]
    Player { reason: String, message: String },

    /// The Spotify Web API rejected a request or could not be reached.
    #[error("Spotify API error: {0}")]
    Api(#[from] reqwest::Error),
}

impl Error {
    /// Maps a failed read, keeping a missing file distinct from other I/O failures.
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(path)
        } else {
            Error::Io { path, source }
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
