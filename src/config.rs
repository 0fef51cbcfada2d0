//! Configuration management for diskplayer.
//!
//! Values are read from environment variables, optionally seeded from a
//! `.env` file in the local data directory:
//!
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (token path and Spotify endpoints only)

use std::{env, path::PathBuf};

use crate::{Error, Result};

pub const APP_DIR: &str = "diskplayer";

pub const RECORD_PATH: &str = "DISKPLAYER_RECORD_PATH";
pub const TOKEN_PATH: &str = "DISKPLAYER_TOKEN_PATH";
pub const DEBUG: &str = "DISKPLAYER_DEBUG";
pub const SPOTIFY_CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
pub const SPOTIFY_CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
pub const SPOTIFY_REDIRECT_URL: &str = "SPOTIFY_REDIRECT_URL";
pub const SPOTIFY_DEVICE_NAME: &str = "SPOTIFY_DEVICE_NAME";
pub const SPOTIFY_ACCOUNTS_URL: &str = "SPOTIFY_ACCOUNTS_URL";
pub const SPOTIFY_API_URL: &str = "SPOTIFY_API_URL";

pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Loads environment variables from `<data_local_dir>/diskplayer/.env`.
///
/// Creates the directory if it doesn't exist. A missing `.env` file is not an
/// error since every value can also come from the process environment;
/// variables already set in the environment win over the file.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/diskplayer/.env`
/// - macOS: `~/Library/Application Support/diskplayer/.env`
/// - Windows: `%LOCALAPPDATA%/diskplayer/.env`
pub async fn load_env() -> Result<()> {
    let dir = app_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| Error::write(&dir, e))?;

    let path = dir.join(".env");
    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Config(format!(
            "cannot load {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Platform data directory for diskplayer files.
pub fn app_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Path of the one-line file holding the Spotify URI to play.
pub fn record_path() -> Result<PathBuf> {
    required(RECORD_PATH).map(PathBuf::from)
}

/// Path of the serialized OAuth token.
pub fn token_path() -> PathBuf {
    optional(TOKEN_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|| app_dir().join("token.json"))
}

/// Returns the Spotify application client ID.
///
/// Read from `SPOTIFY_CLIENT_ID`; the value is shown on the application's
/// page in the Spotify developer dashboard.
///
/// # Errors
///
/// Returns [`Error::Config`] if the variable is unset or empty.
///
/// # Example
///
/// ```no_run
/// use diskplayer::config;
///
/// # fn main() -> diskplayer::Result<()> {
/// let client_id = config::spotify_client_id()?;
/// println!("logging in as {client_id}");
/// # Ok(())
/// # }
/// ```
pub fn spotify_client_id() -> Result<String> {
    required(SPOTIFY_CLIENT_ID)
}

/// Returns the Spotify application client secret (`SPOTIFY_CLIENT_SECRET`).
///
/// # Errors
///
/// Returns [`Error::Config`] if the variable is unset or empty.
pub fn spotify_client_secret() -> Result<String> {
    required(SPOTIFY_CLIENT_SECRET)
}

/// Returns the OAuth redirect URL registered for the application.
///
/// The callback server binds the host, port and path of this URL, so it
/// must point at this machine, e.g. `http://localhost:8888/callback`.
///
/// # Errors
///
/// Returns [`Error::Config`] if `SPOTIFY_REDIRECT_URL` is unset or empty.
/// The URL itself is validated later by the authenticator.
pub fn spotify_redirect_url() -> Result<String> {
    required(SPOTIFY_REDIRECT_URL)
}

/// Name of the Spotify Connect device playback is directed to.
pub fn spotify_device_name() -> Result<String> {
    required(SPOTIFY_DEVICE_NAME)
}

/// Returns the accounts service base URL.
///
/// `SPOTIFY_ACCOUNTS_URL` overrides [`DEFAULT_ACCOUNTS_URL`]. The value is
/// returned as configured; [`Authenticator::build`] rejects a malformed one.
///
/// [`Authenticator::build`]: crate::spotify::Authenticator::build
///
/// # Example
///
/// ```no_run
/// let accounts = diskplayer::config::spotify_accounts_url();
/// assert!(accounts.starts_with("http"));
/// ```
pub fn spotify_accounts_url() -> String {
    optional(SPOTIFY_ACCOUNTS_URL).unwrap_or_else(|| DEFAULT_ACCOUNTS_URL.to_string())
}

/// Returns the Web API base URL, `SPOTIFY_API_URL` or [`DEFAULT_API_URL`].
pub fn spotify_api_url() -> String {
    optional(SPOTIFY_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Whether `DISKPLAYER_DEBUG` is set to any non-empty value.
pub fn debug_enabled() -> bool {
    optional(DEBUG).is_some()
}

fn required(key: &str) -> Result<String> {
    optional(key).ok_or_else(|| Error::Config(format!("{key} must be set")))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
