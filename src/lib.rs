//! Diskplayer library
//!
//! Plays a stored Spotify album, playlist or track on one designated Spotify
//! Connect device, or pauses it. The library owns the OAuth token lifecycle
//! (cached token file, interactive login through a one-shot local callback
//! server) and the device selection and transfer logic.
//!
//! # Modules
//!
//! - `api` - HTTP handler for the OAuth redirect
//! - `cli` - Command implementations invoked by the binary
//! - `config` - Configuration from environment variables and `.env`
//! - `error` - Error taxonomy shared by every operation
//! - `management` - Token storage and client provisioning
//! - `player` - Device resolution, transfer and play/pause
//! - `server` - One-shot callback receiver for the login flow
//! - `spotify` - Authenticator and Web API client
//! - `types` - Data structures and wire types
//! - `utils` - Small helpers

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod player;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{Error, Result};

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Transferring playback to {}", name);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the command layer uses this; library code returns [`Error`] instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a dimmed diagnostic line when `DISKPLAYER_DEBUG` is set.
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ({
    if $crate::config::debug_enabled() {
      use colored::Colorize;
      println!("[{}] {}", "·".dimmed(), std::format!($($arg)*).dimmed());
    }
  })
}
