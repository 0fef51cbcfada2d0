//! # CLI Module
//!
//! Command implementations behind the `diskplayer` binary. Each command builds
//! its collaborators from configuration, runs the operation and reports the
//! result; failures are printed through [`crate::error!`], which exits with
//! status 1.
//!
//! - [`play`] - Play the configured record file, a given file, or a URI
//! - [`pause`] - Pause the configured device if it is the active one
//! - [`auth`] - Force the browser login and store a fresh token
//! - [`devices`] - List Spotify Connect devices

mod auth;
mod devices;
mod pause;
mod play;

pub use auth::auth;
pub use devices::devices;
pub use pause::pause;
pub use play::play;
