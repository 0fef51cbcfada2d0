//! # Spotify Integration Module
//!
//! The Spotify side of diskplayer: the OAuth2 [`auth::Authenticator`] and the
//! Web API [`client::SpotifyClient`] covering the handful of player endpoints
//! the tool needs.
//!
//! ```text
//! player::Player
//!      ↓
//! PlayerApi (devices, pause, transfer, play)
//!      ↓
//! SpotifyClient ──(expired token)──> Authenticator::refresh ──> TokenStore::save
//!      ↓
//! Spotify Web API
//! ```
//!
//! [`PlayerApi`] is the seam the playback controller is written against, so
//! the device logic can run against an in-memory double in tests.

pub mod auth;
pub mod client;

pub use auth::Authenticator;
pub use client::SpotifyClient;

use crate::{Result, types::Device};

/// Player operations of the Spotify Web API.
#[allow(async_fn_in_trait)]
pub trait PlayerApi {
    /// Devices currently visible to the account.
    async fn devices(&self) -> Result<Vec<Device>>;

    /// Pauses playback on the active device.
    ///
    /// Returns `false` instead of failing when there was nothing to pause.
    async fn pause(&self) -> Result<bool>;

    /// Makes `device_id` the active device, starting playback only if `play`.
    async fn transfer_playback(&self, device_id: &str, play: bool) -> Result<()>;

    /// Starts playing `uri` on `device_id`.
    async fn play(&self, device_id: &str, uri: &str) -> Result<()>;
}
