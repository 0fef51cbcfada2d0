//! Playback control on the configured Spotify Connect device.
//!
//! `play` always lands on the configured device: if another device is active,
//! playback there is paused and transferred (without starting) before the
//! play command. `pause` only acts when the configured device is the active
//! one, so it never interrupts playback this tool did not start.

use std::path::Path;

use crate::{
    Error, Result, config, debug, info,
    management::{ClientProvider, InteractiveLogin, Provisioner},
    spotify::PlayerApi,
    types::Device,
    utils,
};

/// Playback controller bound to one device name.
pub struct Player<P> {
    provider: P,
    device_name: String,
}

impl Player<Provisioner<InteractiveLogin>> {
    /// Player over the configured token, credentials and device name.
    pub fn from_config() -> Result<Self> {
        Ok(Self::new(
            Provisioner::from_config(),
            config::spotify_device_name()?,
        ))
    }
}

impl<P: ClientProvider> Player<P> {
    /// Creates a player that obtains its client from `provider`.
    ///
    /// # Arguments
    ///
    /// * `provider` - source of an authenticated client, consulted once per
    ///   command
    /// * `device_name` - exact name of the Spotify Connect device to control
    pub fn new(provider: P, device_name: impl Into<String>) -> Self {
        Player {
            provider,
            device_name: device_name.into(),
        }
    }

    /// Name of the device this player controls, as matched against the
    /// device list (exact, case-sensitive).
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Plays the URI found on the first line of `path`.
    pub async fn play_path(&self, path: &Path) -> Result<()> {
        let uri = utils::read_first_line(path).await?;
        self.play_uri(&uri).await
    }

    /// Plays `uri` (album, playlist or track) on the configured device.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] for an empty URI, before any network call
    /// - [`Error::DeviceNotFound`] if no device carries the configured name
    /// - any client provisioning or API error
    pub async fn play_uri(&self, uri: &str) -> Result<()> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(Error::InvalidArgument("spotify URI is required".to_string()));
        }

        let client = self.provider.client().await?;
        let devices = client.devices().await?;
        let (device, device_id) = resolve_device(&devices, &self.device_name)?;

        if !device.is_active {
            match active_device(&devices) {
                Some(active) => info!(
                    "Transferring playback from {} to {}",
                    active.name, device.name
                ),
                None => info!("Transferring playback to {}", device.name),
            }
            client.pause().await?;
            client.transfer_playback(device_id, false).await?;
        }

        debug!("Playing {} on {} ({})", uri, device.name, device_id);
        client.play(device_id, uri).await
    }

    /// Pauses playback if the configured device is the active one; otherwise
    /// does nothing.
    ///
    /// Returns whether playback was actually paused.
    pub async fn pause(&self) -> Result<bool> {
        let client = self.provider.client().await?;
        let devices = client.devices().await?;
        let (device, _) = resolve_device(&devices, &self.device_name)?;

        if device.is_active {
            client.pause().await
        } else {
            debug!("{} is not the active device, nothing to pause", device.name);
            Ok(false)
        }
    }

    /// Devices currently visible to the account.
    pub async fn devices(&self) -> Result<Vec<Device>> {
        self.provider.client().await?.devices().await
    }
}

/// Finds the device named exactly `name` together with its ID.
///
/// Devices the API reports without an ID cannot be addressed and are skipped.
pub fn resolve_device<'a>(devices: &'a [Device], name: &str) -> Result<(&'a Device, &'a str)> {
    devices
        .iter()
        .filter(|device| device.name == name)
        .find_map(|device| device.id.as_deref().map(|id| (device, id)))
        .ok_or_else(|| Error::DeviceNotFound(name.to_string()))
}

/// The currently active device, if any.
pub fn active_device(devices: &[Device]) -> Option<&Device> {
    devices.iter().find(|device| device.is_active)
}
