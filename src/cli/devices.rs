use tabled::Table;

use crate::{
    config, error, info,
    management::{ClientProvider, Provisioner},
    player,
    spotify::PlayerApi,
    types::DeviceTableRow,
    warning,
};

/// Lists devices and flags whether the configured one is among them.
pub async fn devices() {
    let client = match Provisioner::from_config().client().await {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    };

    let devices = match client.devices().await {
        Ok(devices) => devices,
        Err(e) => error!("Failed to list devices: {}", e),
    };

    if devices.is_empty() {
        warning!("No Spotify Connect devices available");
        return;
    }

    let rows: Vec<DeviceTableRow> = devices.iter().map(DeviceTableRow::from).collect();
    println!("{}", Table::new(rows));

    if let Ok(name) = config::spotify_device_name() {
        match player::resolve_device(&devices, &name) {
            Ok((device, _)) if device.is_active => info!("{} is the active device", name),
            Ok(_) => info!("{} is available but not active", name),
            Err(e) => warning!("{}", e),
        }
    }
}
