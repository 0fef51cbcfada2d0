use crate::{error, info, player::Player, success};

pub async fn pause() {
    let player = match Player::from_config() {
        Ok(player) => player,
        Err(e) => error!("{}", e),
    };

    match player.pause().await {
        Ok(true) => success!("Paused"),
        Ok(false) => info!("Nothing playing on {}", player.device_name()),
        Err(e) => error!("Failed to pause playback: {}", e),
    }
}
