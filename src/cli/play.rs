use std::path::PathBuf;

use crate::{config, error, player::Player, success};

/// Plays `uri` if given, else the first line of `path`, else the first line
/// of the configured record file.
pub async fn play(path: Option<PathBuf>, uri: Option<String>) {
    let player = match Player::from_config() {
        Ok(player) => player,
        Err(e) => error!("{}", e),
    };

    let result = match (uri, path) {
        (Some(uri), _) => player.play_uri(&uri).await,
        (None, Some(path)) => player.play_path(&path).await,
        (None, None) => match config::record_path() {
            Ok(path) => player.play_path(&path).await,
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => success!("Playing on {}", player.device_name()),
        Err(e) => error!("Failed to start playback: {}", e),
    }
}
