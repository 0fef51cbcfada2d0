use std::{path::Path, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, distr::Alphanumeric};

use crate::{Error, Result, types::PlayRequest};

const STATE_LEN: usize = 32;

/// Random opaque value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LEN)
        .map(char::from)
        .collect()
}

pub fn is_track_uri(uri: &str) -> bool {
    uri.starts_with("spotify:track:")
}

/// Builds the play request body for a Spotify URI.
pub fn play_request(uri: &str) -> PlayRequest {
    if is_track_uri(uri) {
        PlayRequest {
            context_uri: None,
            uris: Some(vec![uri.to_string()]),
        }
    } else {
        PlayRequest {
            context_uri: Some(uri.to_string()),
            uris: None,
        }
    }
}

/// Reads the first line of a text file, trimmed.
///
/// Fails with [`Error::NotFound`] for a missing file and
/// [`Error::InvalidArgument`] when the first line is blank.
pub async fn read_first_line(path: &Path) -> Result<String> {
    let content = async_fs::read_to_string(path)
        .await
        .map_err(|e| Error::read(path, e))?;

    let line = content.lines().next().unwrap_or_default().trim();
    if line.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "unable to read line from path: {}",
            path.display()
        )));
    }

    Ok(line.to_string())
}

/// Steadily ticking spinner; callers finish it when the wait is over.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
