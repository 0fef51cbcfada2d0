use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::{Error, Result};

/// Seconds before expiry at which a token is treated as stale.
pub const EXPIRY_MARGIN_SECS: i64 = 240;

/// OAuth token as persisted in the token file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub expiry: DateTime<Utc>,
    pub token_type: String,
}

impl Token {
    /// True once the token is within [`EXPIRY_MARGIN_SECS`] of its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= self.expiry
    }
}

/// Body returned by the accounts service token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Converts into a [`Token`], falling back to `previous_refresh` when the
    /// response carries no refresh token (the refresh grant may omit it).
    ///
    /// # Errors
    ///
    /// [`Error::Auth`] if `expires_in` is negative or puts the expiry out of
    /// the representable date range.
    pub fn into_token(self, previous_refresh: Option<&str>) -> Result<Token> {
        let expiry = Duration::try_seconds(self.expires_in)
            .filter(|lifetime| *lifetime >= Duration::zero())
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                Error::Auth(format!(
                    "token response has unusable expires_in: {}",
                    self.expires_in
                ))
            })?;

        Ok(Token {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh.map(str::to_string))
                .unwrap_or_default(),
            expiry,
            token_type: self.token_type,
        })
    }
}

/// A Spotify Connect device as reported by `GET /me/player/devices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: Option<String>,
    pub name: String,
    pub is_active: bool,
    #[serde(rename = "type", default)]
    pub device_type: String,
    #[serde(default)]
    pub volume_percent: Option<u32>,
}

impl Device {
    pub fn new(id: &str, name: &str, is_active: bool) -> Self {
        Device {
            id: Some(id.to_string()),
            name: name.to_string(),
            is_active,
            device_type: String::new(),
            volume_percent: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DevicesResponse {
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferPlaybackRequest {
    pub device_ids: Vec<String>,
    pub play: bool,
}

/// Body of `PUT /me/player/play`.
///
/// Albums and playlists are sent as `context_uri`; tracks are not valid
/// contexts and go through `uris` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uris: Option<Vec<String>>,
}

/// Error envelope the Web API sends with a failed request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
    /// Player error reason such as `PREMIUM_REQUIRED`; only present on
    /// player endpoints.
    #[serde(default)]
    pub reason: Option<String>,
}

impl ApiErrorBody {
    /// True for the 403 reasons the player gives when there is nothing to
    /// pause.
    pub fn is_already_paused(&self) -> bool {
        let restriction = self.message.to_lowercase().contains("restriction violated");
        matches!(self.reason.as_deref(), Some("UNKNOWN" | "ALREADY_PAUSED")) || restriction
    }
}

/// Query parameters of the OAuth redirect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Tabled)]
pub struct DeviceTableRow {
    pub name: String,
    #[tabled(rename = "type")]
    pub device_type: String,
    pub active: String,
    pub id: String,
}

impl From<&Device> for DeviceTableRow {
    fn from(device: &Device) -> Self {
        DeviceTableRow {
            name: device.name.clone(),
            device_type: device.device_type.clone(),
            active: if device.is_active { "yes" } else { "" }.to_string(),
            id: device.id.clone().unwrap_or_default(),
        }
    }
}
