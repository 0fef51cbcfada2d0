use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::sync::Mutex;

use crate::{
    Error, Result, config, debug,
    management::TokenStore,
    spotify::{Authenticator, PlayerApi},
    types::{ApiErrorResponse, Device, DevicesResponse, Token, TransferPlaybackRequest},
    utils,
};

/// Authenticated Spotify Web API client.
///
/// Holds the token for the lifetime of one command. When the token is about
/// to expire it is refreshed and written back through the [`TokenStore`]
/// before the request goes out.
#[derive(Debug)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token: Mutex<Token>,
    authenticator: Authenticator,
    store: TokenStore,
}

impl SpotifyClient {
    /// Creates a client around an already obtained token.
    ///
    /// # Arguments
    ///
    /// * `token` - token to start with; refreshed on demand
    /// * `authenticator` - used for refreshes
    /// * `store` - where refreshed tokens are written
    pub fn new(token: Token, authenticator: Authenticator, store: TokenStore) -> Self {
        SpotifyClient {
            http: Client::new(),
            api_url: config::spotify_api_url().trim_end_matches('/').to_string(),
            token: Mutex::new(token),
            authenticator,
            store,
        }
    }

    /// Overrides the Web API base URL.
    ///
    /// The default comes from [`config::spotify_api_url`]. A trailing slash is
    /// dropped so paths can be appended as-is.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use diskplayer::{management::TokenStore, spotify::{Authenticator, SpotifyClient}};
    /// # fn demo(token: diskplayer::types::Token, auth: Authenticator, store: TokenStore) {
    /// let client = SpotifyClient::new(token, auth, store)
    ///     .with_api_url("http://127.0.0.1:9000/v1/");
    /// # }
    /// ```
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Snapshot of the token currently in use.
    pub async fn token(&self) -> Token {
        self.token.lock().await.clone()
    }

    async fn access_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if token.is_expired() {
            let refreshed = self.authenticator.refresh(&token).await?;
            self.store.save(&refreshed).await?;
            *token = refreshed;
        }
        Ok(token.access_token.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let token = self.access_token().await?;
        Ok(request.bearer_auth(token).send().await?)
    }
}

impl PlayerApi for SpotifyClient {
    async fn devices(&self) -> Result<Vec<Device>> {
        let response = self
            .send(self.http.get(self.url("/me/player/devices")))
            .await?
            .error_for_status()?;

        let body = response.json::<DevicesResponse>().await?;
        debug!("Found {} device(s)", body.devices.len());
        Ok(body.devices)
    }

    async fn pause(&self) -> Result<bool> {
        let response = self
            .send(self.http.put(self.url("/me/player/pause")))
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("Pause ignored, no active device");
                Ok(false)
            }
            StatusCode::FORBIDDEN => {
                let body = response
                    .json::<ApiErrorResponse>()
                    .await
                    .unwrap_or_default()
                    .error;
                if body.is_already_paused() {
                    debug!("Pause ignored, nothing is playing ({})", body.message);
                    return Ok(false);
                }
                Err(Error::Player {
                    reason: body.reason.unwrap_or_else(|| "UNKNOWN".to_string()),
                    message: body.message,
                })
            }
            _ => {
                response.error_for_status()?;
                Ok(true)
            }
        }
    }

    async fn transfer_playback(&self, device_id: &str, play: bool) -> Result<()> {
        let body = TransferPlaybackRequest {
            device_ids: vec![device_id.to_string()],
            play,
        };
        self.send(self.http.put(self.url("/me/player")).json(&body))
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn play(&self, device_id: &str, uri: &str) -> Result<()> {
        let request = self
            .http
            .put(self.url("/me/player/play"))
            .query(&[("device_id", device_id)])
            .json(&utils::play_request(uri));

        self.send(request).await?.error_for_status()?;
        Ok(())
    }
}
