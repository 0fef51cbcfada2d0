use reqwest::Client;
use url::Url;

use crate::{
    Error, Result, config, debug,
    types::{Token, TokenResponse},
};

/// Scopes requested during login.
pub const SCOPES: [&str; 4] = [
    "user-read-private",
    "playlist-read-private",
    "user-modify-playback-state",
    "user-read-playback-state",
];

/// OAuth2 authorization-code flow configuration for the Spotify accounts
/// service.
///
/// Credentials are passed in explicitly; nothing here touches the process
/// environment.
#[derive(Debug, Clone)]
pub struct Authenticator {
    client_id: String,
    client_secret: String,
    redirect_url: Url,
    authorize_url: Url,
    token_url: Url,
    http: Client,
}

impl Authenticator {
    /// Creates an authenticator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `redirect_url` is not a valid absolute URL.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_url: &str,
    ) -> Result<Self> {
        let redirect_url = Url::parse(redirect_url).map_err(|e| {
            Error::Config(format!("invalid redirect URL '{redirect_url}': {e}"))
        })?;

        let (authorize_url, token_url) = accounts_endpoints(config::DEFAULT_ACCOUNTS_URL)?;

        Ok(Authenticator {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_url,
            authorize_url,
            token_url,
            http: Client::new(),
        })
    }

    /// Builds the authenticator from configured credentials, redirect URL and
    /// accounts service URL.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if a credential is unset or either URL is malformed.
    pub fn build() -> Result<Self> {
        Self::new(
            config::spotify_client_id()?,
            config::spotify_client_secret()?,
            &config::spotify_redirect_url()?,
        )?
        .with_accounts_url(&config::spotify_accounts_url())
    }

    /// Overrides the accounts service base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `accounts_url` is not a valid absolute URL.
    pub fn with_accounts_url(mut self, accounts_url: &str) -> Result<Self> {
        (self.authorize_url, self.token_url) = accounts_endpoints(accounts_url)?;
        Ok(self)
    }

    /// Redirect URL sent with the authorization request; the callback server
    /// binds to it.
    pub fn redirect_url(&self) -> &Url {
        &self.redirect_url
    }

    /// URL the user visits to grant consent, carrying `state` for the
    /// forgery check on the redirect.
    pub fn authorization_url(&self, state: &str) -> String {
        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", self.redirect_url.as_str())
            .append_pair("scope", &SCOPES.join(" "))
            .append_pair("state", state);
        url.into()
    }

    /// Exchanges an authorization code for a token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] if the accounts service rejects the code or
    /// cannot be reached.
    pub async fn exchange_code(&self, code: &str) -> Result<Token> {
        debug!("Exchanging authorization code for token");
        let response = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_url.as_str()),
            ])
            .await
            .map_err(|e| Error::Auth(format!("token exchange failed: {e}")))?;

        response.into_token(None)
    }

    /// Refreshes an expired token, keeping its refresh token if the response
    /// does not rotate it.
    pub async fn refresh(&self, token: &Token) -> Result<Token> {
        debug!("Refreshing access token");
        let response = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", token.refresh_token.as_str()),
            ])
            .await
            .map_err(|e| Error::Auth(format!("token refresh failed: {e}")))?;

        response.into_token(Some(&token.refresh_token))
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> reqwest::Result<TokenResponse> {
        self.http
            .post(self.token_url.clone())
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await?
            .error_for_status()?
            .json::<TokenResponse>()
            .await
    }
}

/// `/authorize` and `/api/token` under the accounts service base URL.
fn accounts_endpoints(accounts_url: &str) -> Result<(Url, Url)> {
    let base = accounts_url.trim_end_matches('/');
    let parse = |path: &str| {
        Url::parse(&format!("{base}{path}")).map_err(|e| {
            Error::Config(format!("invalid accounts URL '{accounts_url}': {e}"))
        })
    };
    Ok((parse("/authorize")?, parse("/api/token")?))
}
