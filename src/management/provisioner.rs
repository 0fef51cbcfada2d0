use crate::{
    Error, Result, info,
    management::TokenStore,
    server::CallbackServer,
    spotify::{Authenticator, PlayerApi, SpotifyClient},
    success,
    types::Token,
    utils, warning,
};

/// Anything that can hand out a ready-to-use API client.
#[allow(async_fn_in_trait)]
pub trait ClientProvider {
    type Client: PlayerApi;

    async fn client(&self) -> Result<Self::Client>;
}

/// The two ways of obtaining a client once the token file has been checked.
#[allow(async_fn_in_trait)]
pub trait LoginFlow {
    type Client: PlayerApi;

    /// Builds a client from a cached token without any network round-trip.
    fn from_token(&self, token: Token) -> Result<Self::Client>;

    /// Runs the interactive browser login.
    async fn login(&self) -> Result<Self::Client>;
}

/// Decides between the cached token and the interactive login.
pub struct Provisioner<L> {
    store: TokenStore,
    flow: L,
}

impl<L: LoginFlow> Provisioner<L> {
    pub fn new(store: TokenStore, flow: L) -> Self {
        Provisioner { store, flow }
    }
}

impl Provisioner<InteractiveLogin> {
    /// Provisioner over the configured token path and the browser login.
    pub fn from_config() -> Self {
        let store = TokenStore::from_config();
        Self::new(store.clone(), InteractiveLogin::new(store))
    }
}

impl<L: LoginFlow> ClientProvider for Provisioner<L> {
    type Client = L::Client;

    /// A missing token file starts the login; any other load failure,
    /// including a corrupt file, is returned as is.
    async fn client(&self) -> Result<Self::Client> {
        match self.store.load().await {
            Ok(token) => self.flow.from_token(token),
            Err(Error::NotFound(path)) => {
                info!("No token found at {}", path.display());
                self.flow.login().await
            }
            Err(e) => Err(e),
        }
    }
}

/// Browser-based authorization-code login against Spotify.
pub struct InteractiveLogin {
    store: TokenStore,
}

impl InteractiveLogin {
    pub fn new(store: TokenStore) -> Self {
        InteractiveLogin { store }
    }
}

impl LoginFlow for InteractiveLogin {
    type Client = SpotifyClient;

    fn from_token(&self, token: Token) -> Result<SpotifyClient> {
        let authenticator = Authenticator::build()?;
        Ok(SpotifyClient::new(token, authenticator, self.store.clone()))
    }

    async fn login(&self) -> Result<SpotifyClient> {
        let authenticator = Authenticator::build()?;
        let state = utils::generate_state();

        let mut server =
            CallbackServer::start(authenticator.clone(), self.store.clone(), state.clone()).await?;

        let auth_url = authenticator.authorization_url(&state);
        info!(
            "Please log in to Spotify by visiting the following page in your browser:\n{}",
            auth_url
        );
        if webbrowser::open(&auth_url).is_err() {
            warning!("Failed to open browser. Please navigate to the URL above manually.");
        }

        let pb = utils::spinner("Waiting for Spotify login...");
        let outcome = server.wait().await;
        pb.finish_and_clear();

        let stopped = server.shutdown().await;
        let client = outcome?;
        stopped?;

        success!("Login completed, token saved to {}", self.store.path().display());
        Ok(client)
    }
}
