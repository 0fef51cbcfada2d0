use crate::{
    error,
    management::{InteractiveLogin, LoginFlow, TokenStore},
};

/// Runs the browser login regardless of any cached token.
pub async fn auth() {
    let login = InteractiveLogin::new(TokenStore::from_config());
    if let Err(e) = login.login().await {
        error!("Authentication failed: {}", e);
    }
}
