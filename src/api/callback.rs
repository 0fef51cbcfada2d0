use std::sync::Arc;

use axum::{Extension, extract::Query, http::StatusCode, response::Html};
use tokio::sync::{Mutex, oneshot};

use crate::{
    Error, Result,
    management::TokenStore,
    spotify::{Authenticator, SpotifyClient},
    types::CallbackParams,
    warning,
};

/// Single-slot handoff from the callback handler to the waiting caller.
pub type ClientSlot = Arc<Mutex<Option<oneshot::Sender<Result<SpotifyClient>>>>>;

/// Everything the redirect handler needs to finish the login.
#[derive(Clone)]
pub struct CallbackContext {
    pub expected_state: String,
    pub authenticator: Authenticator,
    pub store: TokenStore,
    pub slot: ClientSlot,
}

pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(ctx): Extension<CallbackContext>,
) -> (StatusCode, Html<&'static str>) {
    let Some(sender) = ctx.slot.lock().await.take() else {
        return (
            StatusCode::GONE,
            Html("<h4>Login already handled.</h4><p>Close browser window.</p>"),
        );
    };

    let (status, page, outcome) = complete_login(params, &ctx).await;
    if let Err(e) = &outcome {
        warning!("{}", e);
    }

    // the waiter only goes away if the command was aborted
    let _ = sender.send(outcome);
    (status, Html(page))
}

async fn complete_login(
    params: CallbackParams,
    ctx: &CallbackContext,
) -> (StatusCode, &'static str, Result<SpotifyClient>) {
    let state = params.state.unwrap_or_default();
    if state != ctx.expected_state {
        return (
            StatusCode::NOT_FOUND,
            "<h4>Not found.</h4>",
            Err(Error::Auth(format!(
                "state mismatch: {state} != {}",
                ctx.expected_state
            ))),
        );
    }

    let Some(code) = params.code else {
        let reason = params
            .error
            .unwrap_or_else(|| "missing authorization code".to_string());
        return (
            StatusCode::FORBIDDEN,
            "<h4>Login failed.</h4>",
            Err(Error::Auth(reason)),
        );
    };

    let token = match ctx.authenticator.exchange_code(&code).await {
        Ok(token) => token,
        Err(e) => return (StatusCode::FORBIDDEN, "<h4>Couldn't get token.</h4>", Err(e)),
    };

    if let Err(e) = ctx.store.save(&token).await {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "<h4>Couldn't save token.</h4>",
            Err(e),
        );
    }

    let client = SpotifyClient::new(token, ctx.authenticator.clone(), ctx.store.clone());
    (
        StatusCode::OK,
        "<h2>Login Completed!</h2><p>Close browser window.</p>",
        Ok(client),
    )
}
