use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Extension, Router, routing::get};
use tokio::{
    net::TcpListener,
    sync::{Mutex, oneshot},
    task::JoinHandle,
};
use url::Url;

use crate::{
    Error, Result,
    api::{self, CallbackContext},
    debug,
    management::TokenStore,
    spotify::{Authenticator, SpotifyClient},
    warning,
};

/// Grace period for in-flight responses when the server stops.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Port used when the redirect URL does not name one.
pub const DEFAULT_CALLBACK_PORT: u16 = 8888;

/// One-shot local HTTP server receiving the OAuth redirect.
///
/// Accepts a single callback, delivers its outcome through a single-slot
/// channel and is then shut down by the owner with [`CallbackServer::shutdown`].
pub struct CallbackServer {
    addr: SocketAddr,
    outcome: Option<oneshot::Receiver<Result<SpotifyClient>>>,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl CallbackServer {
    /// Binds the host, port and path of the authenticator's redirect URL.
    pub async fn start(
        authenticator: Authenticator,
        store: TokenStore,
        expected_state: String,
    ) -> Result<Self> {
        let (addr, path) = bind_target(authenticator.redirect_url())?;
        Self::bind(addr, &path, authenticator, store, expected_state).await
    }

    /// Binds `addr` and serves the callback on `path`.
    pub async fn bind(
        addr: SocketAddr,
        path: &str,
        authenticator: Authenticator,
        store: TokenStore,
        expected_state: String,
    ) -> Result<Self> {
        let (tx, rx) = oneshot::channel();
        let ctx = CallbackContext {
            expected_state,
            authenticator,
            store,
            slot: Arc::new(Mutex::new(Some(tx))),
        };

        let app = Router::new().route(path, get(api::callback).layer(Extension(ctx)));

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("cannot bind callback server to {addr}: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| Error::Config(format!("cannot read callback server address: {e}")))?;

        let (stop, stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = stopped.await;
                })
                .await
        });

        debug!("Callback server listening on http://{}{}", addr, path);
        Ok(CallbackServer {
            addr,
            outcome: Some(rx),
            stop,
            handle,
        })
    }

    /// Address actually bound; differs from the requested one when port 0
    /// was asked for.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Blocks until the callback delivers a client or a login failure.
    ///
    /// # Errors
    ///
    /// [`Error::Auth`] when the redirect failed validation or the code
    /// exchange failed, or when called a second time.
    pub async fn wait(&mut self) -> Result<SpotifyClient> {
        let Some(rx) = self.outcome.take() else {
            return Err(Error::Auth("callback already received".to_string()));
        };

        rx.await
            .map_err(|_| Error::Auth("callback server stopped before login completed".to_string()))?
    }

    /// Stops the server, allowing [`SHUTDOWN_GRACE`] for in-flight responses.
    ///
    /// # Errors
    ///
    /// [`Error::Auth`] if the server loop ended with an I/O error or its task
    /// panicked. A server that overruns the grace period is aborted, not
    /// reported.
    pub async fn shutdown(self) -> Result<()> {
        let CallbackServer { addr, stop, mut handle, .. } = self;

        let _ = stop.send(());
        match tokio::time::timeout(SHUTDOWN_GRACE, &mut handle).await {
            Ok(Ok(Ok(()))) => {
                debug!("Callback server on {} stopped", addr);
                Ok(())
            }
            Ok(Ok(Err(e))) => Err(Error::Auth(format!(
                "callback server on {addr} failed: {e}"
            ))),
            Ok(Err(e)) => Err(Error::Auth(format!("callback server task failed: {e}"))),
            Err(_) => {
                warning!(
                    "Callback server did not stop within {}s, aborting",
                    SHUTDOWN_GRACE.as_secs()
                );
                handle.abort();
                Ok(())
            }
        }
    }
}

/// Socket address and route for a redirect URL; `localhost` binds 127.0.0.1.
pub fn bind_target(redirect_url: &Url) -> Result<(SocketAddr, String)> {
    let host = redirect_url
        .host_str()
        .ok_or_else(|| Error::Config(format!("redirect URL '{redirect_url}' has no host")))?;
    let host = if host == "localhost" { "127.0.0.1" } else { host };
    let port = redirect_url.port().unwrap_or(DEFAULT_CALLBACK_PORT);

    let addr = format!("{host}:{port}").parse::<SocketAddr>().map_err(|e| {
        Error::Config(format!(
            "redirect URL host '{host}' is not a local address: {e}"
        ))
    })?;

    Ok((addr, redirect_url.path().to_string()))
}
