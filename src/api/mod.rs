//! # API Module
//!
//! HTTP handlers served by the one-shot login server in [`crate::server`].
//!
//! - [`callback`] - Receives the OAuth redirect, checks `state`, exchanges the
//!   code, persists the token and hands a ready client to the waiting caller.
//!   Any failure is handed over the same way, so the caller decides how the
//!   command ends.

mod callback;

pub use callback::{CallbackContext, ClientSlot, callback};
