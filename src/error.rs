//! Error taxonomy for session operations.

use thiserror::Error;

use crate::store::StoreError;

/// Everything that can go wrong while talking to the user service or
/// maintaining the local session.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The request never produced a response (connect, timeout, body decode).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success HTTP status.
    #[error("server responded with {status}: {message}")]
    Http { status: u16, message: String },

    /// The envelope came back with `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// A refresh was requested but no refresh token is stored.
    #[error("no refresh token available")]
    NoRefreshToken,

    /// A success envelope that is missing its payload.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("session store failure: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// HTTP status carried by the error, if the service produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::Http { status, .. } => Some(*status),
            AuthError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
