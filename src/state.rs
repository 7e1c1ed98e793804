//! The assembled session components.
//!
//! Everything here shares one token store and one session state, so a
//! refresh performed by the authenticator is immediately visible to the
//! guard and to subscribers.

use std::sync::Arc;

use crate::auth::{AuthClient, RouteGuard, SessionState};
use crate::client::{RequestAuthenticator, UsersApi};
use crate::config::ConfigV1;
use crate::store::TokenStore;

/// Handles to every session component, built by [`crate::startup::build_context`].
#[derive(Clone)]
pub struct SessionContext {
    /// Configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Durable storage for the token pair and cached user.
    pub store: Arc<dyn TokenStore>,
    /// Observable current user / authenticated flag.
    pub session: Arc<SessionState>,
    /// Login, register, refresh and logout.
    pub auth: Arc<AuthClient>,
    /// Authenticating wrapper for every non-auth request.
    pub authenticator: Arc<RequestAuthenticator>,
    pub users: Arc<UsersApi>,
    pub guard: Arc<RouteGuard>,
}
