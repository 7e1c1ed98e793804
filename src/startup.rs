//! Component wiring.
//!
//! Builds the token store, session state, auth client, request
//! authenticator, users API and route guard from a loaded configuration.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::auth::{AuthClient, RouteGuard, SessionState};
use crate::client::{RequestAuthenticator, UsersApi};
use crate::config::ConfigV1;
use crate::error::AuthError;
use crate::state::SessionContext;
use crate::store::create_store;

/// Builds every session component from `config`.
///
/// # Errors
///
/// Returns an error if the store backend cannot be opened or the HTTP
/// client cannot be constructed.
pub fn build_context(config: Arc<ConfigV1>) -> Result<SessionContext, AuthError> {
    let store = create_store(&config.store)?;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.api.timeout_in_ms))
        .build()?;

    let session = Arc::new(SessionState::new(store.clone()));
    let auth = Arc::new(AuthClient::new(
        http.clone(),
        config.api.clone(),
        session.clone(),
    ));
    let authenticator = Arc::new(RequestAuthenticator::new(http, auth.clone()));
    let users = Arc::new(UsersApi::new(authenticator.clone(), config.api.clone()));
    let guard = Arc::new(RouteGuard::new(auth.clone(), config.routes.clone()));

    info!(
        "Session context ready for {} (store: {})",
        config.api.base_url,
        store.get_name()
    );

    Ok(SessionContext {
        config,
        store,
        session,
        auth,
        authenticator,
        users,
        guard,
    })
}
