use std::sync::Arc;

use http::header::CONTENT_TYPE;
use tracing::{debug, error, info, warn};

use super::session::SessionState;
use super::token;
use crate::config::ApiConfig;
use crate::error::AuthError;
use crate::models::{AuthPayload, LoginRequest, RegisterRequest, RevokeRequest, User};
use crate::utils::http_helpers::{read_envelope, read_unit_envelope};

/// Talks to the auth endpoints and keeps [`SessionState`] in step with them.
///
/// Requests made here go out without a bearer token: login, register and
/// refresh are auth endpoints, and logout runs after local state is gone.
pub struct AuthClient {
    http: reqwest::Client,
    api: ApiConfig,
    session: Arc<SessionState>,
}

impl AuthClient {
    pub fn new(http: reqwest::Client, api: ApiConfig, session: Arc<SessionState>) -> Self {
        info!("Creating auth client for '{}'", api.auth_url(""));
        AuthClient { http, api, session }
    }

    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    /// Signs in and stores the returned session.
    ///
    /// On any failure the session is left untouched.
    pub async fn login(
        &self,
        username_or_email: &str,
        password: &str,
    ) -> Result<AuthPayload, AuthError> {
        debug!("Logging in as '{}'", username_or_email);
        let request = LoginRequest {
            username_or_email: username_or_email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.api.auth_url("login"))
            .json(&request)
            .send()
            .await?;
        let payload: AuthPayload = read_envelope(response).await?;

        self.session
            .set_auth_data(&payload.token_pair(), &payload.user)?;
        Ok(payload)
    }

    /// Creates an account. Does not sign in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, AuthError> {
        debug!("Registering user '{}'", request.username);
        let response = self
            .http
            .post(self.api.auth_url("register"))
            .json(request)
            .send()
            .await?;
        let user: User = read_envelope(response).await?;
        info!("Registered user '{}' with id {}", user.username, user.id);
        Ok(user)
    }

    /// Exchanges the stored refresh token for a new pair.
    ///
    /// Without a stored refresh token the session is cleared and
    /// [`AuthError::NoRefreshToken`] returned before any network call. A
    /// failed exchange leaves the session as it was; callers decide whether
    /// to sign out.
    pub async fn refresh_token(&self) -> Result<AuthPayload, AuthError> {
        let Some(refresh_token) = self.session.refresh_token() else {
            warn!("Refresh requested without a stored refresh token; clearing session");
            self.clear_local();
            return Err(AuthError::NoRefreshToken);
        };

        debug!("Refreshing access token");
        let response = self
            .http
            .post(self.api.auth_url("refresh"))
            .header(CONTENT_TYPE, "text/plain")
            .body(refresh_token)
            .send()
            .await?;
        let payload: AuthPayload = read_envelope(response).await?;

        self.session
            .set_auth_data(&payload.token_pair(), &payload.user)?;
        info!("Access token refreshed for '{}'", payload.user.username);
        Ok(payload)
    }

    /// Signs out. Local state is cleared first and unconditionally; the
    /// service is then asked to revoke the refresh token, if there was one.
    /// Revocation failures are logged, never returned.
    pub async fn logout(&self) {
        let refresh_token = self.session.refresh_token();
        self.clear_local();

        let Some(refresh_token) = refresh_token else {
            debug!("No refresh token to revoke");
            return;
        };

        match self.revoke(refresh_token).await {
            Ok(()) => info!("Refresh token revoked"),
            Err(e) => warn!(
                "Failed to revoke refresh token, local logout still complete: {}",
                e
            ),
        }
    }

    /// Drops the local session without contacting the service.
    pub fn clear_local(&self) {
        if let Err(e) = self.session.clear_auth_data() {
            error!("Failed to remove session from store: {}", e);
        }
    }

    async fn revoke(&self, refresh_token: String) -> Result<(), AuthError> {
        let response = self
            .http
            .post(self.api.auth_url("logout"))
            .json(&RevokeRequest { refresh_token })
            .send()
            .await?;
        read_unit_envelope(response).await
    }

    pub fn is_token_expired(&self, token: &str) -> bool {
        token::is_token_expired(token)
    }

    /// True if an access token is stored and has not expired.
    pub fn is_authenticated(&self) -> bool {
        self.session
            .access_token()
            .map(|t| !self.is_token_expired(&t))
            .unwrap_or(false)
    }

    pub fn access_token(&self) -> Option<String> {
        self.session.access_token()
    }

    pub fn stored_refresh_token(&self) -> Option<String> {
        self.session.refresh_token()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }
}
