use std::sync::Arc;

use http::Method;
use tracing::debug;

use super::authenticator::RequestAuthenticator;
use crate::config::ApiConfig;
use crate::error::AuthError;
use crate::models::{User, UserUpdateRequest};
use crate::utils::http_helpers::read_envelope;

/// Typed access to the user endpoints, authenticated through the session.
pub struct UsersApi {
    authenticator: Arc<RequestAuthenticator>,
    api: ApiConfig,
}

impl UsersApi {
    pub fn new(authenticator: Arc<RequestAuthenticator>, api: ApiConfig) -> Self {
        UsersApi { authenticator, api }
    }

    pub async fn get_user(&self, id: i64) -> Result<User, AuthError> {
        debug!("Fetching user {}", id);
        let request = self
            .authenticator
            .request(Method::GET, &self.api.users_url(&id.to_string()))
            .build()?;
        read_envelope(self.authenticator.execute(request).await?).await
    }

    /// Updates the profile fields that are set in `update`.
    pub async fn update_user(&self, id: i64, update: &UserUpdateRequest) -> Result<User, AuthError> {
        debug!("Updating user {}", id);
        let request = self
            .authenticator
            .request(Method::PUT, &self.api.users_url(&id.to_string()))
            .json(update)
            .build()?;
        read_envelope(self.authenticator.execute(request).await?).await
    }

    pub async fn search_users(&self, keyword: &str) -> Result<Vec<User>, AuthError> {
        debug!("Searching users for '{}'", keyword);
        let request = self
            .authenticator
            .request(Method::GET, &self.api.users_url("search"))
            .query(&[("keyword", keyword)])
            .build()?;
        read_envelope(self.authenticator.execute(request).await?).await
    }
}
