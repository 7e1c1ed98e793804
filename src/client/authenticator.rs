//! Bearer attachment and the refresh-and-retry cycle for outgoing requests.
//!
//! Each request moves through at most these steps:
//!
//! ```text
//! NotSent -> Sent -> Success
//!                 -> AuthFailed -> Retried -> Success | Failure
//! ```
//!
//! `AuthFailed` is only entered on a 401 from a non-auth endpoint while a
//! refresh token is stored, and `Retried` never loops back.

use std::sync::Arc;

use http::header::{HeaderValue, AUTHORIZATION};
use http::{Method, StatusCode};
use reqwest::{Request, RequestBuilder, Response, Url};
use tracing::{debug, warn};

use crate::auth::AuthClient;
use crate::error::AuthError;

/// Path segments that mark an auth endpoint.
const AUTH_SEGMENTS: [&str; 3] = ["login", "register", "refresh"];

/// True if any path segment of `url` is `login`, `register` or `refresh`.
///
/// Auth endpoints never carry a bearer token and never trigger a refresh.
pub fn is_auth_endpoint(url: &Url) -> bool {
    url.path_segments()
        .map(|mut segments| segments.any(|s| AUTH_SEGMENTS.contains(&s)))
        .unwrap_or(false)
}

/// Wraps a `reqwest::Client` so every request is authenticated from the
/// current session and survives one access-token expiry.
pub struct RequestAuthenticator {
    http: reqwest::Client,
    auth: Arc<AuthClient>,
}

/// What happened to the first attempt.
enum FirstAttempt {
    Done(Response),
    AuthFailed { response: Response, replay: Option<Request> },
}

impl RequestAuthenticator {
    pub fn new(http: reqwest::Client, auth: Arc<AuthClient>) -> Self {
        RequestAuthenticator { http, auth }
    }

    pub fn auth(&self) -> &Arc<AuthClient> {
        &self.auth
    }

    /// Starts a request to be passed to [`RequestAuthenticator::execute`].
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Sends `request`, returning the response to the caller unchanged unless
    /// it is a 401 that a token refresh can fix.
    ///
    /// If the refresh itself fails the local session is cleared and the
    /// refresh error is returned instead of the 401.
    pub async fn execute(&self, request: Request) -> Result<Response, AuthError> {
        match self.send_first(request).await? {
            FirstAttempt::Done(response) => Ok(response),
            FirstAttempt::AuthFailed {
                response,
                replay: None,
            } => {
                warn!("Request body cannot be replayed; returning 401 without refresh");
                Ok(response)
            }
            FirstAttempt::AuthFailed {
                replay: Some(replay),
                ..
            } => self.refresh_and_retry(replay).await,
        }
    }

    async fn send_first(&self, request: Request) -> Result<FirstAttempt, AuthError> {
        let exempt = is_auth_endpoint(request.url());
        // Cloned before the bearer header goes on, so a retry carries only the new token.
        let replay = if exempt { None } else { request.try_clone() };

        let request = self.authorize(request, exempt);
        debug!("Sending {} {}", request.method(), request.url());
        let response = self.http.execute(request).await?;

        if response.status() != StatusCode::UNAUTHORIZED || exempt {
            return Ok(FirstAttempt::Done(response));
        }
        if self.auth.stored_refresh_token().is_none() {
            debug!("401 received with no refresh token stored; passing it through");
            return Ok(FirstAttempt::Done(response));
        }
        Ok(FirstAttempt::AuthFailed { response, replay })
    }

    async fn refresh_and_retry(&self, replay: Request) -> Result<Response, AuthError> {
        debug!("401 on {}; refreshing session before retry", replay.url());
        if let Err(e) = self.auth.refresh_token().await {
            warn!("Token refresh failed, signing out locally: {}", e);
            self.auth.clear_local();
            return Err(e);
        }

        let request = self.authorize(replay, false);
        debug!("Retrying {} {}", request.method(), request.url());
        Ok(self.http.execute(request).await?)
    }

    fn authorize(&self, mut request: Request, exempt: bool) -> Request {
        if exempt {
            return request;
        }
        let Some(token) = self.auth.access_token() else {
            return request;
        };
        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(value) => {
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            Err(_) => warn!("Stored access token is not a valid header value; sending without it"),
        }
        request
    }
}
