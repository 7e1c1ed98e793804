use std::sync::Arc;

use tracing::{debug, info, warn};

use super::client::AuthClient;
use crate::config::RouteConfig;

/// Outcome of a navigation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    /// Navigation denied; go to this view instead.
    Redirect(String),
}

/// How a view is gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAccess {
    /// Requires a live session.
    Protected,
    /// Only for signed-out users (login, register).
    GuestOnly,
    Public,
}

/// Decides whether navigation to a view may proceed, refreshing the session
/// when a protected view is requested with a stale access token.
pub struct RouteGuard {
    auth: Arc<AuthClient>,
    routes: RouteConfig,
}

impl RouteGuard {
    pub fn new(auth: Arc<AuthClient>, routes: RouteConfig) -> Self {
        RouteGuard { auth, routes }
    }

    pub fn classify(&self, view: &str) -> ViewAccess {
        let view = normalize(view);
        if self.routes.protected.iter().any(|v| normalize(v) == view) {
            ViewAccess::Protected
        } else if self.routes.guest_only.iter().any(|v| normalize(v) == view) {
            ViewAccess::GuestOnly
        } else {
            ViewAccess::Public
        }
    }

    pub async fn check(&self, view: &str) -> Navigation {
        match self.classify(view) {
            ViewAccess::Protected => self.check_protected(view).await,
            ViewAccess::GuestOnly => self.check_guest_only(view),
            ViewAccess::Public => Navigation::Allow,
        }
    }

    async fn check_protected(&self, view: &str) -> Navigation {
        if self.auth.is_authenticated() {
            return Navigation::Allow;
        }

        if self.auth.stored_refresh_token().is_none() {
            debug!("No session for protected view '{}'", view);
            self.auth.clear_local();
            return self.to_login();
        }

        match self.auth.refresh_token().await {
            Ok(_) => {
                info!("Session refreshed while entering '{}'", view);
                Navigation::Allow
            }
            Err(e) => {
                warn!("Could not refresh session for '{}': {}", view, e);
                self.auth.logout().await;
                self.to_login()
            }
        }
    }

    fn check_guest_only(&self, view: &str) -> Navigation {
        if self.auth.is_authenticated() {
            debug!("Signed-in user sent away from guest view '{}'", view);
            Navigation::Redirect(self.routes.home.clone())
        } else {
            Navigation::Allow
        }
    }

    fn to_login(&self) -> Navigation {
        Navigation::Redirect(self.routes.login.clone())
    }
}

fn normalize(view: &str) -> &str {
    let trimmed = view.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionState;
    use crate::config::ApiConfig;
    use crate::store::MemoryStore;

    fn guard() -> RouteGuard {
        let session = Arc::new(SessionState::new(Arc::new(MemoryStore::new())));
        let api = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            auth_path: "/auth".to_string(),
            users_path: "/users".to_string(),
            timeout_in_ms: 100,
        };
        let auth = Arc::new(AuthClient::new(reqwest::Client::new(), api, session));
        RouteGuard::new(auth, RouteConfig::default())
    }

    #[test]
    fn test_classify_views() {
        let guard = guard();
        assert_eq!(guard.classify("/home"), ViewAccess::Protected);
        assert_eq!(guard.classify("/profile/"), ViewAccess::Protected);
        assert_eq!(guard.classify("/login"), ViewAccess::GuestOnly);
        assert_eq!(guard.classify("/register"), ViewAccess::GuestOnly);
        assert_eq!(guard.classify("/about"), ViewAccess::Public);
        assert_eq!(guard.classify("/"), ViewAccess::Public);
    }

    #[tokio::test]
    async fn test_signed_out_user_is_sent_to_login() {
        let guard = guard();
        assert_eq!(
            guard.check("/home").await,
            Navigation::Redirect("/login".to_string())
        );
        assert_eq!(guard.check("/login").await, Navigation::Allow);
        assert_eq!(guard.check("/about").await, Navigation::Allow);
    }
}
