pub mod client;
pub mod guard;
pub mod session;
pub mod token;

// Re-export so we can do "use crate::auth::*;"
pub use client::AuthClient;
pub use guard::{Navigation, RouteGuard, ViewAccess};
pub use session::{SessionSnapshot, SessionState};
pub use token::{is_token_expired, is_token_expired_at};
