pub mod authenticator;
pub mod users;

pub use authenticator::{is_auth_endpoint, RequestAuthenticator};
pub use users::UsersApi;
