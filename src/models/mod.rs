pub mod envelope;
pub mod token;
pub mod user;

pub use envelope::ApiResponse;
pub use token::{AuthPayload, LoginRequest, RevokeRequest, TokenPair};
pub use user::{RegisterRequest, User, UserUpdateRequest};
