//! Library exports for chat-session, shared between the binary and tests.
//!
//! Client-side session handling for the chat service: a durable token
//! store, observable session state, the auth client, a request
//! authenticator that refreshes on 401, and a route guard.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod startup;
pub mod state;
pub mod store;
pub mod utils;

pub use error::AuthError;
