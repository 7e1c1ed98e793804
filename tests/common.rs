#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use chat_session::config::{extract_config, ConfigV1};
use chat_session::models::{TokenPair, User};
use chat_session::startup::build_context;
use chat_session::state::SessionContext;
use chrono::Utc;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

pub fn config_yaml(base_url: &str, store: &str) -> String {
    format!(
        r#"
version: "1.0.0"
api:
  base_url: "{base_url}"
  timeout_in_ms: 3000
store:
{store}
routes:
  login: /login
  home: /home
  protected: [/home, /profile]
  guest_only: [/login, /register]
logging:
  level: debug
  format: json
"#
    )
}

pub fn load_test_config(yaml: &str) -> ConfigV1 {
    extract_config(Figment::new().merge(Yaml::string(yaml)))
        .expect("Failed to parse test config YAML")
}

/// A context backed by an in-memory store, talking to `base_url`.
pub fn memory_context(base_url: &str) -> SessionContext {
    let config = load_test_config(&config_yaml(base_url, "  type: memory"));
    build_context(Arc::new(config)).expect("context should build")
}

/// A context backed by a session file at `path`.
pub fn file_context(base_url: &str, path: &Path) -> SessionContext {
    let store = format!("  type: file\n  path: \"{}\"", path.display());
    let config = load_test_config(&config_yaml(base_url, &store));
    build_context(Arc::new(config)).expect("context should build")
}

/// A signed JWT expiring `exp_offset` seconds from now.
pub fn jwt(subject: &str, exp_offset: i64) -> String {
    encode(
        &Header::default(),
        &json!({ "sub": subject, "exp": Utc::now().timestamp() + exp_offset }),
        &EncodingKey::from_secret(b"test-secret"),
    )
    .expect("token should encode")
}

pub fn user_json(id: i64, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{}@example.com", username),
        "fullName": "Test User",
        "status": "ONLINE",
        "createdAt": "2024-01-01T00:00:00",
        "updatedAt": "2024-01-01T00:00:00"
    })
}

pub fn user(id: i64, username: &str) -> User {
    serde_json::from_value(user_json(id, username)).expect("user should parse")
}

pub fn auth_body(access: &str, refresh: &str) -> String {
    json!({
        "success": true,
        "message": "Token refreshed",
        "data": {
            "accessToken": access,
            "refreshToken": refresh,
            "tokenType": "Bearer",
            "user": user_json(1, "alice")
        }
    })
    .to_string()
}

pub fn user_body(id: i64, username: &str) -> String {
    json!({ "success": true, "data": user_json(id, username) }).to_string()
}

/// Stores a session as if a login had just happened.
pub fn seed_session(context: &SessionContext, access: &str, refresh: &str) {
    context
        .session
        .set_auth_data(
            &TokenPair {
                access_token: access.to_string(),
                refresh_token: refresh.to_string(),
                token_type: "Bearer".to_string(),
            },
            &user(1, "alice"),
        )
        .expect("seeding session should work");
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
