use std::path::Path;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::store::StoreConfig;

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: where the service lives, where the session is
/// kept, which views are guarded, and how to log.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    pub api: ApiConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub routes: RouteConfig,
    pub logging: LoggingConfig,
}

/// Prefix for environment overrides, e.g. `CHAT_SESSION_API__BASE_URL`.
pub const ENV_PREFIX: &str = "CHAT_SESSION_";

/// Load config from a YAML file, with `CHAT_SESSION_*` environment overrides.
pub fn load_config(path: &Path) -> Result<ConfigV1, figment::Error> {
    let figment = Figment::new()
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));
    extract_config(figment)
}

/// Extracts a versioned config from any figment, migrating to the latest version.
pub fn extract_config(figment: Figment) -> Result<ConfigV1, figment::Error> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

/// Location of the user service.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_auth_path")]
    pub auth_path: String,
    #[serde(default = "default_users_path")]
    pub users_path: String,
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
}

impl ApiConfig {
    /// Joins the base URL, a path prefix and an endpoint name.
    pub fn url(&self, prefix: &str, endpoint: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = prefix.trim_matches('/');
        let endpoint = endpoint.trim_start_matches('/');
        match (prefix.is_empty(), endpoint.is_empty()) {
            (true, true) => base.to_string(),
            (true, false) => format!("{}/{}", base, endpoint),
            (false, true) => format!("{}/{}", base, prefix),
            (false, false) => format!("{}/{}/{}", base, prefix, endpoint),
        }
    }

    pub fn auth_url(&self, endpoint: &str) -> String {
        self.url(&self.auth_path, endpoint)
    }

    pub fn users_url(&self, endpoint: &str) -> String {
        self.url(&self.users_path, endpoint)
    }
}

fn default_auth_path() -> String {
    "/auth".to_string()
}

fn default_users_path() -> String {
    "/users".to_string()
}

fn default_timeout_in_ms() -> u64 {
    10_000
}

/// Which views need a session and which are only for signed-out users.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema, PartialEq, Eq)]
pub struct RouteConfig {
    #[serde(default = "default_login_view")]
    pub login: String,
    #[serde(default = "default_home_view")]
    pub home: String,
    #[serde(default = "default_protected_views")]
    pub protected: Vec<String>,
    #[serde(default = "default_guest_views")]
    pub guest_only: Vec<String>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        RouteConfig {
            login: default_login_view(),
            home: default_home_view(),
            protected: default_protected_views(),
            guest_only: default_guest_views(),
        }
    }
}

fn default_login_view() -> String {
    "/login".to_string()
}

fn default_home_view() -> String {
    "/home".to_string()
}

fn default_protected_views() -> Vec<String> {
    vec!["/home".to_string(), "/profile".to_string()]
}

fn default_guest_views() -> Vec<String> {
    vec!["/login".to_string(), "/register".to_string()]
}
