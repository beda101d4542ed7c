use base64::{Engine, engine::general_purpose::STANDARD};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::{Error, Result};

pub const USER_ID_VAR: &str = "BREWFATHER_USER_ID";
pub const API_KEY_VAR: &str = "BREWFATHER_API_KEY";

pub struct Config {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub api_url: String,
    pub request_timeout: Duration,
    pub batches_ttl: Duration,
    pub readings_ttl: Duration,
    pub readings_max_entries: u64,
}

impl Config {
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 3000;
    const DEFAULT_STATIC_DIR: &str = "./static";
    const DEFAULT_API_URL: &str = "https://api.brewfather.app";
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_BATCHES_TTL_SECS: u64 = 60 * 60;
    const DEFAULT_READINGS_TTL_SECS: u64 = 5 * 60;
    const DEFAULT_READINGS_MAX_ENTRIES: u64 = 1024;

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("BREWDASH_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, "PORT", Self::DEFAULT_PORT),
            static_dir: lookup("BREWDASH_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_STATIC_DIR)),
            api_url: lookup("BREWFATHER_API_URL")
                .unwrap_or_else(|| Self::DEFAULT_API_URL.to_string()),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "BREWFATHER_TIMEOUT_SECS",
                Self::DEFAULT_TIMEOUT_SECS,
            )),
            batches_ttl: Duration::from_secs(parse_or(
                &lookup,
                "BREWDASH_BATCHES_TTL_SECS",
                Self::DEFAULT_BATCHES_TTL_SECS,
            )),
            readings_ttl: Duration::from_secs(parse_or(
                &lookup,
                "BREWDASH_READINGS_TTL_SECS",
                Self::DEFAULT_READINGS_TTL_SECS,
            )),
            readings_max_entries: parse_or(
                &lookup,
                "BREWDASH_READINGS_MAX_ENTRIES",
                Self::DEFAULT_READINGS_MAX_ENTRIES,
            ),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_or<T: FromStr + Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> T {
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default", name, raw);
            default
        }),
        None => default,
    }
}

/// Brewfather account credentials used for HTTP Basic authentication
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(user_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Reads both secrets; empty values count as missing
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let user_id = lookup(USER_ID_VAR).filter(|v| !v.is_empty());
        let api_key = lookup(API_KEY_VAR).filter(|v| !v.is_empty());

        match (user_id, api_key) {
            (Some(user_id), Some(api_key)) => Ok(Self { user_id, api_key }),
            _ => Err(Error::ConfigurationMissing),
        }
    }

    /// Value for the `Authorization` header: `Basic base64(user_id:api_key)`
    pub fn basic_auth_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.user_id, self.api_key));
        format!("Basic {}", token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Where the upstream client gets its credentials from on each request
#[derive(Clone, Debug)]
pub enum CredentialSource {
    /// Read `BREWFATHER_USER_ID` and `BREWFATHER_API_KEY` at request time
    Environment,
    /// Fixed credentials; `None` behaves like an unconfigured environment
    Static(Option<Credentials>),
}

impl CredentialSource {
    pub fn resolve(&self) -> Result<Credentials> {
        match self {
            CredentialSource::Environment => {
                Credentials::from_lookup(|name| std::env::var(name).ok())
            }
            CredentialSource::Static(Some(credentials)) => Ok(credentials.clone()),
            CredentialSource::Static(None) => Err(Error::ConfigurationMissing),
        }
    }

    /// Whether each secret variable is present, for startup diagnostics
    pub fn env_status() -> [(&'static str, bool); 2] {
        [USER_ID_VAR, API_KEY_VAR].map(|name| {
            let set = std::env::var(name).map(|v| !v.is_empty()).unwrap_or(false);
            (name, set)
        })
    }
}
