//! API key resolution.
//!
//! A key is resolved once, when a [`KagiClient`](super::KagiClient) is built,
//! and held immutably for the lifetime of that client.

use std::fmt;

use super::KagiError;

/// Environment variable read when no override key is supplied.
pub const DEFAULT_API_KEY_ENV: &str = "KAGI_API_KEY";

/// A resolved Kagi API key.
///
/// `Debug` output is redacted so the key never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw key, trimming surrounding whitespace (such as the trailing
    /// newline of a key read from a file). Returns `None` for empty or
    /// whitespace-only input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() { None } else { Some(Self(trimmed.to_string())) }
    }

    /// The raw key, for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Where the API key comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialPolicy {
    /// Use the supplied key. Surrounding whitespace is trimmed, as for keys
    /// read from the environment.
    Override(String),
    /// Read the key from the named environment variable.
    Environment(String),
}

impl fmt::Debug for CredentialPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialPolicy::Override(_) => f.write_str("Override(***)"),
            CredentialPolicy::Environment(var) => f.debug_tuple("Environment").field(var).finish(),
        }
    }
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        CredentialPolicy::Environment(DEFAULT_API_KEY_ENV.to_string())
    }
}

impl CredentialPolicy {
    /// Pick the override when one is given, otherwise fall back to `env_var`.
    pub fn from_parts(api_key: Option<&str>, env_var: &str) -> Self {
        match api_key {
            Some(key) => CredentialPolicy::Override(key.to_string()),
            None => CredentialPolicy::Environment(env_var.to_string()),
        }
    }

    /// Resolve the key against the process environment.
    pub fn resolve(&self) -> Result<ApiKey, KagiError> {
        self.resolve_with(|var| std::env::var(var).ok())
    }

    /// Resolve the key using `lookup` in place of the process environment.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<ApiKey, KagiError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match self {
            CredentialPolicy::Override(key) => {
                ApiKey::new(key.as_str()).ok_or_else(|| KagiError::MissingCredential { var: "api_key".to_string() })
            }
            CredentialPolicy::Environment(var) => lookup(var)
                .and_then(ApiKey::new)
                .ok_or_else(|| KagiError::MissingCredential { var: var.clone() }),
        }
    }
}
