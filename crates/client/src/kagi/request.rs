//! Kagi Search API request types, validation, and query assembly.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::KagiError;

/// Smallest accepted `limit`.
pub const MIN_LIMIT: u32 = 1;

/// Largest accepted `limit`.
pub const MAX_LIMIT: u32 = 100;

/// Search request parameters for the Kagi Search API.
///
/// Keys other than `query` and `limit` are collected into `rest` and passed
/// through to Kagi unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Search query (required, non-empty). Sent as `q`.
    pub query: String,

    /// Maximum number of results (1-100). Omitted from the URL when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Additional pass-through parameters.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl SearchRequest {
    /// Create a request with only a query.
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), ..Default::default() }
    }

    /// Set the result limit.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Add a pass-through parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.rest.insert(key.into(), value.into());
        self
    }

    /// Validate the search request parameters.
    ///
    /// Returns an error if the query is empty, `limit` is out of range, or a
    /// pass-through `limit` in `rest` (used when `limit` is `None`) is not a
    /// whole number in range.
    pub fn validate(&self) -> Result<(), KagiError> {
        if self.query.is_empty() {
            return Err(KagiError::Validation("query cannot be empty".to_string()));
        }

        if let Some(limit) = self.limit {
            check_limit(limit)?;
        }

        if self.limit.is_none()
            && let Some(value) = self.rest.get("limit")
        {
            parse_limit(value)?;
        }

        Ok(())
    }
}

fn check_limit(limit: u32) -> Result<u32, KagiError> {
    if (MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        Ok(limit)
    } else {
        Err(KagiError::Validation(format!(
            "limit must be between {} and {}, got {}",
            MIN_LIMIT, MAX_LIMIT, limit
        )))
    }
}

/// Convert a JSON number to a limit.
///
/// Whole numbers in range are accepted whether they arrive as integers or as
/// floats (`10` and `10.0`); fractional values are rejected.
pub fn limit_from_number(n: f64) -> Result<u32, KagiError> {
    if !n.is_finite() || n.fract() != 0.0 {
        return Err(KagiError::Validation(format!("limit must be a whole number, got {}", n)));
    }
    if n < f64::from(MIN_LIMIT) || n > f64::from(MAX_LIMIT) {
        return Err(KagiError::Validation(format!(
            "limit must be between {} and {}, got {}",
            MIN_LIMIT, MAX_LIMIT, n
        )));
    }
    check_limit(n as u32)
}

/// Parse a pass-through `limit` value.
///
/// Null means absent. Numbers and numeric strings must be whole and within
/// 1-100; anything else is rejected.
pub fn parse_limit(value: &Value) -> Result<Option<u32>, KagiError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => match n.as_f64() {
            Some(n) => limit_from_number(n).map(Some),
            None => Err(KagiError::Validation(format!("invalid limit: {}", n))),
        },
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(n) => limit_from_number(n).map(Some),
            Err(_) => Err(KagiError::Validation(format!("invalid limit: {:?}", s))),
        },
        other => Err(KagiError::Validation(format!("invalid limit: {}", other))),
    }
}

/// Ordered query parameters with set-or-replace semantics.
///
/// Setting a key that is already present replaces its value in place, so
/// every key appears once and keeps the position of its first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Assemble the parameters for `req`.
    ///
    /// Precedence, lowest first: `q`, `limit` (only when supplied), entries of
    /// `req.rest`, entries of `extra`. Pass-through entries never replace `q`,
    /// and never replace a `limit` the caller set explicitly. A pass-through
    /// `limit` is sent in integer form and dropped if it fails [`parse_limit`];
    /// callers validate beforehand so that case does not reach the wire. Null
    /// values are skipped.
    pub fn assemble(req: &SearchRequest, extra: &Map<String, Value>) -> Self {
        let mut params = Self::default();
        params.set("q", req.query.as_str());
        if let Some(limit) = req.limit {
            params.set("limit", limit.to_string());
        }

        for (key, value) in req.rest.iter().chain(extra.iter()) {
            if key == "q" || (key == "limit" && req.limit.is_some()) {
                tracing::debug!(key = %key, "ignoring pass-through parameter shadowing an explicit field");
                continue;
            }
            if key == "limit" {
                if let Ok(Some(limit)) = parse_limit(value) {
                    params.set("limit", limit.to_string());
                }
                continue;
            }
            if let Some(value) = param_value(value) {
                params.set(key.as_str(), value);
            }
        }

        params
    }

    /// Set `key` to `value`, replacing any existing value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Look up a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether `key` has been set.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no parameter has been set.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// String form of a pass-through value, or `None` when it should be skipped.
///
/// Strings are used verbatim, numbers and booleans by their JSON text, arrays
/// as their elements' string forms joined with `,`, and objects as compact
/// JSON.
pub fn param_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| param_value(item).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}
