//! Kagi Search API response handling.

use std::fmt;

use serde_json::Value;

use super::KagiError;

/// A successful search response, re-serialized as compact JSON text.
///
/// The upstream body is decoded and encoded again without imposing any
/// schema, so the result is guaranteed to be valid JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    text: String,
}

impl SearchResult {
    /// Decode an upstream body and re-encode it.
    pub fn from_body(body: &str) -> Result<Self, KagiError> {
        let value: Value = serde_json::from_str(body).map_err(|e| KagiError::MalformedResponse(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Encode an already decoded JSON value.
    pub fn from_value(value: &Value) -> Result<Self, KagiError> {
        let text = serde_json::to_string(value).map_err(|e| KagiError::MalformedResponse(e.to_string()))?;
        Ok(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Decode the result text back into a JSON value.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.text)
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
