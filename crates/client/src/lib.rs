//! Client code for mcp-kagi.
//!
//! This crate provides the Kagi Search API client used by the server: request
//! validation, query assembly, credential resolution, and response
//! pass-through.

pub mod kagi;

pub use kagi::{
    ApiKey, CredentialPolicy, DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, KagiClient, KagiConfig, KagiError, QueryParams,
    SearchRequest, SearchResult, limit_from_number,
};
