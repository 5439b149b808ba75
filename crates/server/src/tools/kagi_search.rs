//! kagi_search tool implementation.
//!
//! Forwards a query to the Kagi Search API and returns the JSON response as text.

use kagi_client::{CredentialPolicy, KagiClient, KagiConfig, KagiError, SearchRequest, limit_from_number};
use kagi_core::{AppConfig, Error};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Input parameters for kagi_search tool.
///
/// Fields other than `query` and `limit` are passed through to Kagi as
/// additional query parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct KagiSearchParams {
    /// The search query string.
    #[schemars(length(min = 1))]
    pub query: String,

    /// Maximum number of search result objects to return. Defaults to 10.
    ///
    /// Declared as a JSON number; whole values such as `10.0` are accepted,
    /// fractional ones are rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 100), extend("default" = 10))]
    pub limit: Option<f64>,

    /// Additional search parameters.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl TryFrom<KagiSearchParams> for SearchRequest {
    type Error = KagiError;

    fn try_from(params: KagiSearchParams) -> Result<Self, Self::Error> {
        let limit = params.limit.map(limit_from_number).transpose()?;
        Ok(SearchRequest { query: params.query, limit, rest: params.rest })
    }
}

/// Build the client configuration for a single call.
fn client_config(config: &AppConfig) -> KagiConfig {
    KagiConfig {
        credential: CredentialPolicy::from_parts(config.api_key.as_deref(), &config.api_key_env),
        base_url: config.base_url.clone(),
        timeout: config.timeout(),
        user_agent: config.user_agent.clone(),
        extra_params: config.extra_params_json(),
    }
}

/// Map client errors onto the server-wide error taxonomy.
fn to_error(err: KagiError) -> Error {
    match err {
        KagiError::Validation(msg) => Error::InvalidInput(msg),
        KagiError::MissingCredential { .. } => Error::MissingCredential(err.to_string()),
        KagiError::RequestFailed { status, body } => Error::RequestFailed { status, body },
        KagiError::MalformedResponse(msg) => Error::MalformedResponse(msg),
        KagiError::InvalidEndpoint(msg) => Error::Config(msg),
        KagiError::Timeout => Error::Timeout(err.to_string()),
        KagiError::Network(_) => Error::HttpError(err.to_string()),
    }
}

/// Log a failed call and convert it.
///
/// Errors raised before any request was sent are caller mistakes and logged at
/// debug; upstream and transport failures are logged at warn.
fn fail(err: KagiError) -> Error {
    if err.is_local() {
        tracing::debug!("kagi_search rejected before sending: {}", err);
    } else {
        tracing::warn!("kagi_search failed: {}", err);
    }
    to_error(err)
}

/// Implementation of the kagi_search tool.
pub async fn search_impl(config: &AppConfig, params: KagiSearchParams) -> Result<CallToolResult, McpError> {
    let req = SearchRequest::try_from(params).map_err(fail)?;
    req.validate().map_err(fail)?;

    let client = KagiClient::new(client_config(config)).map_err(fail)?;

    let result = client.search(&req).await.map_err(fail)?;

    Ok(CallToolResult::success(vec![Content::text(result.into_string())]))
}
