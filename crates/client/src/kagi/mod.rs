//! Kagi Search API client.
//!
//! Forwards a query to the Kagi Search API and hands back the response body
//! as JSON text.
//!
//! ### Protocol
//!
//! - **Endpoint**: `GET https://kagi.com/api/v0/search`
//! - **Authentication**: `Authorization: Bot <key>` header.
//! - **Parameters**: `q`, optional `limit` (1-100), then any pass-through
//!   parameters from the request and the client configuration.
//! - **Response**: JSON on success; arbitrary text with a non-2xx status on
//!   failure. Bodies are passed through without schema validation.
//!
//! One request per call. No retries, caching or pagination.

pub mod credential;
pub mod error;
pub mod request;
pub mod response;

pub use credential::{ApiKey, CredentialPolicy, DEFAULT_API_KEY_ENV};
pub use error::KagiError;
pub use request::{MAX_LIMIT, MIN_LIMIT, QueryParams, SearchRequest, limit_from_number, parse_limit};
pub use response::SearchResult;

use reqwest::header;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Default base URL for the Kagi API.
pub const DEFAULT_BASE_URL: &str = "https://kagi.com/api/v0";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "mcp-kagi/0.1";

/// Kagi API client configuration.
#[derive(Debug, Clone)]
pub struct KagiConfig {
    /// Where the API key comes from (default: `KAGI_API_KEY`).
    pub credential: CredentialPolicy,
    /// Base URL (default: https://kagi.com/api/v0).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: mcp-kagi/0.x).
    pub user_agent: String,
    /// Parameters added to every request, after the request's own.
    pub extra_params: Map<String, Value>,
}

impl Default for KagiConfig {
    fn default() -> Self {
        Self {
            credential: CredentialPolicy::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            extra_params: Map::new(),
        }
    }
}

impl KagiConfig {
    /// Configuration using an explicit API key instead of the environment.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self { credential: CredentialPolicy::Override(api_key.into()), ..Default::default() }
    }
}

/// Kagi Search API client.
///
/// Cheap to clone; the resolved key is shared read-only between clones.
#[derive(Debug, Clone)]
pub struct KagiClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: Arc<ApiKey>,
    extra_params: Arc<Map<String, Value>>,
    user_agent: String,
}

impl KagiClient {
    /// Create a new client, resolving the API key from `config.credential`.
    ///
    /// A `limit` in `config.extra_params` must pass the same checks as a
    /// request limit.
    pub fn new(config: KagiConfig) -> Result<Self, KagiError> {
        let api_key = config.credential.resolve()?;
        if let Some(limit) = config.extra_params.get("limit") {
            request::parse_limit(limit)?;
        }
        let endpoint = search_endpoint(&config.base_url)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| KagiError::Network(Arc::new(e)))?;

        Ok(Self {
            http,
            endpoint,
            api_key: Arc::new(api_key),
            extra_params: Arc::new(config.extra_params),
            user_agent: config.user_agent,
        })
    }

    /// The search endpoint without query parameters.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build the full request URL for `req`.
    pub fn request_url(&self, req: &SearchRequest) -> Url {
        let params = QueryParams::assemble(req, &self.extra_params);
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().extend_pairs(params.iter());
        url
    }

    /// Execute a web search query.
    ///
    /// Validates the request before touching the network, then issues exactly
    /// one GET.
    pub async fn search(&self, req: &SearchRequest) -> Result<SearchResult, KagiError> {
        req.validate()?;

        let start = Instant::now();
        let url = self.request_url(req);

        tracing::debug!(endpoint = %self.endpoint, limit = ?req.limit, "searching Kagi API");

        let http_response = self
            .http
            .get(url)
            .header(header::AUTHORIZATION, format!("Bot {}", self.api_key.expose()))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("Kagi API response status: {}", status);

        let body = http_response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Kagi API request failed");
            return Err(KagiError::RequestFailed { status: status.as_u16(), body });
        }

        let result = SearchResult::from_body(&body)?;

        tracing::debug!("search completed in {:?}, {} bytes", start.elapsed(), result.as_str().len());

        Ok(result)
    }
}

/// Join `base_url` with the `search` path segment.
fn search_endpoint(base_url: &str) -> Result<Url, KagiError> {
    let raw = format!("{}/search", base_url.trim_end_matches('/'));
    let url = Url::parse(&raw).map_err(|e| KagiError::InvalidEndpoint(format!("{}: {}", base_url, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(KagiError::InvalidEndpoint(format!("unsupported scheme: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{any, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> KagiClient {
        KagiClient::new(KagiConfig { base_url: server.uri(), ..KagiConfig::with_api_key("test-key") }).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = KagiConfig::default();
        assert_eq!(config.base_url, "https://kagi.com/api/v0");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.credential, CredentialPolicy::Environment("KAGI_API_KEY".into()));
        assert!(config.extra_params.is_empty());
    }

    #[test]
    fn test_client_new_missing_key() {
        let config = KagiConfig {
            credential: CredentialPolicy::Environment("MCP_KAGI_TEST_NEVER_SET".into()),
            ..Default::default()
        };
        let result = KagiClient::new(config);
        assert!(matches!(result, Err(KagiError::MissingCredential { var }) if var == "MCP_KAGI_TEST_NEVER_SET"));
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        let config = KagiConfig { base_url: "ftp://kagi.com".into(), ..KagiConfig::with_api_key("k") };
        assert!(matches!(KagiClient::new(config), Err(KagiError::InvalidEndpoint(_))));

        let config = KagiConfig { base_url: "not a url".into(), ..KagiConfig::with_api_key("k") };
        assert!(matches!(KagiClient::new(config), Err(KagiError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_client_rejects_bad_extra_limit() {
        let mut extra = Map::new();
        extra.insert("limit".into(), json!(500));
        let config = KagiConfig { extra_params: extra, ..KagiConfig::with_api_key("k") };
        assert!(matches!(KagiClient::new(config), Err(KagiError::Validation(_))));

        let mut extra = Map::new();
        extra.insert("limit".into(), json!("20"));
        let config = KagiConfig { extra_params: extra, ..KagiConfig::with_api_key("k") };
        let client = KagiClient::new(config).unwrap();
        let url = client.request_url(&SearchRequest::new("rust"));
        assert!(url.query_pairs().any(|(k, v)| k == "limit" && v == "20"));
    }

    #[tokio::test]
    async fn test_search_rejects_bad_pass_through_limit() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(0)
            .mount(&server)
            .await;

        let req = SearchRequest::new("rust").with_param("limit", 500);
        let result = client_for(&server).search(&req).await;
        assert!(matches!(result, Err(KagiError::Validation(_))));
    }

    #[test]
    fn test_default_endpoint() {
        let client = KagiClient::new(KagiConfig::with_api_key("k")).unwrap();
        assert_eq!(client.endpoint().as_str(), "https://kagi.com/api/v0/search");

        let config = KagiConfig { base_url: "https://kagi.com/api/v0/".into(), ..KagiConfig::with_api_key("k") };
        let client = KagiClient::new(config).unwrap();
        assert_eq!(client.endpoint().as_str(), "https://kagi.com/api/v0/search");
    }

    #[test]
    fn test_request_url_params() {
        let mut extra = Map::new();
        extra.insert("region".into(), json!("de"));
        let config = KagiConfig { extra_params: extra, ..KagiConfig::with_api_key("k") };
        let client = KagiClient::new(config).unwrap();

        let url = client.request_url(&SearchRequest::new("rust & wasm").with_param("region", "us"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![("q".to_string(), "rust & wasm".to_string()), ("region".to_string(), "de".to_string())]
        );

        let url = client.request_url(&SearchRequest::new("rust").with_limit(7));
        assert!(url.query_pairs().any(|(k, v)| k == "limit" && v == "7"));
    }

    #[tokio::test]
    async fn test_search_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "rust"))
            .and(query_param("limit", "5"))
            .and(header("authorization", "Bot test-key"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"results":[]}"#))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .search(&SearchRequest::new("rust").with_limit(5))
            .await
            .unwrap();
        assert_eq!(result.as_str(), r#"{"results":[]}"#);
    }

    #[tokio::test]
    async fn test_search_round_trip() {
        let body = json!({
            "meta": {"id": "abc", "ms": 42},
            "data": [{"t": 0, "url": "https://www.rust-lang.org", "title": "Rust", "snippet": null}]
        });

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let result = client_for(&server).search(&SearchRequest::new("rust")).await.unwrap();
        assert_eq!(result.to_value().unwrap(), body);
    }

    #[tokio::test]
    async fn test_search_omits_absent_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).search(&SearchRequest::new("rust")).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.query_pairs().all(|(k, _)| k != "limit"));
    }

    #[tokio::test]
    async fn test_search_request_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let result = client_for(&server).search(&SearchRequest::new("rust")).await;
        match result {
            Err(KagiError::RequestFailed { status, body }) => {
                assert_eq!(status, 403);
                assert_eq!(body, "forbidden");
            }
            other => panic!("expected RequestFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server).search(&SearchRequest::new("rust")).await;
        assert!(matches!(result, Err(KagiError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_invalid_input_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);

        let result = client.search(&SearchRequest::new("")).await;
        assert!(matches!(result, Err(KagiError::Validation(_))));

        let result = client.search(&SearchRequest::new("rust").with_limit(150)).await;
        assert!(matches!(result, Err(KagiError::Validation(_))));

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let config = KagiConfig {
            base_url: server.uri(),
            timeout: Duration::from_millis(100),
            ..KagiConfig::with_api_key("test-key")
        };
        let result = KagiClient::new(config).unwrap().search(&SearchRequest::new("rust")).await;
        assert!(matches!(result, Err(KagiError::Timeout)));
    }
}
