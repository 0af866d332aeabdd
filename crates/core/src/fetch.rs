//! Page retrieval from URLs, files, and stdin.
//!
//! URL fetching goes through a [`Fetcher`], which owns the ordered list of
//! client identities and the access-denied retry loop. The HTTP client sits
//! behind the [`Transport`] trait; [`ReqwestTransport`] is the real one.

use std::fs;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::encoding::charset_from_content_type;
use crate::rules::DomainRules;
use crate::{PrecisError, Result};

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// A browser or crawler signature presented to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub name: String,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
}

impl ClientIdentity {
    pub fn new(name: &str, user_agent: &str, accept_language: &str) -> Self {
        Self {
            name: name.to_string(),
            user_agent: user_agent.to_string(),
            accept: HTML_ACCEPT.to_string(),
            accept_language: accept_language.to_string(),
        }
    }

    /// The default rotation: four desktop/mobile browsers, then a crawler.
    pub fn default_rotation() -> Vec<Self> {
        vec![
            Self::new(
                "chrome-windows",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
                "en-US,en;q=0.9",
            ),
            Self::new(
                "firefox-macos",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.4; rv:125.0) Gecko/20100101 Firefox/125.0",
                "en-US,en;q=0.7",
            ),
            Self::new(
                "safari-ios",
                "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
                "en-GB,en;q=0.9",
            ),
            Self::new(
                "edge-windows",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
                "en-US,en;q=0.8",
            ),
            Self::new(
                "googlebot",
                "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
                "en",
            ),
        ]
    }
}

/// HTTP client configuration for fetching pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Connect and read timeout in seconds, applied per attempt.
    pub timeout: u64,
    /// Maximum redirect hops followed per attempt.
    pub max_redirects: usize,
    /// Identities tried in order while the server answers 401/403.
    pub identities: Vec<ClientIdentity>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 20, max_redirects: 5, identities: ClientIdentity::default_rotation() }
    }
}

/// One outbound GET.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// What a transport hands back for one attempt.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Raw page bytes plus what is known about how to decode them.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub raw_bytes: Vec<u8>,
    pub declared_charset: Option<String>,
    pub http_status: u16,
    /// Number of identities tried, including the successful one.
    pub attempts: usize,
}

/// Minimal HTTP GET capability the fetcher needs.
pub trait Transport {
    fn get(&self, request: &FetchRequest) -> impl Future<Output = Result<RawResponse>> + Send;
}

/// [`Transport`] backed by reqwest. A client is built per attempt, so no
/// connection state outlives a fetch.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    timeout: u64,
    max_redirects: usize,
}

impl ReqwestTransport {
    pub fn new(config: &FetchConfig) -> Self {
        Self { timeout: config.timeout, max_redirects: config.max_redirects }
    }
}

impl Transport for ReqwestTransport {
    async fn get(&self, request: &FetchRequest) -> Result<RawResponse> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(self.timeout))
            .timeout(Duration::from_secs(self.timeout))
            .redirect(reqwest::redirect::Policy::limited(self.max_redirects))
            .build()
            .map_err(PrecisError::HttpError)?;

        let mut builder = client.get(request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let timeout = self.timeout;
        let to_error = |e: reqwest::Error| {
            if e.is_timeout() { PrecisError::Timeout { timeout } } else { PrecisError::HttpError(e) }
        };

        let response = builder.send().await.map_err(to_error)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(to_error)?.to_vec();

        Ok(RawResponse { status, content_type, body })
    }
}

/// Fetches pages, rotating client identities while access is denied.
#[derive(Debug, Clone)]
pub struct Fetcher<T = ReqwestTransport> {
    config: FetchConfig,
    transport: T,
}

impl Fetcher<ReqwestTransport> {
    pub fn new(config: FetchConfig) -> Self {
        let transport = ReqwestTransport::new(&config);
        Self { config, transport }
    }
}

impl Default for Fetcher<ReqwestTransport> {
    fn default() -> Self {
        Self::new(FetchConfig::default())
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn with_transport(config: FetchConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetches `url`, retrying with the next identity on 401/403.
    ///
    /// Any other non-success status ends the loop with
    /// [`PrecisError::Unreachable`]; transport failures propagate at once.
    /// Exhausting the identities yields [`PrecisError::AccessDenied`].
    #[tracing::instrument(skip_all, fields(url = %url))]
    pub async fn fetch(&self, url: &str, rules: &DomainRules) -> Result<FetchResult> {
        let parsed_url = parse_url(url)?;
        let overrides = parsed_url.host_str().map(|host| rules.headers_for(host)).unwrap_or_default();

        let mut last_denied = None;
        for (attempt, identity) in self.config.identities.iter().enumerate() {
            let request = build_request(&parsed_url, identity, &overrides);
            let response = self.transport.get(&request).await?;

            match response.status {
                200..=299 => {
                    tracing::debug!(identity = %identity.name, attempts = attempt + 1, "fetched page");
                    return Ok(FetchResult {
                        declared_charset: response.content_type.as_deref().and_then(charset_from_content_type),
                        raw_bytes: response.body,
                        http_status: response.status,
                        attempts: attempt + 1,
                    });
                }
                401 | 403 => {
                    tracing::warn!(identity = %identity.name, status = response.status, "access denied, rotating identity");
                    last_denied = Some(response.status);
                }
                status => return Err(PrecisError::Unreachable { status }),
            }
        }

        Err(PrecisError::AccessDenied {
            status: last_denied.unwrap_or(403),
            attempts: self.config.identities.len(),
        })
    }
}

fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| PrecisError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(PrecisError::InvalidUrl(format!("unsupported scheme '{}'", scheme))),
    }
}

fn build_request(url: &Url, identity: &ClientIdentity, overrides: &[(String, String)]) -> FetchRequest {
    let mut headers = vec![
        ("User-Agent".to_string(), identity.user_agent.clone()),
        ("Accept".to_string(), identity.accept.clone()),
        ("Accept-Language".to_string(), identity.accept_language.clone()),
    ];
    headers.extend(overrides.iter().cloned());

    FetchRequest { url: url.clone(), headers }
}

/// Reads a local HTML file as raw bytes.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<Vec<u8>> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(PrecisError::FileNotFound(path_buf))
    } else {
        fs::read(&path_buf).map_err(PrecisError::from)
    }
}

/// Reads raw bytes from standard input until EOF.
pub fn fetch_stdin() -> Result<Vec<u8>> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer).map_err(PrecisError::from)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Answers with scripted statuses and records the user agent of every attempt.
    struct ScriptedTransport {
        statuses: Vec<u16>,
        seen: Mutex<Vec<FetchRequest>>,
    }

    impl ScriptedTransport {
        fn new(statuses: &[u16]) -> Self {
            Self { statuses: statuses.to_vec(), seen: Mutex::new(Vec::new()) }
        }

        fn attempts(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    impl Transport for ScriptedTransport {
        async fn get(&self, request: &FetchRequest) -> Result<RawResponse> {
            let mut seen = self.seen.lock().unwrap();
            let status = self.statuses.get(seen.len()).copied().unwrap_or(403);
            seen.push(request.clone());
            Ok(RawResponse {
                status,
                content_type: Some("text/html; charset=ISO-8859-1".to_string()),
                body: b"<html><body>ok</body></html>".to_vec(),
            })
        }
    }

    fn block_on<F: Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(future)
    }

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 20);
        assert_eq!(config.max_redirects, 5);
        assert!(config.identities.len() >= 3);
        assert!(config.identities.iter().any(|id| id.user_agent.contains("Googlebot")));
    }

    #[test]
    fn test_retries_until_success() {
        let fetcher = Fetcher::with_transport(FetchConfig::default(), ScriptedTransport::new(&[403, 401, 200]));
        let result = block_on(fetcher.fetch("https://example.com/story", &DomainRules::empty())).unwrap();

        assert_eq!(result.attempts, 3);
        assert_eq!(result.http_status, 200);
        assert_eq!(result.declared_charset.as_deref(), Some("iso-8859-1"));
        assert_eq!(fetcher.transport.attempts(), 3);

        let seen = fetcher.transport.seen.lock().unwrap();
        let agents: Vec<_> = seen.iter().map(|r| r.header("user-agent").unwrap().to_string()).collect();
        assert_eq!(agents.len(), 3);
        assert_ne!(agents[0], agents[1]);
        assert_ne!(agents[1], agents[2]);
    }

    #[test]
    fn test_all_identities_denied() {
        let config = FetchConfig::default();
        let identities = config.identities.len();
        let fetcher = Fetcher::with_transport(config, ScriptedTransport::new(&[]));
        let result = block_on(fetcher.fetch("https://example.com/story", &DomainRules::empty()));

        assert!(matches!(result, Err(PrecisError::AccessDenied { status: 403, attempts }) if attempts == identities));
        assert_eq!(fetcher.transport.attempts(), identities);
    }

    #[test]
    fn test_non_recoverable_status_stops_immediately() {
        let fetcher = Fetcher::with_transport(FetchConfig::default(), ScriptedTransport::new(&[404, 200]));
        let result = block_on(fetcher.fetch("https://example.com/missing", &DomainRules::empty()));

        assert!(matches!(result, Err(PrecisError::Unreachable { status: 404 })));
        assert_eq!(fetcher.transport.attempts(), 1);
    }

    #[test]
    fn test_domain_header_override() {
        let fetcher = Fetcher::with_transport(FetchConfig::default(), ScriptedTransport::new(&[200]));
        block_on(fetcher.fetch("https://www.nytimes.com/2024/story.html", &DomainRules::default())).unwrap();

        let seen = fetcher.transport.seen.lock().unwrap();
        assert_eq!(seen[0].header("referer"), Some("https://www.google.com/"));
    }

    #[test]
    fn test_fetch_url_invalid() {
        let fetcher = Fetcher::with_transport(FetchConfig::default(), ScriptedTransport::new(&[200]));
        let result = block_on(fetcher.fetch("not-a-url", &DomainRules::empty()));
        assert!(matches!(result, Err(PrecisError::InvalidUrl(_))));

        let result = block_on(fetcher.fetch("ftp://example.com/file", &DomainRules::empty()));
        assert!(matches!(result, Err(PrecisError::InvalidUrl(_))));
        assert_eq!(fetcher.transport.attempts(), 0);
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(PrecisError::FileNotFound(_))));
    }
}
