//! The OpenAlex API client.

use crate::error::{OpenAlexError, Result};
use crate::fields;
use crate::ids::is_openalex_id;
use crate::parse::{entity_short_id, parse_entity, parse_list_response};
use crate::query::QueryParams;
use crate::rate_limit::{RateLimiter, ANONYMOUS_RATE, POLITE_RATE};
use crate::types::{EntityKind, ListResponse};
use rand::Rng;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.openalex.org";

/// Environment variable holding the polite-pool contact email.
pub const EMAIL_ENV: &str = "OPENALEX_EMAIL";

pub const DEFAULT_MAX_RETRIES: u32 = 3;

pub const DEFAULT_MAX_RETRY_WAIT: Duration = Duration::from_secs(60);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Async client for the OpenAlex API.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> openalex_client::error::Result<()> {
/// use openalex_client::{OpenAlexClient, WorkSearch};
///
/// let client = OpenAlexClient::from_env()?;
/// let page = client.search_works("graph neural networks", &WorkSearch::default()).await?;
/// for work in &page.results {
///     println!("{}", work["title"]);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OpenAlexClient {
    pub(crate) http: Client,
    pub(crate) email: Option<String>,
    pub(crate) base_url: String,
    pub(crate) rate_limiter: RateLimiter,
    pub(crate) max_retries: u32,
    pub(crate) max_retry_wait: Duration,
    pub(crate) timeout: Duration,
}

impl OpenAlexClient {
    /// Create a new client. Supplying an email joins the polite pool.
    pub fn new(email: Option<String>) -> Result<Self> {
        let email = email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty());
        let user_agent = match &email {
            Some(e) => format!("openalex-client/{} (mailto:{})", env!("CARGO_PKG_VERSION"), e),
            None => format!("openalex-client/{}", env!("CARGO_PKG_VERSION")),
        };
        let http = Client::builder().user_agent(user_agent).build().map_err(|e| {
            OpenAlexError::InvalidArgument(format!("cannot build HTTP client: {}", e))
        })?;
        let rate = if email.is_some() { POLITE_RATE } else { ANONYMOUS_RATE };

        Ok(Self {
            http,
            email,
            base_url: DEFAULT_BASE_URL.to_string(),
            rate_limiter: RateLimiter::new(rate),
            max_retries: DEFAULT_MAX_RETRIES,
            max_retry_wait: DEFAULT_MAX_RETRY_WAIT,
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Create a client using the `OPENALEX_EMAIL` environment variable, if set.
    pub fn from_env() -> Result<Self> {
        Self::new(std::env::var(EMAIL_ENV).ok())
    }

    /// Override the base URL (useful for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the rate limit (requests per second).
    pub fn with_rate_limit(mut self, per_second: f64) -> Self {
        self.rate_limiter = RateLimiter::new(per_second);
        self
    }

    /// How many times a rate-limited or failed request is retried.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Upper bound for a single back-off wait.
    pub fn with_max_retry_wait(mut self, wait: Duration) -> Self {
        self.max_retry_wait = wait;
        self
    }

    /// Per-request timeout (default 30 s).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Contact email in use, if any.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one entity by an already-normalized ID.
    pub(crate) async fn get_entity(
        &self,
        kind: EntityKind,
        id: &str,
        select: &[&str],
    ) -> Result<Value> {
        let mut pairs = vec![("select".to_string(), select.join(","))];
        if let Some(email) = &self.email {
            pairs.push(("mailto".to_string(), email.clone()));
        }
        let path = format!("/{}/{}", kind.as_path(), encode_id(id));
        parse_entity(self.get_json(&path, &pairs).await?)
    }

    /// Run a list query against an entity collection.
    pub(crate) async fn list(&self, kind: EntityKind, query: QueryParams) -> Result<ListResponse> {
        let query = query.mailto(self.email.as_deref());
        query.validate()?;
        let path = format!("/{}", kind.as_path());
        parse_list_response(self.get_json(&path, &query.into_pairs()).await?)
    }

    /// Turn a normalized external ID (`doi:...`, `orcid:...`) into the
    /// native OpenAlex ID needed by filters such as `cites:`.
    pub(crate) async fn resolve_native_id(&self, kind: EntityKind, id: &str) -> Result<String> {
        if is_openalex_id(kind, id) {
            return Ok(id.to_string());
        }
        let entity = self.get_entity(kind, id, fields::ID_ONLY).await?;
        let native = entity_short_id(&entity)?;
        debug!(%kind, external = id, native = %native, "resolved identifier");
        Ok(native)
    }

    /// GET `path` with query `pairs`, retrying on 429 and transport errors.
    pub(crate) async fn get_json(&self, path: &str, pairs: &[(String, String)]) -> Result<Value> {
        let url = self.endpoint(path, pairs)?;
        let mut attempt = 0u32;

        loop {
            self.rate_limiter.acquire().await;
            debug!(url = %url, attempt, "GET");

            match self.http.get(url.clone()).timeout(self.timeout).send().await {
                Ok(response) if response.status().as_u16() == 429 => {
                    let retry_after = retry_after(response.headers());
                    if attempt >= self.max_retries {
                        return Err(OpenAlexError::RateLimited { retry_after });
                    }
                    let base = retry_after.unwrap_or_else(|| self.backoff(attempt));
                    let wait = jitter(base.min(self.max_retry_wait));
                    attempt += 1;
                    warn!(
                        "Rate limited. Retry {}/{} in {:.1}s (at {})...",
                        attempt,
                        self.max_retries,
                        wait.as_secs_f64(),
                        resume_time(wait)
                    );
                    self.rate_limiter.back_off(wait).await;
                }
                Ok(response) => return handle_response(response).await,
                Err(e) if attempt < self.max_retries && is_transient(&e) => {
                    let wait = self.backoff(attempt);
                    attempt += 1;
                    warn!(
                        error = %e,
                        "Connection error. Retry {}/{} in {:.1}s...",
                        attempt,
                        self.max_retries,
                        wait.as_secs_f64()
                    );
                    self.rate_limiter.back_off(wait).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn endpoint(&self, path: &str, pairs: &[(String, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        if !pairs.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }

    /// `2^attempt` seconds, capped at the configured maximum.
    fn backoff(&self, attempt: u32) -> Duration {
        let secs = 2u64.saturating_pow(attempt);
        Duration::from_secs(secs).min(self.max_retry_wait)
    }
}

/// Map the HTTP status to a result.
async fn handle_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status().as_u16();

    match status {
        200..=299 => {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| OpenAlexError::Parse(format!("Invalid JSON from OpenAlex: {}", e)))
        }
        404 => Err(OpenAlexError::NotFound),
        400 => {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| "Bad request".to_string());
            Err(OpenAlexError::BadRequest { message })
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(OpenAlexError::Api {
                status,
                message: body,
            })
        }
    }
}

fn retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Scale a wait by a random factor in ±25%.
fn jitter(wait: Duration) -> Duration {
    let factor = rand::thread_rng().gen_range(0.75..1.25);
    wait.mul_f64(factor)
}

fn resume_time(wait: Duration) -> String {
    let wait = chrono::Duration::from_std(wait).unwrap_or_else(|_| chrono::Duration::zero());
    (chrono::Local::now() + wait).format("%H:%M:%S").to_string()
}

fn is_transient(e: &reqwest::Error) -> bool {
    e.is_connect() || e.is_timeout() || e.is_request()
}

/// Escape characters that would end the path segment early.
///
/// Slashes stay as they are: OpenAlex expects `doi:10.1234/abc` verbatim.
fn encode_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for c in id.chars() {
        match c {
            '%' => out.push_str("%25"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAlexClient {
        OpenAlexClient::new(Some("me@example.org".into())).unwrap()
    }

    #[test]
    fn test_blank_email_ignored() {
        let c = OpenAlexClient::new(Some("   ".into())).unwrap();
        assert_eq!(c.email(), None);
    }

    #[test]
    fn test_invalid_header_email_is_an_argument_error() {
        let result = OpenAlexClient::new(Some("me\u{1}@example.org".into()));
        assert!(matches!(result, Err(OpenAlexError::InvalidArgument(_))));
    }

    #[test]
    fn test_endpoint_encodes_query() {
        let c = client().with_base_url("http://localhost:9999/");
        let url = c
            .endpoint(
                "/works",
                &[("search".to_string(), "dark matter & halos".to_string())],
            )
            .unwrap();
        assert_eq!(url.path(), "/works");
        let (k, v) = url.query_pairs().next().unwrap();
        assert_eq!(k, "search");
        assert_eq!(v, "dark matter & halos");
    }

    #[test]
    fn test_endpoint_without_query() {
        let url = client().endpoint("/works/W1", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.openalex.org/works/W1");
    }

    #[test]
    fn test_backoff_capped() {
        let c = client().with_max_retry_wait(Duration::from_secs(5));
        assert_eq!(c.backoff(0), Duration::from_secs(1));
        assert_eq!(c.backoff(2), Duration::from_secs(4));
        assert_eq!(c.backoff(3), Duration::from_secs(5));
        assert_eq!(c.backoff(70), Duration::from_secs(5));
    }

    #[test]
    fn test_jitter_bounds() {
        for _ in 0..100 {
            let j = jitter(Duration::from_secs(4));
            assert!(j >= Duration::from_secs(3) && j <= Duration::from_secs(5));
        }
    }

    #[test]
    fn test_encode_id() {
        assert_eq!(encode_id("doi:10.1000/a?b#c"), "doi:10.1000/a%3Fb%23c");
        assert_eq!(encode_id("W123"), "W123");
    }
}
