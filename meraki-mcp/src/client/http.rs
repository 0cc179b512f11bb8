//! reqwest based Dashboard API client

use super::{ApiRequest, DashboardApi};
use crate::common::rate_limiter::{RateLimiter, RateLimiterConfig};
use crate::config::Config;
use crate::error::{MerakiMcpError, Result};
use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, ACCEPT, AUTHORIZATION, LINK, LOCATION, RETRY_AFTER, USER_AGENT,
};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

const INITIAL_BACKOFF_MS: u64 = 500;
/// Upper bound for a server supplied `Retry-After`
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);
/// Redirects followed for one page before the 3xx is reported as an error
const MAX_REDIRECTS: u32 = 5;

/// Dashboard API client speaking HTTPS with bearer authentication
///
/// Every request is paced by a per-scope token bucket, retried on 429 and
/// 5xx responses, and followed through `Link: rel=next` pagination when the
/// request allows more than one page.
///
/// Redirects are followed here rather than by reqwest: the Dashboard sends
/// clients to shard hosts and reqwest drops `Authorization` when a redirect
/// changes host.
pub struct HttpDashboardClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    max_retries: u32,
    initial_backoff: Duration,
    rate_limiter: RateLimiter,
}

impl HttpDashboardClient {
    /// Build a client for `base_url` authenticating with `api_key`
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout: Duration,
        max_retries: u32,
        rate_limit_per_second: u32,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(MerakiMcpError::Http)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            max_retries,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
            rate_limiter: RateLimiter::with_config(RateLimiterConfig::per_second(
                rate_limit_per_second,
            )),
        })
    }

    /// Build a client from validated configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?;
        Self::new(
            &config.base_url,
            api_key,
            config.timeout(),
            config.max_retries,
            config.rate_limit_per_second,
        )
    }

    /// Override the first retry delay used when no `Retry-After` is sent
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Send one page, re-sending the request with its credentials to
    /// wherever the Dashboard redirects it
    async fn send_following_redirects(
        &self,
        request: &ApiRequest,
        url: &str,
        first_page: bool,
    ) -> Result<Response> {
        let mut url = url.to_string();
        let mut with_query = first_page;
        let mut redirects = 0;

        loop {
            let response = self.send_with_retry(request, &url, with_query).await?;
            match Self::redirect_target(&url, &response) {
                Some(target) if redirects < MAX_REDIRECTS => {
                    tracing::debug!("{} redirected to {}", request, target);
                    // A Location with its own query string replaces ours
                    with_query = with_query && !target.contains('?');
                    url = target;
                    redirects += 1;
                }
                _ => return Ok(response),
            }
        }
    }

    /// Absolute URL of a 3xx response's `Location`
    fn redirect_target(current: &str, response: &Response) -> Option<String> {
        if !response.status().is_redirection() {
            return None;
        }
        let location = response.headers().get(LOCATION)?.to_str().ok()?;
        let base = url::Url::parse(current).ok()?;
        base.join(location).ok().map(String::from)
    }

    async fn send_with_retry(
        &self,
        request: &ApiRequest,
        url: &str,
        first_page: bool,
    ) -> Result<Response> {
        let mut backoff = self.initial_backoff;
        let mut attempt = 0;

        loop {
            self.rate_limiter.acquire(&request.rate_limit_key).await;

            let mut builder = self
                .http
                .request(request.method.into(), url)
                .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
                .header(ACCEPT, "application/json")
                .header(USER_AGENT, format!("meraki-mcp/{}", crate::VERSION));
            // Follow-up page URLs already carry their query string
            if first_page && !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let outcome = builder.send().await;
            let retries_left = attempt < self.max_retries;

            match outcome {
                Ok(response) if retries_left && Self::is_retryable_status(response.status()) => {
                    let wait = Self::retry_after(response.headers()).unwrap_or(backoff);
                    tracing::warn!(
                        "⚠️ {} returned {}, retry {}/{} in {}ms",
                        request,
                        response.status(),
                        attempt + 1,
                        self.max_retries,
                        wait.as_millis()
                    );
                    tokio::time::sleep(wait).await;
                }
                Ok(response) => return Ok(response),
                // Connection failures only, and never for POST
                Err(e) if retries_left && e.is_connect() && request.method.is_idempotent() => {
                    tracing::warn!(
                        "⚠️ {} failed, retry {}/{} in {}ms: {}",
                        request,
                        attempt + 1,
                        self.max_retries,
                        backoff.as_millis(),
                        e
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(MerakiMcpError::Http(e)),
            }

            attempt += 1;
            backoff *= 2;
        }
    }

    fn is_retryable_status(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    fn retry_after(headers: &HeaderMap) -> Option<Duration> {
        headers
            .get(RETRY_AFTER)?
            .to_str()
            .ok()?
            .trim()
            .parse::<u64>()
            .ok()
            .map(|secs| Duration::from_secs(secs).min(MAX_RETRY_AFTER))
    }

    async fn decode(response: Response) -> Result<Value> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Self::api_error(status, &text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Map a non-success response to [`MerakiMcpError::Api`]
    ///
    /// The Dashboard reports failures as `{"errors": ["..."]}`.
    pub fn api_error(status: StatusCode, body: &str) -> MerakiMcpError {
        let from_errors = serde_json::from_str::<Value>(body).ok().and_then(|json| {
            let errors = json.get("errors")?.as_array()?;
            let messages: Vec<String> = errors
                .iter()
                .map(|e| match e {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        });

        let message = from_errors.unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                trimmed.chars().take(500).collect()
            }
        });

        MerakiMcpError::Api {
            status: status.as_u16(),
            message,
        }
    }

    /// URL of the `rel=next` entry of a `Link` header
    pub fn next_page_url(headers: &HeaderMap) -> Option<String> {
        let link = headers.get(LINK)?.to_str().ok()?;
        link.split(',').find_map(|entry| {
            let (target, params) = entry.trim().split_once('>')?;
            let target = target.trim().strip_prefix('<')?;
            let is_next = params.split(';').any(|p| {
                let p = p.trim().replace('"', "");
                p.eq_ignore_ascii_case("rel=next")
            });
            is_next.then(|| target.to_string())
        })
    }
}

impl fmt::Debug for HttpDashboardClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpDashboardClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("max_retries", &self.max_retries)
            .field("initial_backoff", &self.initial_backoff)
            .field("rate_limiter", &self.rate_limiter)
            .finish()
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardClient {
    async fn call(&self, request: ApiRequest) -> Result<Value> {
        let mut url = self.url_for(&request.path);
        let mut pages = 0u32;
        let mut collected: Option<Vec<Value>> = None;

        loop {
            tracing::debug!("Dashboard API {} {} (page {})", request.method, url, pages + 1);
            let response = self
                .send_following_redirects(&request, &url, pages == 0)
                .await?;
            let next = Self::next_page_url(response.headers());
            let value = Self::decode(response).await?;
            pages += 1;

            let items = match value {
                Value::Array(items) => items,
                // Objects and scalars are never paginated
                other if collected.is_none() => return Ok(other),
                other => {
                    tracing::warn!("Non-array page returned for {}, stopping", request);
                    collected.get_or_insert_with(Vec::new).push(other);
                    break;
                }
            };
            collected.get_or_insert_with(Vec::new).extend(items);

            let more_allowed = request.max_pages == 0 || pages < request.max_pages;
            match next {
                Some(next_url) if more_allowed => url = next_url,
                _ => break,
            }
        }

        Ok(Value::Array(collected.unwrap_or_default()))
    }
}
