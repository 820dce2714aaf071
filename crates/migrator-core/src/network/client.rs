//! Authenticated JSON client for the Asana REST API.
//!
//! Provides a wrapper around reqwest with:
//! - Bearer authentication and a fixed user agent
//! - `{"data": ...}` envelope handling
//! - Offset pagination for list endpoints
//! - Bounded retries for transient failures

use crate::config::NetworkConfig;
use crate::models::{DataEnvelope, Page};
use crate::network::retry::{retry_async, RetryConfig};
use crate::{MigratorError, Result};
use reqwest::{header, Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Error body returned by Asana (`{"errors": [{"message": ...}]}`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client bound to one API base URL and access token.
pub struct HttpClient {
    client: Client,
    base_url: String,
    retry: RetryConfig,
}

impl HttpClient {
    /// Create a new client with the default timeout.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        Self::with_timeout(base_url, token, NetworkConfig::REQUEST_TIMEOUT)
    }

    /// Create a new client with a custom request timeout.
    pub fn with_timeout(base_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", token)).map_err(
            |e| MigratorError::Config {
                message: format!("Access token is not a valid header value: {}", e),
            },
        )?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(NetworkConfig::USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| MigratorError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                cause: None,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryConfig::default(),
        })
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a single page and unwrap it.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Page<T>> {
        let response = self.send(Method::GET, path, query, None::<&()>).await?;
        parse_json(response, path).await
    }

    /// GET every page of a list endpoint, following `next_page.offset`.
    pub async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let mut data = Vec::new();
        let mut offset: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let mut params: Vec<(&str, String)> = query.to_vec();
            params.push(("limit", NetworkConfig::PAGE_LIMIT.to_string()));
            if let Some(offset) = &offset {
                params.push(("offset", offset.clone()));
            }

            let page: Page<T> = self.get_page(path, &params).await?;
            pages += 1;
            data.extend(page.data);

            match page.next_page {
                Some(next) => offset = Some(next.offset),
                None => break,
            }
        }

        debug!("Fetched {} items from {} in {} pages", data.len(), path, pages);
        Ok(data)
    }

    /// Send `{"data": body}` and unwrap the `data` of the response.
    pub async fn send_data<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let envelope = DataEnvelope { data: body };
        let response = self.send(method, path, &[], Some(&envelope)).await?;
        let parsed: DataEnvelope<T> = parse_json(response, path).await?;
        Ok(parsed.data)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        // A write that timed out may already have been applied
        let resendable = method == Method::GET;

        let (result, stats) = retry_async(
            &self.retry,
            || {
                let mut request = self.client.request(method.clone(), &url).query(query);
                if let Some(body) = body {
                    request = request.json(body);
                }
                let method = method.clone();
                async move {
                    let response = request.send().await.map_err(|e| {
                        if e.is_timeout() {
                            MigratorError::Timeout(NetworkConfig::REQUEST_TIMEOUT)
                        } else {
                            MigratorError::Network {
                                message: format!("{} {} failed: {}", method, path, e),
                                cause: Some(e.to_string()),
                            }
                        }
                    })?;
                    check_response_status(response, path).await
                }
            },
            |e: &MigratorError| e.is_retryable_for(resendable),
            |e: &MigratorError| e.retry_after(),
        )
        .await;

        if stats.attempts > 1 && stats.success {
            debug!("{} {} succeeded after {} attempts", method, path, stats.attempts);
        }
        result
    }
}

/// Turn a non-success response into a typed error.
async fn check_response_status(response: Response, path: &str) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());
        warn!("Rate limited on {} (retry after {:?}s)", path, retry_after);
        return Err(MigratorError::RateLimited {
            service: extract_domain(response.url().as_str()),
            retry_after_secs: retry_after,
        });
    }

    if status == StatusCode::REQUEST_TIMEOUT {
        return Err(MigratorError::Timeout(NetworkConfig::REQUEST_TIMEOUT));
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .map(|parsed| {
            parsed
                .errors
                .into_iter()
                .filter_map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ")
        })
        .filter(|m| !m.is_empty())
        .unwrap_or(body);

    Err(MigratorError::Api {
        endpoint: path.to_string(),
        status_code: status.as_u16(),
        message,
    })
}

async fn parse_json<T: DeserializeOwned>(response: Response, path: &str) -> Result<T> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| MigratorError::Json {
        message: format!("Failed to parse response from {}: {}", path, e),
        source: Some(e),
    })
}

/// Extract domain from a URL.
pub fn extract_domain(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.host_str().unwrap_or("unknown").to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}
