//! Low-level HTTP client — `CoinGeckoHttp`.
//!
//! One method per API endpoint. Returns wire types (conversion to domain types
//! happens in the sub-clients). Wrapped by `CoinboardClient`.

use crate::domain::asset::wire::{CoinDetailResponse, CoinMarketResponse};
use crate::domain::market_stats::wire::GlobalResponse;
use crate::error::HttpError;
use crate::http::retry::RetryPolicy;
use crate::network::API_KEY_HEADER;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Error envelope CoinGecko returns, sometimes with a 2xx status.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    status: ApiErrorStatus,
}

#[derive(Debug, Deserialize)]
struct ApiErrorStatus {
    error_code: i64,
    error_message: String,
}

/// Low-level HTTP client for the CoinGecko REST API.
#[derive(Clone)]
pub struct CoinGeckoHttp {
    base_url: String,
    client: Client,
    api_key: Option<String>,
    retry: RetryPolicy,
}

impl CoinGeckoHttp {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            api_key,
            retry: RetryPolicy::Idempotent,
        })
    }

    /// Override the retry policy for every endpoint.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Coins ────────────────────────────────────────────────────────────

    pub async fn get_coin_markets(
        &self,
        vs_currency: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<CoinMarketResponse>, HttpError> {
        let url = format!(
            "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page={}&sparkline=true&price_change_percentage=24h",
            self.base_url,
            urlencoding::encode(vs_currency),
            per_page,
            page
        );
        self.get(&url).await
    }

    pub async fn get_coin_detail(&self, id: &str) -> Result<CoinDetailResponse, HttpError> {
        let url = format!(
            "{}/coins/{}?localization=false&tickers=false&market_data=false&community_data=false&developer_data=false&sparkline=false",
            self.base_url,
            urlencoding::encode(id)
        );
        self.get(&url).await
    }

    // ── Global ───────────────────────────────────────────────────────────

    pub async fn get_global(&self) -> Result<GlobalResponse, HttpError> {
        let url = format!("{}/global", self.base_url);
        self.get(&url).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let Some(config) = self.retry.config() else {
            return self.do_get(url).await;
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_get::<T>(url).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    let (should_retry, server_delay) = match &e {
                        HttpError::ServerError { status, .. } => (config.retries_on(*status), None),
                        HttpError::RateLimited { retry_after_ms } => (
                            config.retries_on(429),
                            retry_after_ms.map(Duration::from_millis),
                        ),
                        HttpError::Timeout => (true, None),
                        HttpError::Reqwest(re) => {
                            (re.is_connect() || re.is_timeout() || re.is_request(), None)
                        }
                        _ => (false, None),
                    };

                    if should_retry && attempt < config.max_retries {
                        let delay = config.next_delay(attempt, server_delay);
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "Retrying request to {}",
                            url
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let mut req = self.client.get(url).header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            req = req.header(API_KEY_HEADER, key);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Reqwest(e)
            }
        })?;
        let status = resp.status().as_u16();
        let retry_after_ms = retry_after_ms(resp.headers());
        let body = resp.text().await?;

        decode_response(status, retry_after_ms, &body)
    }
}

/// `Retry-After` in seconds, as milliseconds. HTTP-date values are ignored.
fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

/// Map a status and body to the endpoint type or an `HttpError`.
///
/// An API error envelope in the body takes precedence over the status code.
fn decode_response<T: DeserializeOwned>(
    status: u16,
    retry_after_ms: Option<u64>,
    body: &str,
) -> Result<T, HttpError> {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
        if envelope.status.error_code == 429 || status == 429 {
            return Err(HttpError::RateLimited { retry_after_ms });
        }
        return Err(HttpError::Api {
            code: envelope.status.error_code,
            message: envelope.status.error_message,
        });
    }

    match status {
        200..=299 => serde_json::from_str(body).map_err(|e| HttpError::Decode(e.to_string())),
        401 => Err(HttpError::Unauthorized),
        404 => Err(HttpError::NotFound(body.to_string())),
        429 => Err(HttpError::RateLimited { retry_after_ms }),
        400..=499 => Err(HttpError::BadRequest(body.to_string())),
        _ => Err(HttpError::ServerError {
            status,
            body: body.to_string(),
        }),
    }
}
