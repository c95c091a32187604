use async_trait::async_trait;

use crate::models::Trade;

use super::error::ApiError;
use super::rate_limiter::{RateLimitConfig, RateLimiter};

const TRADES_ENDPOINT: &str = "/api/v1/trades";

/// Source of the raw trade list the aggregator runs over.
///
/// The production implementation is [`DashboardClient`]; tests and offline
/// tooling substitute their own.
#[async_trait]
pub trait TradeFeed: Send + Sync {
    /// Fetch the full trade list for all sub-accounts
    async fn fetch_trades(&self) -> Result<Vec<Trade>, ApiError>;
}

/// HTTP client for the dashboard backend's trade feed
pub struct DashboardClient {
    base_url: String,
    http_client: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl DashboardClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_rate_limit(base_url, RateLimitConfig::default())
    }

    pub fn with_rate_limit(base_url: impl Into<String>, config: RateLimitConfig) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
            rate_limiter: RateLimiter::new(config),
        }
    }
}

#[async_trait]
impl TradeFeed for DashboardClient {
    async fn fetch_trades(&self) -> Result<Vec<Trade>, ApiError> {
        self.rate_limiter.acquire().await;

        let url = format!("{}{}", self.base_url, TRADES_ENDPOINT);
        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        if status == 429 {
            return Err(ApiError::RateLimitError(
                "Backend rejected the poll. Please wait before retrying.".to_string(),
            ));
        }

        if status == 401 || status == 403 {
            return Err(ApiError::AuthenticationError(
                "Dashboard session rejected by the backend".to_string(),
            ));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::BackendError {
                status: status.as_u16(),
                message,
            });
        }

        // Parse from text so a malformed body ends up in the error message
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::ParseError(format!("Failed to parse trade list: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = DashboardClient::new("http://localhost:8000/");
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_trade_list_body_parses() {
        let body = r#"[
            {"id": 1, "closed_pnl": 10.0, "created_time": "2026-08-28T09:00:00"},
            {"id": 2, "closed_pnl": null, "created_time": "2026-08-28T09:01:00"}
        ]"#;

        let trades: Vec<Trade> = serde_json::from_str(body).unwrap();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].realized_pnl(), Some(10.0));
        assert_eq!(trades[1].realized_pnl(), None);
    }
}
