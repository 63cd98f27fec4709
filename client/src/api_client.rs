use crate::error::ClientError;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
pub const RECOMMEND_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct QueryPayload<'a> {
    query: &'a str,
}

/// HTTP adapter for the recommendation backend.
///
/// Every call is independent: no retries, no caching.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    health_timeout: Duration,
    recommend_timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeouts(base_url, HEALTH_TIMEOUT, RECOMMEND_TIMEOUT)
    }

    pub fn with_timeouts(base_url: &str, health_timeout: Duration, recommend_timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            health_timeout,
            recommend_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `true` only when `GET /health` answers 200 within the timeout.
    pub async fn check_health(&self) -> bool {
        let result = self
            .client
            .get(format!("{}/health", self.base_url))
            .timeout(self.health_timeout)
            .send()
            .await;

        match result {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                log::warn!("Health check failed: {e}");
                false
            }
        }
    }

    /// Posts the query and returns the answer text.
    pub async fn get_recommendation(&self, query: &str) -> Result<String, ClientError> {
        let response = self
            .client
            .post(format!("{}/recommend", self.base_url))
            .timeout(self.recommend_timeout)
            .json(&QueryPayload { query })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::RateLimited);
        }

        let body = response.text().await?;
        let json: Option<Value> = serde_json::from_str(&body).ok();

        if status == StatusCode::OK {
            return match json.as_ref().and_then(|v| v.get("answer")).and_then(Value::as_str) {
                Some(answer) => Ok(answer.to_string()),
                None => {
                    log::warn!("Response is missing the answer field");
                    Err(ClientError::Server {
                        status: status.as_u16(),
                        detail: None,
                    })
                }
            };
        }

        let detail = json.as_ref().and_then(|v| v.get("detail")).and_then(|d| match d {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });

        Err(ClientError::Server {
            status: status.as_u16(),
            detail,
        })
    }
}
