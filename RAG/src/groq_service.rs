use crate::error::{make_snippet, LlmError};
use crate::models::*;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Third pipeline stage: sends a rendered prompt to a language model.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<LlmResponse>;
}

/// Chat completion client for Groq's OpenAI-compatible API.
pub struct GroqService {
    client: Client,
    url: String,
    model: String,
    temperature: f32,
}

impl GroqService {
    pub fn new(api_key: &str, base_url: &str, model: &str, temperature: f32) -> Result<Self> {
        if model.trim().is_empty() {
            anyhow::bail!("model name must not be empty");
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| anyhow::anyhow!("invalid API key header: {e}"))?,
        );

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        let url = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        log::info!("Groq client ready (model: {model}, endpoint: {url})");

        Ok(Self {
            client,
            url,
            model: model.to_string(),
            temperature,
        })
    }

    async fn send(&self, prompt: &str) -> Result<LlmResponse, LlmError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(prompt.to_string()),
            }],
            temperature: self.temperature,
        };

        let response = self.client.post(&self.url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::HttpStatus {
                status,
                snippet: make_snippet(&body),
            });
        }

        resolve_response(&body)
    }
}

/// Maps a raw completion body onto [`LlmResponse`].
fn resolve_response(body: &str) -> Result<LlmResponse, LlmError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Decode(e.to_string()))?;

    let choice = parsed.choices.into_iter().next().ok_or(LlmError::EmptyChoices)?;
    match choice.message.content {
        Some(content) => Ok(LlmResponse::Structured {
            content,
            model: parsed.model,
        }),
        None => {
            let raw = serde_json::to_string(&choice.message)
                .map_err(|e| LlmError::Decode(e.to_string()))?;
            Ok(LlmResponse::RawText(raw))
        }
    }
}

#[async_trait]
impl LlmClient for GroqService {
    async fn complete(&self, prompt: &str) -> Result<LlmResponse> {
        log::debug!("Sending prompt of {} chars to {}", prompt.len(), self.model);
        Ok(self.send(prompt).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/openai/v1")
    }

    #[test]
    fn structured_and_raw_replies_are_resolved() {
        let body = r#"{"model":"m","choices":[{"message":{"role":"assistant","content":"Watch Naruto."}}]}"#;
        assert_eq!(
            resolve_response(body).unwrap(),
            LlmResponse::Structured {
                content: "Watch Naruto.".to_string(),
                model: Some("m".to_string())
            }
        );

        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let resolved = resolve_response(body).unwrap();
        assert!(matches!(resolved, LlmResponse::RawText(ref t) if t.contains("assistant")));
    }

    #[test]
    fn empty_or_malformed_replies_fail() {
        assert!(matches!(
            resolve_response(r#"{"choices":[]}"#),
            Err(LlmError::EmptyChoices)
        ));
        assert!(matches!(resolve_response("<html>"), Err(LlmError::Decode(_))));
    }

    #[tokio::test]
    async fn sends_deterministic_chat_request() {
        let app = Router::new().route(
            "/openai/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let echo = format!(
                    "{}|{}|{}|{}",
                    auth, body["model"], body["temperature"], body["messages"][0]["content"]
                );
                Json(json!({
                    "model": body["model"],
                    "choices": [{"message": {"role": "assistant", "content": echo}}]
                }))
            }),
        );
        let base = spawn(app).await;

        let service = GroqService::new("gsk_secret", &base, "llama-3.1-8b-instant", 0.0).unwrap();
        let text = service.complete("hello").await.unwrap().into_text();
        assert_eq!(text, r#"Bearer gsk_secret|"llama-3.1-8b-instant"|0.0|"hello""#);
    }

    #[tokio::test]
    async fn provider_errors_are_reported_with_status() {
        let app = Router::new().route(
            "/openai/v1/chat/completions",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "over capacity") }),
        );
        let base = spawn(app).await;

        let service = GroqService::new("k", &base, "m", 0.0).unwrap();
        let err = service.complete("hello").await.unwrap_err();
        let llm_err = err.downcast_ref::<LlmError>().unwrap();
        assert!(matches!(
            llm_err,
            LlmError::HttpStatus { status, snippet }
                if *status == reqwest::StatusCode::SERVICE_UNAVAILABLE && snippet == "over capacity"
        ));
    }

    #[test]
    fn empty_model_is_rejected() {
        assert!(GroqService::new("k", "http://localhost", " ", 0.0).is_err());
    }
}
