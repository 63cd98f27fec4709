use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeDocument {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// A document handed back by a retriever, in ranking order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub title: String,
    pub content: String,
    pub score: f32,
}

/// Output of an LLM call, resolved once at the client boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmResponse {
    /// Chat-style reply exposing a text payload.
    Structured { content: String, model: Option<String> },
    /// Anything else, already coerced to text.
    RawText(String),
}

impl LlmResponse {
    pub fn into_text(self) -> String {
        match self {
            LlmResponse::Structured { content, .. } => content,
            LlmResponse::RawText(text) => text,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}
