//! Error types for the recommender library.
//!
//! Stage implementations return `anyhow::Result` so any cause can travel up
//! unchanged; the pipeline wraps those causes into [`RecommenderError`] with a
//! short context line.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecommenderError>;

#[derive(Debug, Error)]
pub enum RecommenderError {
    /// Building the LLM client, retriever or prompt failed.
    #[error("{context}: {source}")]
    Initialization {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// Retrieval or the LLM call failed for a single request.
    #[error("{context}: {source}")]
    Invocation {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RecommenderError {
    pub fn initialization(context: &'static str, source: impl Into<anyhow::Error>) -> Self {
        RecommenderError::Initialization {
            context,
            source: source.into(),
        }
    }

    pub fn invocation(context: &'static str, source: impl Into<anyhow::Error>) -> Self {
        RecommenderError::Invocation {
            context,
            source: source.into(),
        }
    }
}

/// Problems reading settings from the environment.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    #[error("invalid format in {var}: {reason}")]
    InvalidFormat {
        var: &'static str,
        reason: &'static str,
    },
}

/// Failures of the chat completion adapter.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM provider returned HTTP {status}: {snippet}")]
    HttpStatus { status: StatusCode, snippet: String },

    #[error("LLM provider returned no choices")]
    EmptyChoices,

    #[error("could not decode LLM response: {0}")]
    Decode(String),

    #[error("LLM transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Trims a response body to something that fits on one log line.
pub(crate) fn make_snippet(body: &str) -> String {
    const MAX: usize = 300;
    let trimmed = body.trim();
    if trimmed.chars().count() > MAX {
        let cut: String = trimmed.chars().take(MAX).collect();
        format!("{cut}...")
    } else {
        trimmed.to_string()
    }
}
