//! Terminal frontend for the anime recommendation backend.

pub mod api_client;
pub mod error;
pub mod query;
pub mod ui;

pub use api_client::ApiClient;
pub use error::ClientError;
pub use query::validate_query;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// What happened to one line of user input.
#[derive(Debug, PartialEq, Eq)]
pub enum Submission {
    Answer(String),
    /// Too short; nothing was sent.
    Rejected(ClientError),
    /// Health probe failed right before sending.
    Offline,
    Failed(ClientError),
}

/// Validates the query, re-probes liveness, then submits it. `on_send` runs
/// just before the recommendation request goes out.
pub async fn submit<F: FnOnce()>(client: &ApiClient, raw_query: &str, on_send: F) -> Submission {
    let query = match validate_query(raw_query) {
        Ok(query) => query,
        Err(e) => return Submission::Rejected(e),
    };

    if !client.check_health().await {
        return Submission::Offline;
    }

    on_send();
    match client.get_recommendation(query).await {
        Ok(answer) => Submission::Answer(answer),
        Err(e) => Submission::Failed(e),
    }
}
