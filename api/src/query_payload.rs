use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct QueryPayload {
    pub query: String,
}
