use crate::error::ClientError;

pub const MIN_QUERY_LEN: usize = 3;

/// Trims the query and rejects anything shorter than [`MIN_QUERY_LEN`]
/// characters (Unicode scalar values). Nothing is sent when this fails.
pub fn validate_query(raw: &str) -> Result<&str, ClientError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_QUERY_LEN {
        return Err(ClientError::Validation { min: MIN_QUERY_LEN });
    }
    Ok(trimmed)
}
