use thiserror::Error;

/// Failure fetching the remote catalog.
///
/// Unlike `StorageError`, these surface to the caller of `load_catalog()` as
/// the terminal failure of the whole operation; retry is caller-initiated.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure, including connection errors and timeouts.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-success HTTP status.
    #[error("server returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response was not well-formed JSON or lacked the `menu` array.
    #[error("malformed menu payload: {0}")]
    DataFormat(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl FetchError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        FetchError::Status {
            status: status.as_u16(),
            body: Self::truncate_body(body),
        }
    }
}
