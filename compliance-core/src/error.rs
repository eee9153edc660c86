use thiserror::Error;

/// Characters of body kept when a request fails on its HTTP status.
pub const HTTP_BODY_EXCERPT: usize = 200;
/// Characters of body kept when a success response is not JSON.
pub const NON_JSON_BODY_EXCERPT: usize = 120;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure, message passed through untouched.
    #[error("{0}")]
    Network(String),

    #[error("HTTP {status} {status_text}. Body: {body_excerpt}")]
    Http {
        status: u16,
        status_text: String,
        body_excerpt: String,
    },

    #[error("non-JSON response (content-type={content_type}). First 120 chars: {body_excerpt}")]
    NonJson {
        content_type: String,
        body_excerpt: String,
    },

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The caller cancelled the request. Never surfaced to the user.
    #[error("request aborted")]
    Aborted,
}

impl FetchError {
    pub fn is_abort(&self) -> bool {
        matches!(self, FetchError::Aborted)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// First `limit` characters of `text`, never splitting a code point.
pub fn excerpt(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
