use thiserror::Error;

/// Failure of an external model capability
///
/// Never escapes the analytics core: the model-backed strategies log it and
/// fall back to their heuristic counterpart.
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Inference request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Inference server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Inference timed out after {0} ms")]
    Timeout(u64),

    #[error("Malformed inference output: {0}")]
    Malformed(String),

    #[error("Inference backend unavailable: {0}")]
    Unavailable(String),
}

impl InferenceError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}
