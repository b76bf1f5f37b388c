use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("Product '{0}' not found")]
    NotFound(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DataError {
    pub(crate) fn network<E: std::fmt::Display>(err: E) -> Self {
        Self::Network(err.to_string())
    }

    pub(crate) fn parse<E: std::fmt::Display>(err: E) -> Self {
        Self::Parse(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Feedback request failed: {0}")]
    Network(String),
    #[error("Feedback store rejected '{card_id}' with HTTP {status}")]
    Rejected { card_id: String, status: u16 },
    #[error("Could not encode feedback: {0}")]
    Encode(String),
}

impl FeedbackError {
    pub(crate) fn network<E: std::fmt::Display>(err: E) -> Self {
        Self::Network(err.to_string())
    }
}
