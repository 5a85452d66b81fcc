use thiserror::Error;

/// Failure of a single request against the contact API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server was not reached, or answered with a body we could not read.
    #[error("{0}")]
    Network(String),

    /// The server answered and rejected the request.
    #[error("{message}")]
    Remote { status: u16, message: String },
}

impl ApiError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
