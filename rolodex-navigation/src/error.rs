use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("Location is invalid")]
    InvalidLocation(#[from] url::ParseError),
    #[error("Replacing the location must not change the path: {0} -> {1}")]
    PathChanged(String, String),
    #[error("History state serialization failed")]
    Serialization(#[from] serde_json::Error),
}
