//! Google Cloud provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GcpError {
    #[error("failed to obtain access token: {0}")]
    AuthenticationFailed(String),

    #[error("gcloud command failed: {0}")]
    CommandFailed(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unsupported resource: {0}")]
    UnsupportedResource(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GcpError>;

impl From<GcpError> for fedtidy_cloud::CloudError {
    fn from(e: GcpError) -> Self {
        match e {
            GcpError::AuthenticationFailed(msg) => fedtidy_cloud::CloudError::AuthenticationFailed(msg),
            GcpError::UnsupportedResource(msg) => fedtidy_cloud::CloudError::InvalidResource(msg),
            GcpError::JsonError(e) => fedtidy_cloud::CloudError::Json(e),
            GcpError::IoError(e) => fedtidy_cloud::CloudError::Io(e),
            other => fedtidy_cloud::CloudError::ApiError(other.to_string()),
        }
    }
}
