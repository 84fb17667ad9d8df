use thiserror::Error;

/// Errors that can occur when talking to the metadata service
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Metadata service returned status {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("Invalid response from metadata service: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, MetadataError>;
