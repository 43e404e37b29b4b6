//! Error types for DraftBuddy core.

use thiserror::Error;

/// Core error type for shared operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Device communication errors
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("No device connected")]
    NotConnected,

    #[error("Device not found: {0}")]
    NotFound(String),

    #[error("API call failed: {endpoint} returned status {status}")]
    ApiFailed { endpoint: String, status: u16 },

    #[error("Invalid response from {addr}: {message}")]
    InvalidResponse { addr: String, message: String },

    #[error("Upload failed on {addr}: {message}")]
    UploadFailed { addr: String, message: String },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
