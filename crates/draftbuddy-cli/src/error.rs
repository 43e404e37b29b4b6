//! Error types for DraftBuddy CLI.
//!
//! CliError wraps CoreError from the shared library and adds CLI-specific variants.

use draftbuddy_core::error::CoreError;
use thiserror::Error;

// Re-export core error types so command modules can use them via crate::error
pub use draftbuddy_core::error::DeviceError;

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const CONNECTION_ERROR: i32 = 2;
    pub const NO_DEVICES: i32 = 3;
    pub const INVALID_ARGS: i32 = 4;
}

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("No DraftBuddy devices found")]
    NoDevicesFound,

    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(e) => match e {
                CoreError::Device(_) => exit_codes::CONNECTION_ERROR,
                CoreError::Http(_) => exit_codes::CONNECTION_ERROR,
                CoreError::Image(_) => exit_codes::GENERAL_ERROR,
                CoreError::Io(_) => exit_codes::GENERAL_ERROR,
                CoreError::Other(_) => exit_codes::GENERAL_ERROR,
            },
            CliError::Io(_) => exit_codes::GENERAL_ERROR,
            CliError::InvalidArgument(_) => exit_codes::INVALID_ARGS,
            CliError::ConnectionFailed(_) => exit_codes::CONNECTION_ERROR,
            CliError::NoDevicesFound => exit_codes::NO_DEVICES,
            CliError::Other(_) => exit_codes::GENERAL_ERROR,
        }
    }
}

// Conversion from core device errors to CliError
impl From<DeviceError> for CliError {
    fn from(e: DeviceError) -> Self {
        CliError::Core(CoreError::Device(e))
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
