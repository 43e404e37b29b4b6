//! Command implementations.

pub mod discover;
pub mod gallery;
pub mod monitor;
pub mod status;
pub mod upload;

pub use discover::run_discover;
pub use gallery::run_gallery;
pub use monitor::run_monitor;
pub use status::run_status;
pub use upload::run_upload;
