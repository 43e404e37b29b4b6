//! Connection management layer.
//!
//! Tracks the active device, its liveness, and the guarded request path.

pub mod manager;
pub mod status;

pub use manager::{
    ConnectionManager, ManagerConfig, RequestOptions, CHECK_INTERVAL, HEALTH_TIMEOUT,
    REQUEST_TIMEOUT, UPLOAD_TIMEOUT,
};
pub use status::{ConnectionPhase, NoopStatus, StatusSink};
