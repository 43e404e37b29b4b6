//! Connection status reporting.

/// Phase of the connection lifecycle, reported alongside status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    /// Discovery scan in progress
    Scanning,
    /// Health check against the current device succeeded
    Connected,
    /// No device adopted, or the last check failed
    Disconnected,
}

impl ConnectionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionPhase::Scanning => "scanning",
            ConnectionPhase::Connected => "connected",
            ConnectionPhase::Disconnected => "disconnected",
        }
    }
}

/// Trait for receiving connection status transitions.
///
/// Implement this to surface status text to an operator. The CLI prints
/// colored lines; headless callers use `NoopStatus`.
pub trait StatusSink: Send + Sync {
    fn on_status(&self, phase: ConnectionPhase, message: &str);
}

/// No-op sink for when status reporting isn't needed.
pub struct NoopStatus;

impl StatusSink for NoopStatus {
    fn on_status(&self, _phase: ConnectionPhase, _message: &str) {}
}
