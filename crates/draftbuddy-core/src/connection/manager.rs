//! Connection manager: owns the active device's address and liveness.
//!
//! One manager tracks one DraftBuddy at a time. It adopts a device via
//! auto-connect (scan, prefer `service` mode, confirm with a health
//! check), keeps liveness current with a recurring background check, and
//! guards every API call behind the liveness flag so callers fail fast
//! instead of waiting out timeouts against a dead device.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::connection::status::{ConnectionPhase, NoopStatus, StatusSink};
use crate::discovery::probe::STATUS_PATH;
use crate::discovery::scanner::{self, ScanConfig};
use crate::error::{DeviceError, Result};
use crate::types::{DeviceRecord, OperatingMode, StatusPayload};

/// Health-check timeout against a known base address.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

/// Interval between recurring health checks.
pub const CHECK_INTERVAL: Duration = Duration::from_secs(10);

/// Default timeout for gateway requests.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for background-image uploads.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Manager tuning knobs.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Discovery scan parameters
    pub scan: ScanConfig,
    /// Health-check timeout
    pub health_timeout: Duration,
    /// Gateway request timeout
    pub request_timeout: Duration,
    /// Upload timeout
    pub upload_timeout: Duration,
    /// Recurring health-check interval
    pub check_interval: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            health_timeout: HEALTH_TIMEOUT,
            request_timeout: REQUEST_TIMEOUT,
            upload_timeout: UPLOAD_TIMEOUT,
            check_interval: CHECK_INTERVAL,
        }
    }
}

/// Options for a gateway request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method (GET when unset)
    pub method: Method,
    /// Extra headers; these win over the default JSON content-type
    pub headers: HeaderMap,
    /// Request body
    pub body: Option<Bytes>,
}

#[derive(Debug, Default)]
struct ConnState {
    base_addr: Option<String>,
    device: Option<DeviceRecord>,
    alive: bool,
    discovered: Vec<DeviceRecord>,
}

struct Inner {
    config: ManagerConfig,
    client: Client,
    state: RwLock<ConnState>,
    monitor: Mutex<Option<JoinHandle<()>>>,
    status: Arc<dyn StatusSink>,
}

/// Manages the connection to one DraftBuddy device.
///
/// Cheap to clone; all clones share the same state. Create with
/// [`ConnectionManager::new`], tear down with
/// [`ConnectionManager::shutdown`].
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Arc<Inner>,
}

impl ConnectionManager {
    /// Create a manager with no status reporting.
    pub fn new(config: ManagerConfig) -> Result<Self> {
        Self::with_status(config, Arc::new(NoopStatus))
    }

    /// Create a manager that reports transitions through `status`.
    pub fn with_status(config: ManagerConfig, status: Arc<dyn StatusSink>) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                client,
                state: RwLock::new(ConnState::default()),
                monitor: Mutex::new(None),
                status,
            }),
        })
    }

    /// Whether the last health probe against the current device succeeded.
    pub async fn is_connected(&self) -> bool {
        self.inner.state.read().await.alive
    }

    /// Address of the currently adopted device, if any.
    pub async fn base_address(&self) -> Option<String> {
        self.inner.state.read().await.base_addr.clone()
    }

    /// Record of the currently adopted device, if any.
    pub async fn current_device(&self) -> Option<DeviceRecord> {
        self.inner.state.read().await.device.clone()
    }

    /// Snapshot of the last scan's results, in discovery order.
    pub async fn discovered_devices(&self) -> Vec<DeviceRecord> {
        self.inner.state.read().await.discovered.clone()
    }

    /// Run a discovery scan and replace the known-device list wholesale.
    pub async fn scan_for_devices<F>(&self, progress: F) -> Vec<DeviceRecord>
    where
        F: FnMut(u8, usize, usize),
    {
        let found = scanner::scan(&self.inner.client, &self.inner.config.scan, progress).await;
        self.inner.state.write().await.discovered = found.clone();
        found
    }

    /// Scan for devices and adopt the best match.
    ///
    /// Prefers a `service`-mode device, falling back to the first match in
    /// discovery order, then confirms with a health check. Returns false
    /// when the scan finds nothing or the confirmation check fails;
    /// either way the outcome is reported through the status sink.
    pub async fn auto_connect(&self) -> bool {
        self.inner
            .status
            .on_status(ConnectionPhase::Scanning, "Scanning for devices...");

        let found = self
            .scan_for_devices(|percent, scanned, total| {
                self.inner.status.on_status(
                    ConnectionPhase::Scanning,
                    &format!("Scanning network... {}% ({}/{})", percent, scanned, total),
                );
            })
            .await;

        if found.is_empty() {
            self.inner.state.write().await.alive = false;
            self.inner
                .status
                .on_status(ConnectionPhase::Disconnected, "No DraftBuddy devices found");
            return false;
        }

        let selected = found
            .iter()
            .find(|d| d.mode == OperatingMode::Service)
            .unwrap_or(&found[0])
            .clone();

        info!(addr = %selected.addr, name = %selected.name, "adopting device");

        {
            let mut state = self.inner.state.write().await;
            state.base_addr = Some(selected.addr.clone());
            state.device = Some(selected.clone());
        }

        if self.probe_base().await {
            self.inner.status.on_status(
                ConnectionPhase::Connected,
                &format!("Connected to {} ({})", selected.name, selected.addr),
            );
            true
        } else {
            self.inner.status.on_status(
                ConnectionPhase::Disconnected,
                "Failed to connect to discovered device",
            );
            false
        }
    }

    /// Health-check the current device.
    ///
    /// With no base address known this delegates to [`auto_connect`].
    /// Otherwise probes `{base}/status` with the health timeout; success
    /// marks the connection live (backfilling the device record when it
    /// is missing), any failure marks it dead. Never errors.
    ///
    /// [`auto_connect`]: ConnectionManager::auto_connect
    pub async fn check_connection(&self) -> bool {
        let configured = self.inner.state.read().await.base_addr.is_some();
        if !configured {
            return self.auto_connect().await;
        }

        let alive = self.probe_base().await;
        self.push_default_status().await;
        alive
    }

    /// Start recurring health checks: one immediately, then one per
    /// configured interval. Idempotent - a second start while the task is
    /// still running is a no-op.
    pub async fn start_monitoring(&self) {
        let mut monitor = self.inner.monitor.lock().await;
        if let Some(handle) = monitor.as_ref() {
            if !handle.is_finished() {
                debug!("monitor already running");
                return;
            }
        }

        let manager = self.clone();
        let interval = self.inner.config.check_interval;
        *monitor = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                // First tick completes immediately
                ticker.tick().await;
                manager.check_connection().await;
            }
        }));
    }

    /// Cancel the recurring health check, abandoning any in-flight probe.
    pub async fn stop_monitoring(&self) {
        let mut monitor = self.inner.monitor.lock().await;
        if let Some(handle) = monitor.take() {
            handle.abort();
        }
    }

    /// Tear the manager down, cancelling background work. All clones
    /// share the effect.
    pub async fn shutdown(&self) {
        self.stop_monitoring().await;
    }

    /// Issue a request through the liveness-guarded gateway.
    ///
    /// Rejects without touching the network when no device is adopted or
    /// the last check failed - the point of tracking liveness is to
    /// short-circuit known-dead connections instead of waiting out a
    /// timeout per call. The default JSON content-type is applied before
    /// caller headers, so callers win on conflict. Any failure, network
    /// error or non-2xx alike, marks the device offline before the error
    /// is surfaced.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<Response> {
        let base = {
            let state = self.inner.state.read().await;
            match (&state.base_addr, state.alive) {
                (Some(base), true) => base.clone(),
                _ => return Err(DeviceError::NotConnected.into()),
            }
        };

        let url = format!("http://{}{}", base, endpoint);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in options.headers.iter() {
            headers.insert(name, value.clone());
        }

        let mut request = self.inner.client.request(options.method, &url).headers(headers);
        if let Some(body) = options.body {
            request = request.body(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(endpoint, error = %e, "gateway call failed");
                self.mark_offline().await;
                return Err(e.into());
            }
        };

        if !response.status().is_success() {
            let status = response.status().as_u16();
            warn!(endpoint, status, "gateway call failed");
            self.mark_offline().await;
            return Err(DeviceError::ApiFailed {
                endpoint: endpoint.to_string(),
                status,
            }
            .into());
        }

        Ok(response)
    }

    /// Adopt a previously discovered device and re-check the connection.
    ///
    /// Errors without side effects when the address was not in the last
    /// scan's result list.
    pub async fn switch_device(&self, addr: &str) -> Result<bool> {
        let device = {
            let state = self.inner.state.read().await;
            state.discovered.iter().find(|d| d.addr == addr).cloned()
        };

        let device = match device {
            Some(device) => device,
            None => return Err(DeviceError::NotFound(addr.to_string()).into()),
        };

        {
            let mut state = self.inner.state.write().await;
            state.base_addr = Some(device.addr.clone());
            state.device = Some(device.clone());
        }

        let connected = self.check_connection().await;
        if connected {
            info!(addr, name = %device.name, "switched device");
        }
        Ok(connected)
    }

    /// Adopt an operator-supplied address directly, skipping discovery.
    ///
    /// The device record starts empty; the next health check backfills it
    /// from the status response.
    pub async fn set_address(&self, addr: &str) {
        let mut state = self.inner.state.write().await;
        state.base_addr = Some(addr.to_string());
        state.device = None;
        state.alive = false;
    }

    /// Upload timeout for the raw upload path (see `api` module).
    pub(crate) fn upload_timeout(&self) -> Duration {
        self.inner.config.upload_timeout
    }

    pub(crate) fn client(&self) -> &Client {
        &self.inner.client
    }

    /// Probe the known base address. Updates the liveness flag but emits
    /// no status text.
    async fn probe_base(&self) -> bool {
        let base = match self.inner.state.read().await.base_addr.clone() {
            Some(base) => base,
            None => return false,
        };

        let url = format!("http://{}{}", base, STATUS_PATH);
        let response = self
            .inner
            .client
            .get(&url)
            .timeout(self.inner.config.health_timeout)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                let missing = self.inner.state.read().await.device.is_none();
                if missing {
                    // Backfill the record from the same response body
                    match response.json::<StatusPayload>().await {
                        Ok(status) => {
                            let record = DeviceRecord::from_status(&base, &status);
                            let mut state = self.inner.state.write().await;
                            state.device = Some(record);
                            state.alive = true;
                        }
                        Err(e) => {
                            debug!(addr = %base, error = %e, "health check body undecodable");
                            self.inner.state.write().await.alive = false;
                            return false;
                        }
                    }
                } else {
                    self.inner.state.write().await.alive = true;
                }
                true
            }
            _ => {
                self.inner.state.write().await.alive = false;
                false
            }
        }
    }

    async fn mark_offline(&self) {
        self.inner.state.write().await.alive = false;
        self.push_default_status().await;
    }

    /// Report status text derived from current state.
    async fn push_default_status(&self) {
        let (alive, device) = {
            let state = self.inner.state.read().await;
            (state.alive, state.device.clone())
        };

        match device {
            Some(device) if alive => self.inner.status.on_status(
                ConnectionPhase::Connected,
                &format!("Connected to {} ({})", device.name, device.addr),
            ),
            _ => self
                .inner
                .status
                .on_status(ConnectionPhase::Disconnected, "Device Offline"),
        }
    }
}
