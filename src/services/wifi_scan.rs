use anyhow::{Context, Result};
use homething_provisioning_core::ScannedNetwork;
use log::{debug, warn};
#[cfg(any(test, feature = "mock"))]
use mockall::automock;
use serde::Deserialize;
use serde_valid::Validate;
use std::{
    fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard},
    time::{Duration, Instant},
};

/// Minimum time between two scans
pub const RESCAN_INTERVAL: Duration = Duration::from_secs(30);

/// Source of visible wireless networks
#[cfg_attr(any(test, feature = "mock"), automock)]
pub trait WifiScanner: Send + Sync {
    /// Scan for networks, ranked by signal
    fn scan(&self) -> Result<Vec<ScannedNetwork>>;

    /// The access point the device is connected to, if any
    fn connected(&self) -> Option<ScannedNetwork>;
}

#[derive(Deserialize, Validate, Clone, Debug)]
pub struct ScanRecord {
    #[validate(min_length = 1)]
    #[validate(max_length = 32)]
    pub name: String,
    #[validate(minimum = -127)]
    #[validate(maximum = 0)]
    pub rssi: i32,
    #[validate(minimum = 1)]
    #[validate(maximum = 196)]
    pub channel: u32,
}

impl From<ScanRecord> for ScannedNetwork {
    fn from(record: ScanRecord) -> Self {
        Self {
            name: record.name,
            rssi: record.rssi,
            channel: record.channel,
        }
    }
}

/// Contents of a scan results file
#[derive(Deserialize, Debug, Default)]
pub struct ScanFile {
    #[serde(default)]
    pub connected: Option<ScanRecord>,
    pub networks: Vec<ScanRecord>,
}

/// Scanner replaying results from a JSON file
///
/// Without a file every scan is empty and the device is not connected.
#[derive(Clone, Debug, Default)]
pub struct FileScanner {
    path: Option<PathBuf>,
}

impl FileScanner {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    fn read(&self) -> Result<ScanFile> {
        let Some(path) = &self.path else {
            return Ok(ScanFile::default());
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read scan results {}", path.display()))?;
        let file: ScanFile =
            serde_json::from_str(&content).context("failed to parse scan results")?;
        for record in file.connected.iter().chain(&file.networks) {
            record
                .validate()
                .map_err(|e| anyhow::anyhow!("invalid scan record '{}': {e}", record.name))?;
        }

        Ok(file)
    }
}

impl WifiScanner for FileScanner {
    fn scan(&self) -> Result<Vec<ScannedNetwork>> {
        let file = self.read()?;
        Ok(file.networks.into_iter().map(Into::into).collect())
    }

    fn connected(&self) -> Option<ScannedNetwork> {
        match self.read() {
            Ok(file) => file.connected.map(Into::into),
            Err(e) => {
                warn!("no connected network: {e:#}");
                None
            }
        }
    }
}

/// Scan results of the last successful scan
#[derive(Debug, Default)]
pub struct ScanCache {
    scanned_at: Option<Instant>,
    networks: Option<Vec<ScannedNetwork>>,
}

impl ScanCache {
    /// Whether the last scan is older than `RESCAN_INTERVAL`
    pub fn is_due(&self, now: Instant) -> bool {
        self.scanned_at
            .is_none_or(|at| now.duration_since(at) > RESCAN_INTERVAL)
    }

    /// Keep the networks of a successful scan; a failed scan keeps the old ones
    pub fn record(&mut self, result: Result<Vec<ScannedNetwork>>, now: Instant) {
        match result {
            Ok(networks) => {
                debug!("scan found {} networks", networks.len());
                self.networks = Some(networks);
                self.scanned_at = Some(now);
            }
            Err(e) => warn!("wifi scan failed: {e:#}"),
        }
    }

    pub fn cached(&self) -> Option<Vec<ScannedNetwork>> {
        self.networks.clone()
    }
}

/// `ScanCache` shared between request handlers
///
/// A new scan runs at most once per `RESCAN_INTERVAL`. Until the first
/// scan succeeds the connected access point stands in for the results.
/// The scanner is never called with the lock held, so two requests racing
/// past the interval may both scan.
#[derive(Debug, Default)]
pub struct SharedScanCache(Mutex<ScanCache>);

impl SharedScanCache {
    pub fn networks(
        &self,
        scanner: &dyn WifiScanner,
        now: Instant,
    ) -> Result<Vec<ScannedNetwork>> {
        let due = self.lock()?.is_due(now);
        if due {
            let result = scanner.scan();
            self.lock()?.record(result, now);
        }

        let cached = self.lock()?.cached();
        Ok(cached.unwrap_or_else(|| scanner.connected().into_iter().collect()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ScanCache>> {
        self.0
            .lock()
            .map_err(|_| anyhow::anyhow!("scan cache lock poisoned"))
    }
}
