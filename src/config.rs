use anyhow::{Context, Result};
use std::{env, path::PathBuf, sync::OnceLock};

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Simulator configuration loaded from environment variables at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Files served or read by the simulator
    pub paths: PathConfig,

    /// Simulated device identity and limits
    pub device: DeviceConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct PathConfig {
    pub settings_path: PathBuf,
    pub static_dir: PathBuf,
    pub scan_results_path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct DeviceConfig {
    /// Station MAC address
    pub id: Vec<u8>,
    /// Largest accepted `POST /config` body
    pub max_config_bytes: usize,
}

impl AppConfig {
    /// Load the configuration once and cache it
    ///
    /// Later calls return the cached instance.
    pub fn init() -> Result<&'static Self> {
        if let Some(config) = APP_CONFIG.get() {
            return Ok(config);
        }

        let config = Self::load()?;
        Ok(APP_CONFIG.get_or_init(|| config))
    }

    fn load() -> Result<Self> {
        Ok(Self {
            server: ServerConfig::load()?,
            paths: PathConfig::load(),
            device: DeviceConfig::load()?,
        })
    }
}

impl ServerConfig {
    fn load() -> Result<Self> {
        let port = env::var("PROVISIONING_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("failed to parse PROVISIONING_PORT: invalid format")?;

        Ok(Self { port })
    }
}

impl PathConfig {
    fn load() -> Self {
        let settings_path =
            PathBuf::from(env::var("SETTINGS_PATH").unwrap_or_else(|_| "settings.json".into()));
        let static_dir = PathBuf::from(env::var("STATIC_DIR").unwrap_or_else(|_| "static".into()));
        let scan_results_path = env::var("SCAN_RESULTS_PATH").ok().map(PathBuf::from);

        Self {
            settings_path,
            static_dir,
            scan_results_path,
        }
    }
}

impl DeviceConfig {
    fn load() -> Result<Self> {
        let id = parse_device_id(
            &env::var("DEVICE_ID").unwrap_or_else(|_| "a0b1c2d3e4f5".to_string()),
        )
        .context("failed to parse DEVICE_ID")?;

        let max_config_bytes = env::var("MAX_CONFIG_BYTES")
            .unwrap_or_else(|_| "1024".to_string())
            .parse::<usize>()
            .context("failed to parse MAX_CONFIG_BYTES: invalid format")?;

        Ok(Self {
            id,
            max_config_bytes,
        })
    }
}

/// Parse a MAC address given as 12 hex digits, separators allowed
pub fn parse_device_id(text: &str) -> Result<Vec<u8>> {
    let digits: String = text
        .chars()
        .filter(|c| !matches!(c, ':' | '-'))
        .collect();

    anyhow::ensure!(
        digits.len() == 12 && digits.chars().all(|c| c.is_ascii_hexdigit()),
        "expected 12 hex digits, got '{text}'"
    );

    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).context("invalid hex digit"))
        .collect()
}
