use crate::{
    config::AppConfig,
    services::{
        config_store::{ConfigError, ConfigStore},
        wifi_scan::{FileScanner, SharedScanCache, WifiScanner},
    },
};
use actix_files::Files;
use actix_web::{
    HttpRequest, HttpResponse, Responder,
    http::header::{ACCEPT, CONTENT_TYPE},
    web,
};
use anyhow::{Context, Result};
use homething_provisioning_core::{Schema, WifiScan, WireFormat, codec::JSON_CONTENT_TYPE};
use log::{debug, error, warn};
use std::{fs, path::Path, time::Instant};

pub type SimulatorApi = Api<FileScanner>;

/// Shared state of the simulated device
pub struct Api<Scanner>
where
    Scanner: WifiScanner,
{
    pub store: ConfigStore,
    pub scanner: Scanner,
    scan_cache: SharedScanCache,
    settings_json: String,
    max_config_bytes: usize,
}

impl<Scanner> Api<Scanner>
where
    Scanner: WifiScanner + 'static,
{
    pub fn new(
        settings_json: String,
        device_id: Vec<u8>,
        max_config_bytes: usize,
        scanner: Scanner,
    ) -> Result<Self> {
        let schema = Schema::from_json(&settings_json).context("failed to load settings")?;

        Ok(Api {
            store: ConfigStore::new(schema, device_id),
            scanner,
            scan_cache: SharedScanCache::default(),
            settings_json,
            max_config_bytes,
        })
    }

    /// The settings schema describing the config form
    pub async fn settings(api: web::Data<Self>) -> impl Responder {
        debug!("settings() called");

        HttpResponse::Ok()
            .content_type(JSON_CONTENT_TYPE)
            .body(api.settings_json.clone())
    }

    pub async fn get_config(req: HttpRequest, api: web::Data<Self>) -> impl Responder {
        let format = match req.headers().get(ACCEPT).and_then(|v| v.to_str().ok()) {
            Some(accept) if WireFormat::accepted_by(accept) => WireFormat::MessagePack,
            _ => WireFormat::Json,
        };
        debug!("get_config() called: {}", format.content_type());

        let payload = match api.store.snapshot() {
            Ok(payload) => payload,
            Err(e) => return config_error_response(e),
        };

        match format.encode(&payload) {
            Ok(body) => HttpResponse::Ok()
                .content_type(format.content_type())
                .body(body),
            Err(e) => {
                error!("get_config failed: {e}");
                HttpResponse::InternalServerError().body("failed to encode config")
            }
        }
    }

    pub async fn post_config(
        req: HttpRequest,
        body: web::Bytes,
        api: web::Data<Self>,
    ) -> impl Responder {
        debug!("post_config() called: {} bytes", body.len());

        if body.len() > api.max_config_bytes {
            return config_error_response(ConfigError::TooLarge);
        }

        let format = WireFormat::from_content_type(
            req.headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        );

        let payload = match format.decode(&body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("post_config: {e}");
                return config_error_response(ConfigError::Parse);
            }
        };

        match api.store.apply(&payload) {
            Ok(()) => HttpResponse::Ok().body("Saved"),
            Err(e) => config_error_response(e),
        }
    }

    pub async fn wifiscan(api: web::Data<Self>) -> impl Responder {
        debug!("wifiscan() called");

        match api.scan_cache.networks(&api.scanner, Instant::now()) {
            Ok(networks) => HttpResponse::Ok().json(WifiScan { networks }),
            Err(e) => {
                error!("wifiscan failed: {e:#}");
                HttpResponse::InternalServerError().body("scan unavailable")
            }
        }
    }
}

impl SimulatorApi {
    /// Build the simulator state from the loaded configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let settings_json = fs::read_to_string(&config.paths.settings_path).with_context(|| {
            format!(
                "failed to read settings {}",
                config.paths.settings_path.display()
            )
        })?;

        Self::new(
            settings_json,
            config.device.id.clone(),
            config.device.max_config_bytes,
            FileScanner::new(config.paths.scan_results_path.clone()),
        )
    }
}

fn config_error_response(e: ConfigError) -> HttpResponse {
    match e {
        ConfigError::Unavailable => {
            error!("config request failed: {e}");
            HttpResponse::InternalServerError().body(e.to_string())
        }
        _ => {
            warn!("config request rejected: {e}");
            HttpResponse::BadRequest().body(e.to_string())
        }
    }
}

/// Register the device endpoints and the static page
pub fn configure<Scanner>(cfg: &mut web::ServiceConfig, static_dir: &Path)
where
    Scanner: WifiScanner + 'static,
{
    cfg.route("/settings.json", web::get().to(Api::<Scanner>::settings))
        .route("/config", web::get().to(Api::<Scanner>::get_config))
        .route("/config", web::post().to(Api::<Scanner>::post_config))
        .route("/wifiscan", web::get().to(Api::<Scanner>::wifiscan))
        .service(Files::new("/", static_dir).index_file("index.html"));
}
