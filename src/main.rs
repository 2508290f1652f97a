use actix_web::{App, HttpServer, web::Data};
use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use homething_provisioning::{
    api::{self, SimulatorApi},
    config::AppConfig,
    wifi_scan::FileScanner,
};
use log::{error, info};
use std::io::Write;

#[actix_web::main]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    initialize();

    let config = AppConfig::init().context("failed to load configuration")?;
    let api = Data::new(SimulatorApi::from_config(config).context("failed to create api")?);
    let static_dir = config.paths.static_dir.clone();
    let port = config.server.port;

    info!("serving {} on port {port}", static_dir.display());

    HttpServer::new(move || {
        App::new()
            .app_data(api.clone())
            .configure(|cfg| api::configure::<FileScanner>(cfg, &static_dir))
    })
    .bind(format!("0.0.0.0:{port}"))
    .context("failed to bind server")?
    .run()
    .await
    .context("server stopped with error")
}

fn initialize() {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => {
            eprintln!("{}", record.args());
            Ok(())
        }
        _ => {
            writeln!(f, "{}", record.args())
        }
    });

    builder.target(Target::Stdout).init();

    info!("module version: {}", env!("CARGO_PKG_VERSION"));
}
