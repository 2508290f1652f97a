pub mod api;
pub mod config;
pub mod services;

pub use services::{config_store, wifi_scan};
