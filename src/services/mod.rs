//! Device-side services
//!
//! Business logic separated from HTTP concerns: the stored config values
//! and the wifi scan results.

pub mod config_store;
pub mod wifi_scan;
