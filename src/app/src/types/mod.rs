//! Domain-based type organization
//!
//! - schema: Settings schema loaded from `settings.json`
//! - payload: Config payload exchanged with the device
//! - form: Rendered form state handed to the shell
//! - network: Wifi scan results and the network combo widget

pub mod form;
pub mod network;
pub mod payload;
pub mod schema;

pub use form::*;
pub use network::*;
pub use payload::*;
pub use schema::*;
