//! WebAssembly bindings used by the provisioning page
//!
//! The page sends serialized events and effect outputs in and reads
//! serialized effect requests and the view model back. Bridge failures are
//! raised as JavaScript errors instead of aborting the module.

use lazy_static::lazy_static;
use wasm_bindgen::prelude::{wasm_bindgen, JsError};

use crux_core::{
    bridge::{Bridge, EffectId},
    Core,
};

use crate::App;

lazy_static! {
    static ref CORE: Bridge<App> = Bridge::new(Core::new());
}

/// Set up console logging when the module loads
#[wasm_bindgen(start)]
pub fn init_wasm() {
    // Fails only if a logger is already installed
    console_log::init_with_level(log::Level::Debug).ok();
}

/// Process a serialized `Event`, returning serialized effect requests
#[wasm_bindgen]
pub fn process_event(event_bytes: &[u8]) -> Result<Vec<u8>, JsError> {
    let mut effects = Vec::new();
    CORE.update(event_bytes, &mut effects)
        .map_err(|e| JsError::new(&format!("failed to process event: {e}")))?;
    Ok(effects)
}

/// The serialized view model
#[wasm_bindgen]
pub fn view() -> Result<Vec<u8>, JsError> {
    let mut view = Vec::new();
    CORE.view(&mut view)
        .map_err(|e| JsError::new(&format!("failed to read view: {e}")))?;
    Ok(view)
}

/// Resolve effect `id` with a serialized output (HTTP response, timer output)
#[wasm_bindgen]
pub fn handle_response(id: u32, response_bytes: &[u8]) -> Result<Vec<u8>, JsError> {
    let mut effects = Vec::new();
    CORE.resolve(EffectId(id), response_bytes, &mut effects)
        .map_err(|e| JsError::new(&format!("failed to handle response {id}: {e}")))?;
    Ok(effects)
}
