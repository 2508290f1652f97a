mod form;
mod ui;
mod wifi;

use crux_core::{render::render, Command};
use log::{error, info};

use crate::codec::WireFormat;
use crate::events::Event;
use crate::form as engine;
use crate::model::Model;
use crate::types::Schema;
use crate::Effect;

pub use form::{CONFIG_ENDPOINT, SAVE_TIMEOUT_MS};

/// Main update dispatcher - routes events to domain-specific handlers
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::Initialize {
            settings,
            wire_format,
        } => initialize(&settings, wire_format, model),
        Event::Form(event) => form::handle(event, model),
        Event::Wifi(event) => wifi::handle(event, model),
        Event::Ui(event) => ui::handle(event, model),
    }
}

/// Render the form from the schema, then fetch the config and start scanning
fn initialize(settings: &str, wire_format: WireFormat, model: &mut Model) -> Command<Effect, Event> {
    let schema = match Schema::from_json(settings) {
        Ok(schema) => schema,
        Err(e) => {
            error!("failed to load settings: {e}");
            return model.set_error_and_render(e.to_string());
        }
    };

    let stop_scanning = model.wifi.stop();

    model.form = engine::render(&schema);
    model.schema = schema;
    model.wire_format = wire_format;
    model.is_saving = false;
    model.save_enabled = !model.form.is_empty();
    model.wifi.track(&model.form);
    model.wifi.merge_last(&mut model.form);

    info!(
        "rendered {} settings, {} wifi fields",
        model.form.sections.len(),
        model.wifi.tracked().len()
    );

    let start_scanning = if !engine::has_network_field(&model.form) {
        Command::done()
    } else {
        model.wifi.start()
    };

    Command::all([
        stop_scanning,
        render(),
        form::fetch_config(model),
        start_scanning,
    ])
}
