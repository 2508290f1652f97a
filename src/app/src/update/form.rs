use crux_core::{render::render, Command};
use log::{debug, error, warn};

use crate::commands::timer::{TimerKind, TimerOutput};
use crate::events::{Event, FormEvent};
use crate::form as engine;
use crate::http_helpers::{
    build_url, handle_request_error, process_payload_response, process_save_response,
};
use crate::model::Model;
use crate::{apply_edit, handle_response, Effect, HttpCmd, TimerCmd};

pub const CONFIG_ENDPOINT: &str = "/config";
pub const SAVE_TIMEOUT_MS: u64 = 10_000;

/// Handle form events: edits, config fetch and save
pub fn handle(event: FormEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        FormEvent::Reload => fetch_config(model),

        FormEvent::InputChanged { id, value } => {
            apply_edit!(model, engine::set_input(&mut model.form, &id, value))
        }
        FormEvent::CheckboxToggled { id, checked } => {
            apply_edit!(model, engine::set_checked(&mut model.form, &id, checked))
        }
        FormEvent::ChoiceSelected { id, index } => {
            apply_edit!(model, engine::select_choice(&mut model.form, &id, index))
        }
        FormEvent::NetworkTextChanged { id, text } => {
            apply_edit!(model, engine::set_network_text(&mut model.form, &id, text))
        }
        FormEvent::NetworkOptionPicked { id, index } => {
            apply_edit!(model, engine::pick_network(&mut model.form, &id, index))
        }

        FormEvent::ConfigResponse(result) => handle_response!(model, result, {
            on_success: |m, payload| {
                if let Err(e) = engine::load(&m.schema, &mut m.form, &payload) {
                    error!("failed to load config into form: {e}");
                    m.set_error(e.to_string());
                }
            },
        }),

        FormEvent::Save => save(model),

        FormEvent::SaveResponse { generation, result } => {
            if !model.is_current_save(generation) {
                debug!("ignoring late response of save {generation}");
                return Command::done();
            }

            model.finish_saving();
            match result {
                Ok(message) => model.success_message = Some(message),
                Err(e) => {
                    warn!("save failed: {e}");
                    model.set_error(e);
                }
            }

            Command::all([
                TimerCmd::cancel(generation, TimerKind::SaveTimeout)
                    .build()
                    .then_send(|output| Event::Form(FormEvent::SaveTimeout(output))),
                render(),
            ])
        }

        FormEvent::SaveTimeout(TimerOutput::Fired {
            id,
            kind: TimerKind::SaveTimeout,
        }) if model.is_current_save(id) => {
            warn!("save {id} timed out");
            model.finish_saving();
            model.set_error_and_render("Save timed out".to_string())
        }
        FormEvent::SaveTimeout(_) => Command::done(),
    }
}

/// Fetch the device config; the response is loaded into the form
pub fn fetch_config(model: &mut Model) -> Command<Effect, Event> {
    model.start_loading();

    Command::all([
        render(),
        HttpCmd::get(build_url(CONFIG_ENDPOINT))
            .header("Accept", model.wire_format.content_type())
            .build()
            .then_send(|result| {
                Event::Form(FormEvent::ConfigResponse(process_payload_response(
                    "Load config",
                    result,
                )))
            }),
    ])
}

/// Read the form, POST it and arm the save timeout
fn save(model: &mut Model) -> Command<Effect, Event> {
    if !model.save_enabled {
        debug!("save control is disabled");
        return Command::done();
    }

    let payload = match engine::save(&model.schema, &model.form) {
        Ok(payload) => payload,
        Err(e) => {
            error!("failed to read form: {e}");
            return model.set_error_and_render(e.to_string());
        }
    };

    let format = model.wire_format;
    let body = match format.encode(&payload) {
        Ok(body) => body,
        Err(e) => return handle_request_error(model, "save", e),
    };

    let generation = model.start_saving();
    debug!("saving config as {}", format.content_type());

    Command::all([
        render(),
        HttpCmd::post(build_url(CONFIG_ENDPOINT))
            .header("Content-Type", format.content_type())
            .body_bytes(body)
            .build()
            .then_send(move |result| {
                Event::Form(FormEvent::SaveResponse {
                    generation,
                    result: process_save_response("Save", result),
                })
            }),
        TimerCmd::start(generation, TimerKind::SaveTimeout, SAVE_TIMEOUT_MS)
            .build()
            .then_send(|output| Event::Form(FormEvent::SaveTimeout(output))),
    ])
}
