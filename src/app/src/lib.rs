//! Provisioning form core
//!
//! Renders a device's settings form from a schema, loads and saves the
//! device config and keeps wifi network choices fresh from live scans.

pub mod codec;
pub mod commands;
pub mod error;
pub mod events;
pub mod form;
pub mod http_helpers;
pub mod macros;
pub mod model;
pub mod reconciler;
pub mod types;
pub mod update;

#[cfg(target_arch = "wasm32")]
pub mod wasm;


use crux_core::Command;

// Re-export core types
pub use crate::{
    codec::WireFormat,
    commands::timer::{TimerKind, TimerOperation, TimerOutput},
    error::{CodecError, FormError, SchemaError},
    events::{Event, FormEvent, UiEvent, WifiEvent},
    http_helpers::{build_url, BASE_URL},
    model::Model,
    reconciler::WifiReconciler,
    types::*,
};
pub use crux_http::Result as HttpResult;

#[crux_macros::effect(typegen)]
pub enum Effect {
    Render(crux_core::render::RenderOperation),
    Http(crux_http::protocol::HttpRequest),
    Timer(TimerOperation),
}

pub type HttpCmd = crux_http::command::Http<Effect, Event>;
pub type TimerCmd = crate::commands::timer::Timer<Effect, Event>;

/// The Core application
#[derive(Default)]
pub struct App;

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = Model;
    type Effect = Effect;

    fn update(&self, event: Self::Event, model: &mut Self::Model) -> Command<Effect, Event> {
        update::update(event, model)
    }

    fn view(&self, model: &Self::Model) -> Self::ViewModel {
        model.clone()
    }
}
