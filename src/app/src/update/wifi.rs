use crux_core::Command;

use crate::events::{Event, WifiEvent};
use crate::model::Model;
use crate::Effect;

/// Handle wifi scan events by delegating to the reconciler
pub fn handle(event: WifiEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        WifiEvent::Start => model.wifi.start(),
        WifiEvent::Stop => model.wifi.stop(),
        WifiEvent::Rescan => model.wifi.poll(),
        WifiEvent::ScanResponse(result) => model.wifi.handle_scan(result, &mut model.form),
        WifiEvent::Timer(output) => model.wifi.handle_timer(output),
    }
}
