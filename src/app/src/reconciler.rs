//! Wifi scan polling
//!
//! `WifiReconciler` owns the ids of every network combo in the form, the
//! pending poll timer and the last scan. Each completed fetch, good or bad,
//! schedules the next poll.

use crux_core::{render::render, Command};
use log::{debug, warn};

use crate::commands::timer::{TimerKind, TimerOutput};
use crate::events::{Event, WifiEvent};
use crate::http_helpers::{build_url, process_json_response};
use crate::types::{FormView, ScannedNetwork, WifiScan, Widget};
use crate::{Effect, HttpCmd, TimerCmd};

pub const SCAN_ENDPOINT: &str = "/wifiscan";
pub const POLL_INTERVAL_MS: u64 = 30_000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WifiReconciler {
    fields: Vec<String>,
    pending: Option<u64>,
    next_timer: u64,
    running: bool,
    last_scan: Option<Vec<ScannedNetwork>>,
}

fn timer_event(output: TimerOutput) -> Event {
    Event::Wifi(WifiEvent::Timer(output))
}

impl WifiReconciler {
    /// Track every network combo of a freshly rendered form
    pub fn track(&mut self, view: &FormView) {
        self.fields = view
            .fields()
            .filter(|field| matches!(field.widget, Widget::Network(_)))
            .map(|field| field.id.clone())
            .collect();
    }

    pub fn tracked(&self) -> &[String] {
        &self.fields
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending_timer(&self) -> Option<u64> {
        self.pending
    }

    pub fn last_scan(&self) -> Option<&[ScannedNetwork]> {
        self.last_scan.as_deref()
    }

    /// Start polling, fetching a scan right away
    pub fn start(&mut self) -> Command<Effect, Event> {
        self.running = true;
        self.poll()
    }

    /// Stop polling; a fetch still in flight will not reschedule
    pub fn stop(&mut self) -> Command<Effect, Event> {
        self.running = false;
        self.cancel_pending()
    }

    /// Fetch a scan now, replacing any scheduled poll
    pub fn poll(&mut self) -> Command<Effect, Event> {
        let fetch = HttpCmd::get(build_url(SCAN_ENDPOINT))
            .build()
            .then_send(|result| {
                Event::Wifi(WifiEvent::ScanResponse(process_json_response(
                    "Wifi scan",
                    result,
                )))
            });

        Command::all([self.cancel_pending(), fetch])
    }

    /// Merge a completed fetch and schedule the next poll
    pub fn handle_scan(
        &mut self,
        result: Result<WifiScan, String>,
        view: &mut FormView,
    ) -> Command<Effect, Event> {
        let merged = match result {
            Ok(scan) => {
                debug!("wifi scan found {} networks", scan.networks.len());
                self.last_scan = Some(scan.networks);
                self.merge_last(view);
                render()
            }
            Err(e) => {
                warn!("wifi scan failed: {e}");
                Command::done()
            }
        };

        if !self.running {
            return merged;
        }

        Command::all([merged, self.cancel_pending(), self.schedule()])
    }

    /// React to timer output; only the pending timer triggers a poll
    pub fn handle_timer(&mut self, output: TimerOutput) -> Command<Effect, Event> {
        match output {
            TimerOutput::Fired {
                id,
                kind: TimerKind::WifiPoll,
            } if self.pending == Some(id) => {
                self.pending = None;
                if self.running {
                    self.poll()
                } else {
                    Command::done()
                }
            }
            TimerOutput::Fired { id, .. } => {
                debug!("ignoring stale wifi timer {id}");
                Command::done()
            }
            TimerOutput::Cancelled { .. } => Command::done(),
        }
    }

    /// Merge the last scan, if any, into every tracked field
    pub fn merge_last(&self, view: &mut FormView) {
        let Some(networks) = &self.last_scan else {
            return;
        };

        for id in &self.fields {
            match view.field_mut(id).map(|field| &mut field.widget) {
                Some(Widget::Network(combo)) => combo.merge_scan(networks),
                _ => warn!("tracked wifi field '{id}' is not a network combo"),
            }
        }
    }

    fn schedule(&mut self) -> Command<Effect, Event> {
        self.next_timer += 1;
        let id = self.next_timer;
        self.pending = Some(id);

        TimerCmd::start(id, TimerKind::WifiPoll, POLL_INTERVAL_MS)
            .build()
            .then_send(timer_event)
    }

    fn cancel_pending(&mut self) -> Command<Effect, Event> {
        match self.pending.take() {
            Some(id) => TimerCmd::cancel(id, TimerKind::WifiPoll)
                .build()
                .then_send(timer_event),
            None => Command::done(),
        }
    }
}
