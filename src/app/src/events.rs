use serde::{Deserialize, Serialize};

use crate::codec::WireFormat;
use crate::commands::timer::TimerOutput;
use crate::types::*;

/// Form domain events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// Fetch the device config again and load it into the form
    Reload,
    InputChanged {
        id: String,
        value: String,
    },
    CheckboxToggled {
        id: String,
        checked: bool,
    },
    ChoiceSelected {
        id: String,
        index: usize,
    },
    NetworkTextChanged {
        id: String,
        text: String,
    },
    NetworkOptionPicked {
        id: String,
        index: usize,
    },
    Save,

    // HTTP responses (internal events, skipped from serialization)
    #[serde(skip)]
    ConfigResponse(Result<Payload, String>),
    #[serde(skip)]
    SaveResponse {
        generation: u64,
        result: Result<String, String>,
    },

    // Timer output (internal events)
    #[serde(skip)]
    SaveTimeout(TimerOutput),
}

/// Wifi scan domain events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum WifiEvent {
    Start,
    Stop,
    /// Fetch a scan now instead of waiting for the next poll
    Rescan,

    #[serde(skip)]
    ScanResponse(Result<WifiScan, String>),
    #[serde(skip)]
    Timer(TimerOutput),
}

/// UI domain events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ClearError,
    ClearSuccess,
}

/// Events that can happen in the app
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Event {
    /// Sent once by the shell with the JSON settings schema
    Initialize {
        settings: String,
        wire_format: WireFormat,
    },
    Form(FormEvent),
    Wifi(WifiEvent),
    Ui(UiEvent),
}
