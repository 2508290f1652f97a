use serde::{Deserialize, Serialize};

use crate::codec::WireFormat;
use crate::reconciler::WifiReconciler;
use crate::types::*;

/// Trait for types that can handle error messages
///
/// This allows HTTP helper functions to work with Model without directly depending on it.
pub trait ModelErrorHandler {
    fn set_error(&mut self, error: String);
}

/// Application Model - the complete state
/// Also serves as the ViewModel when serialized (bookkeeping fields are excluded)
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Model {
    // Form state
    pub form: FormView,
    pub wire_format: WireFormat,

    // UI state
    pub is_loading: bool,
    pub is_saving: bool,
    pub save_enabled: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,

    /// Parsed settings schema, fixed after `Initialize`
    #[serde(skip)]
    pub schema: Schema,

    // Save bookkeeping: responses and timeouts of older saves are ignored
    #[serde(skip)]
    pub save_generation: u64,

    #[serde(skip)]
    pub wifi: WifiReconciler,
}

impl Model {
    /// Start a loading operation (sets is_loading=true, clears error)
    pub fn start_loading(&mut self) {
        self.is_loading = true;
        self.error_message = None;
    }

    /// Stop loading and clear error
    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.error_message = None;
    }

    /// Disable the save control and clear old messages
    pub fn start_saving(&mut self) -> u64 {
        self.save_generation += 1;
        self.is_saving = true;
        self.save_enabled = false;
        self.error_message = None;
        self.success_message = None;
        self.save_generation
    }

    /// Re-enable the save control
    pub fn finish_saving(&mut self) {
        self.is_saving = false;
        self.save_enabled = !self.form.is_empty();
    }

    /// Whether `generation` names the save still in flight
    pub fn is_current_save(&self, generation: u64) -> bool {
        self.is_saving && self.save_generation == generation
    }

    /// Set an error message and stop loading
    pub fn set_error(&mut self, error: String) {
        self.is_loading = false;
        self.error_message = Some(error);
    }

    /// Set an error message, stop loading, and return a render command
    pub fn set_error_and_render(
        &mut self,
        error: String,
    ) -> crux_core::Command<crate::Effect, crate::events::Event> {
        self.set_error(error);
        crux_core::render::render()
    }
}

impl ModelErrorHandler for Model {
    fn set_error(&mut self, error: String) {
        Model::set_error(self, error)
    }
}
