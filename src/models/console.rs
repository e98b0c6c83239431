//! Render snapshot of the console state.

use serde::{Deserialize, Serialize};

use super::{Assistant, AssistantForm};

/// Everything the presentation layer needs to draw the console.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleView {
    pub assistants: Vec<Assistant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_id: Option<String>,
    pub create_form: AssistantForm,
    /// Present only while a record is selected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_form: Option<AssistantForm>,
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Validation prompt from the last rejected create or update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl ConsoleView {
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_id.as_deref() == Some(id)
    }
}
