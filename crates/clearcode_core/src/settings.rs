use serde::{Deserialize, Serialize};

/// Storage key of the delete-responses toggle.
pub const DELETE_RESPONSES: &str = "deleteResponses";

/// Persisted, process-wide settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "deleteResponses")]
    pub delete_responses: bool,
}

impl Settings {
    /// Looks a boolean setting up by its storage key.
    pub fn get(&self, key: &str) -> Option<bool> {
        match key {
            DELETE_RESPONSES => Some(self.delete_responses),
            _ => None,
        }
    }

    /// Returns `false` if `key` is not a known setting.
    pub fn set(&mut self, key: &str, value: bool) -> bool {
        match key {
            DELETE_RESPONSES => {
                self.delete_responses = value;
                true
            }
            _ => false,
        }
    }
}
