pub const STATUS_ON: &str = "On";
pub const STATUS_OFF: &str = "Off";
pub const DESCRIPTION_ON: &str =
    "Your code will be automatically cleared when you switch to a new problem.";
pub const DESCRIPTION_OFF: &str =
    "When enabled, your code will be automatically cleared when you switch to a new problem.";

/// What the toggle UI shows for the current setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleView {
    pub enabled: bool,
    pub status_text: &'static str,
    pub description: &'static str,
    pub runs_started: u64,
}

impl ToggleView {
    pub fn new(enabled: bool, runs_started: u64) -> Self {
        let (status_text, description) = if enabled {
            (STATUS_ON, DESCRIPTION_ON)
        } else {
            (STATUS_OFF, DESCRIPTION_OFF)
        };
        Self {
            enabled,
            status_text,
            description,
            runs_started,
        }
    }
}
