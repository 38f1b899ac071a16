use serde::{Deserialize, Serialize};

use crate::Msg;

/// Messages the content script accepts from the toggle UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum InboundMessage {
    UpdateDeleteSetting { enabled: bool },
}

impl InboundMessage {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> String {
        // Serializing a tagged enum of plain fields cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn into_msg(self) -> Msg {
        match self {
            InboundMessage::UpdateDeleteSetting { enabled } => Msg::ToggleChanged { enabled },
        }
    }
}

/// Acknowledgement sent back to the sender of an [`InboundMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReply {
    pub success: bool,
}

impl MessageReply {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
