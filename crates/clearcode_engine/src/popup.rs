use std::cell::RefCell;
use std::rc::Rc;

use clearcode_core::{update, AppState, Effect, InboundMessage, MessageReply, Msg, ToggleView, DELETE_RESPONSES};
use clearcode_logging::{clear_debug, clear_info, clear_warn};
use thiserror::Error;

use crate::content_script::ContentScript;
use crate::settings::{SettingsError, SettingsStore};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChannelError {
    #[error("no content script is listening")]
    NoReceiver,
    #[error("content script did not acknowledge the message")]
    Unacknowledged,
}

/// Delivery of toggle messages to the active page's content script.
pub trait ContentChannel {
    fn send(&self, message: &InboundMessage) -> Result<MessageReply, ChannelError>;
}

impl ContentChannel for Rc<ContentScript> {
    fn send(&self, message: &InboundMessage) -> Result<MessageReply, ChannelError> {
        self.handle_message(&message.to_json())
            .ok_or(ChannelError::Unacknowledged)
    }
}

/// Toggle UI: shows the persisted setting and flips it.
pub struct Popup {
    state: RefCell<AppState>,
    settings: Rc<dyn SettingsStore>,
    channel: Option<Rc<dyn ContentChannel>>,
}

impl Popup {
    /// Opens the popup, restoring the persisted toggle.
    pub fn open(
        settings: Rc<dyn SettingsStore>,
        channel: Option<Rc<dyn ContentChannel>>,
    ) -> Result<Self, SettingsError> {
        let enabled = settings.get_setting(DELETE_RESPONSES)?;
        let (state, _) = update(AppState::new(), Msg::SettingRestored { enabled });
        Ok(Self {
            state: RefCell::new(state),
            settings,
            channel,
        })
    }

    pub fn view(&self) -> ToggleView {
        self.state.borrow().view()
    }

    /// Saves the new value, then tells the content script. A page without a
    /// content script is not an error.
    pub fn toggle(&self, enabled: bool) -> Result<ToggleView, SettingsError> {
        let effects = {
            let mut state = self.state.borrow_mut();
            let (next, effects) = update(state.clone(), Msg::ToggleClicked { enabled });
            *state = next;
            effects
        };
        for effect in effects {
            match effect {
                Effect::WriteSetting { enabled } => {
                    self.settings.set_setting(DELETE_RESPONSES, enabled)?;
                }
                Effect::NotifyContentScript { enabled } => self.notify(enabled),
                other => clear_debug!("popup ignores {:?}", other),
            }
        }
        Ok(self.view())
    }

    fn notify(&self, enabled: bool) {
        let message = InboundMessage::UpdateDeleteSetting { enabled };
        let result = match &self.channel {
            Some(channel) => channel.send(&message),
            None => Err(ChannelError::NoReceiver),
        };
        match result {
            Ok(reply) => clear_debug!("content script replied {:?}", reply),
            Err(ChannelError::NoReceiver) => clear_info!("content script not available"),
            Err(err) => clear_warn!("content script notification failed: {}", err),
        }
    }
}
