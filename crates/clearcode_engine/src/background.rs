use clearcode_core::{update, AppState, Effect, LifecycleEvent, Msg, DELETE_RESPONSES};
use clearcode_logging::clear_info;

use crate::settings::{SettingsError, SettingsStore};

/// Handles install and update notifications for the extension.
pub fn handle_lifecycle(settings: &dyn SettingsStore, event: LifecycleEvent) -> Result<(), SettingsError> {
    if let LifecycleEvent::Updated { version } = &event {
        clear_info!("updated to version {}", version);
    }
    let (_, effects) = update(AppState::new(), Msg::Lifecycle(event));
    for effect in effects {
        if let Effect::WriteSetting { enabled } = effect {
            settings.set_setting(DELETE_RESPONSES, enabled)?;
            clear_info!("default toggle state set to {}", enabled);
        }
    }
    Ok(())
}
