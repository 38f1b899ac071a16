#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The host page finished building its initial DOM.
    PageReady,
    /// The settle delay scheduled after `PageReady` elapsed.
    SettleElapsed,
    /// The persisted toggle was read back from settings.
    SettingLoaded { enabled: bool },
    /// The toggle UI announced a new value to the content script.
    ToggleChanged { enabled: bool },
    /// The popup opened and read back the persisted toggle. Display only.
    SettingRestored { enabled: bool },
    /// User flipped the toggle in the popup.
    ToggleClicked { enabled: bool },
    /// Extension lifecycle notification.
    Lifecycle(crate::LifecycleEvent),
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Installed,
    Updated { version: String },
}
