#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Wait `delay_ms` and then deliver `Msg::SettleElapsed`.
    ScheduleSettle { delay_ms: u64 },
    /// Read the persisted toggle and deliver `Msg::SettingLoaded`.
    ReadSetting,
    /// Persist the toggle.
    WriteSetting { enabled: bool },
    /// Tell the content script of the active page about the new toggle value.
    NotifyContentScript { enabled: bool },
    /// Start an independent clearing run.
    StartRun { run_id: u64, trigger: Trigger },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    PageLoad,
    ToggleChanged,
}
