use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use clearcode_core::{
    is_supported_page, update, AppState, Effect, InboundMessage, MessageReply, Msg, ToggleView,
    DELETE_RESPONSES,
};
use clearcode_logging::{clear_debug, clear_info, clear_warn};

use crate::orchestrator::ClearOrchestrator;
use crate::scheduler::Scheduler;
use crate::settings::SettingsStore;

/// Per-page runtime: turns page-ready and toggle messages into clearing runs.
pub struct ContentScript {
    state: RefCell<AppState>,
    settings: Rc<dyn SettingsStore>,
    scheduler: Rc<dyn Scheduler>,
    orchestrator: ClearOrchestrator,
}

impl ContentScript {
    pub fn new(
        orchestrator: ClearOrchestrator,
        scheduler: Rc<dyn Scheduler>,
        settings: Rc<dyn SettingsStore>,
        settle_delay_ms: u64,
    ) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(AppState::with_settle_delay(settle_delay_ms)),
            settings,
            scheduler,
            orchestrator,
        })
    }

    pub fn view(&self) -> ToggleView {
        self.state.borrow().view()
    }

    /// Called once the host page has built its initial DOM.
    pub fn page_ready(self: &Rc<Self>) {
        let url = self.orchestrator.page().borrow().url().map(str::to_owned);
        if let Some(url) = url.as_deref() {
            if !is_supported_page(url) {
                clear_info!("not a supported page, staying idle: {}", url);
                return;
            }
        }
        self.dispatch(Msg::PageReady);
    }

    /// Handles a JSON message from the toggle UI. Messages this script does
    /// not understand get no reply.
    pub fn handle_message(self: &Rc<Self>, raw: &str) -> Option<MessageReply> {
        let message = match InboundMessage::from_json(raw) {
            Ok(message) => message,
            Err(err) => {
                clear_debug!("ignoring message: {}", err);
                return None;
            }
        };
        let InboundMessage::UpdateDeleteSetting { enabled } = message;
        clear_info!("toggle turned {}", if enabled { "on" } else { "off" });
        self.dispatch(message.into_msg());
        Some(MessageReply::ok())
    }

    fn dispatch(self: &Rc<Self>, msg: Msg) {
        let effects = {
            let mut state = self.state.borrow_mut();
            let (next, effects) = update(state.clone(), msg);
            *state = next;
            effects
        };
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(self: &Rc<Self>, effect: Effect) {
        match effect {
            Effect::ScheduleSettle { delay_ms } => {
                let this = Rc::clone(self);
                self.scheduler.after(
                    Duration::from_millis(delay_ms),
                    Box::new(move || this.dispatch(Msg::SettleElapsed)),
                );
            }
            Effect::ReadSetting => {
                let enabled = self
                    .settings
                    .get_setting(DELETE_RESPONSES)
                    .unwrap_or_else(|err| {
                        clear_warn!("could not read settings, assuming disabled: {}", err);
                        false
                    });
                if !enabled {
                    clear_info!("delete responses is disabled");
                }
                self.dispatch(Msg::SettingLoaded { enabled });
            }
            Effect::StartRun { run_id, trigger } => {
                clear_info!("clearing code ({:?})", trigger);
                self.orchestrator.start(run_id);
            }
            Effect::WriteSetting { .. } | Effect::NotifyContentScript { .. } => {
                clear_debug!("content script ignores {:?}", effect);
            }
        }
    }
}
