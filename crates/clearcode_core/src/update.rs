use crate::{AppState, Effect, LifecycleEvent, Msg, Trigger};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PageReady => {
            if state.page_ready() {
                return (state, Vec::new());
            }
            state.mark_page_ready();
            vec![Effect::ScheduleSettle {
                delay_ms: state.settle_delay_ms(),
            }]
        }
        Msg::SettleElapsed => vec![Effect::ReadSetting],
        Msg::SettingLoaded { enabled } => {
            state.set_delete_responses(enabled);
            start_run_if(&mut state, enabled, Trigger::PageLoad)
        }
        Msg::ToggleChanged { enabled } => {
            state.set_delete_responses(enabled);
            start_run_if(&mut state, enabled, Trigger::ToggleChanged)
        }
        Msg::SettingRestored { enabled } => {
            state.set_delete_responses(enabled);
            Vec::new()
        }
        Msg::ToggleClicked { enabled } => {
            state.set_delete_responses(enabled);
            vec![
                Effect::WriteSetting { enabled },
                Effect::NotifyContentScript { enabled },
            ]
        }
        Msg::Lifecycle(LifecycleEvent::Installed) => {
            state.set_delete_responses(false);
            vec![Effect::WriteSetting { enabled: false }]
        }
        Msg::Lifecycle(LifecycleEvent::Updated { .. }) | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start_run_if(state: &mut AppState, enabled: bool, trigger: Trigger) -> Vec<Effect> {
    if !enabled {
        return Vec::new();
    }
    vec![Effect::StartRun {
        run_id: state.allocate_run_id(),
        trigger,
    }]
}
