//! Clearcode core: truncation engine, run state machine and trigger logic.
//!
//! Nothing in this crate performs IO; the engine crate executes the effects.
mod effect;
mod message;
mod msg;
mod page_match;
mod retry;
mod run;
mod settings;
mod state;
mod truncate;
mod update;
mod view_model;

pub use effect::{Effect, Trigger};
pub use message::{InboundMessage, MessageReply};
pub use msg::{LifecycleEvent, Msg};
pub use page_match::is_supported_page;
pub use retry::{RetryPolicy, RetryState, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS};
pub use run::{advance, Observation, RunOutcome, RunPhase, RunState, Step};
pub use settings::{Settings, DELETE_RESPONSES};
pub use state::{AppState, DEFAULT_SETTLE_DELAY_MS};
pub use truncate::{is_blank, truncate, truncate_opt, truncate_report, Truncation, DELIMITER};
pub use update::update;
pub use view_model::{
    ToggleView, DESCRIPTION_OFF, DESCRIPTION_ON, STATUS_OFF, STATUS_ON,
};
