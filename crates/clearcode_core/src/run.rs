//! Pure transition logic of one clearing run.
//!
//! The engine performs the observations (querying the page, probing
//! surfaces, writing text) and feeds them to [`advance`], which decides
//! whether to continue, retry after a delay, or stop.

use std::fmt;
use std::time::Duration;

use crate::{RetryPolicy, RetryState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    SearchingContainer,
    ProbingSurface,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunPhase::SearchingContainer => write!(f, "container search"),
            RunPhase::ProbingSurface => write!(f, "surface probe"),
        }
    }
}

/// Terminal state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Text was shortened and written back through `strategy`.
    Applied {
        strategy: &'static str,
        removed_bytes: usize,
    },
    /// A surface was found but held nothing to remove.
    Unchanged { strategy: &'static str },
    /// Retries ran out while in `phase`.
    Exhausted { phase: RunPhase },
}

/// What the engine saw while executing the current phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    ContainerMissing,
    ContainerFound,
    /// Every strategy came back empty or failed.
    NoSurface,
    Applied {
        strategy: &'static str,
        removed_bytes: usize,
    },
    Unchanged { strategy: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Proceed with `phase` right away.
    Continue(RunPhase),
    /// Re-enter `phase` once `delay` has elapsed.
    Retry {
        phase: RunPhase,
        delay: Duration,
        attempt: u32,
    },
    Finished(RunOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    phase: RunPhase,
    retry: RetryState,
    policy: RetryPolicy,
}

impl RunState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            phase: RunPhase::SearchingContainer,
            retry: RetryState::new(),
            policy,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn attempt(&self) -> u32 {
        self.retry.attempt()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

/// Applies one observation to the run and returns the next step.
pub fn advance(mut state: RunState, observation: Observation) -> (RunState, Step) {
    let step = match observation {
        Observation::ContainerFound => {
            state.phase = RunPhase::ProbingSurface;
            Step::Continue(RunPhase::ProbingSurface)
        }
        Observation::ContainerMissing => {
            state.phase = RunPhase::SearchingContainer;
            retry_or_exhaust(&mut state)
        }
        Observation::NoSurface => {
            state.phase = RunPhase::ProbingSurface;
            retry_or_exhaust(&mut state)
        }
        Observation::Applied {
            strategy,
            removed_bytes,
        } => Step::Finished(RunOutcome::Applied {
            strategy,
            removed_bytes,
        }),
        Observation::Unchanged { strategy } => Step::Finished(RunOutcome::Unchanged { strategy }),
    };

    (state, step)
}

fn retry_or_exhaust(state: &mut RunState) -> Step {
    match state.retry.next_retry(&state.policy) {
        Some(delay) => Step::Retry {
            phase: state.phase,
            delay,
            attempt: state.retry.attempt(),
        },
        None => Step::Finished(RunOutcome::Exhausted { phase: state.phase }),
    }
}
