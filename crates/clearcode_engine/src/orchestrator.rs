//! Finds the live editor in the page and strips user code from it.
//!
//! Each call to [`ClearOrchestrator::start`] begins an independent run that
//! walks the state machine in `clearcode_core::run`: search for the host
//! container, probe for an editor surface, apply the truncation. Whenever a
//! step comes up empty the run reschedules itself on the [`Scheduler`]
//! until its retry budget is spent. Runs never block and never surface an
//! error to the caller; failures are logged and the affected strategy is
//! skipped.

use std::cell::RefCell;
use std::rc::Rc;

use clearcode_core::{advance, truncate_report, Observation, RunPhase, RunState, Step};
use clearcode_logging::{clear_debug, clear_info, clear_warn, set_current_run};
use ego_tree::NodeId;

use crate::config::ClearConfig;
use crate::digest::fingerprint;
use crate::editor::EditorRegistry;
use crate::page::HtmlPage;
use crate::probe::{default_strategies, ProbeResult, ProbeStrategy};
use crate::scheduler::Scheduler;
use crate::surface::EditorSurface;
use crate::types::{RunEvent, SurfaceError};

/// Receives the terminal event of every run.
pub trait RunSink {
    fn emit(&self, event: RunEvent);
}

/// Keeps every event it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<RunEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<RunEvent> {
        self.events.borrow().clone()
    }
}

impl RunSink for RecordingSink {
    fn emit(&self, event: RunEvent) {
        self.events.borrow_mut().push(event);
    }
}

struct Shared {
    page: Rc<RefCell<HtmlPage>>,
    scheduler: Rc<dyn Scheduler>,
    config: ClearConfig,
    strategies: Vec<Box<dyn ProbeStrategy>>,
    sink: Option<Rc<dyn RunSink>>,
}

#[derive(Clone)]
pub struct ClearOrchestrator {
    shared: Rc<Shared>,
}

impl ClearOrchestrator {
    pub fn new(page: Rc<RefCell<HtmlPage>>, scheduler: Rc<dyn Scheduler>, config: ClearConfig) -> Self {
        Builder::new(page, scheduler, config).build()
    }

    pub fn builder(
        page: Rc<RefCell<HtmlPage>>,
        scheduler: Rc<dyn Scheduler>,
        config: ClearConfig,
    ) -> Builder {
        Builder::new(page, scheduler, config)
    }

    pub fn page(&self) -> &Rc<RefCell<HtmlPage>> {
        &self.shared.page
    }

    /// Begins a new run. The first step executes immediately; later steps
    /// are scheduled.
    pub fn start(&self, run_id: u64) {
        clear_debug!("starting run {}", run_id);
        execute(Run {
            id: run_id,
            shared: Rc::clone(&self.shared),
            state: RunState::new(self.shared.config.retry),
        });
    }
}

pub struct Builder {
    page: Rc<RefCell<HtmlPage>>,
    scheduler: Rc<dyn Scheduler>,
    config: ClearConfig,
    registry: Option<Rc<dyn EditorRegistry>>,
    strategies: Option<Vec<Box<dyn ProbeStrategy>>>,
    sink: Option<Rc<dyn RunSink>>,
}

impl Builder {
    fn new(page: Rc<RefCell<HtmlPage>>, scheduler: Rc<dyn Scheduler>, config: ClearConfig) -> Self {
        Self {
            page,
            scheduler,
            config,
            registry: None,
            strategies: None,
            sink: None,
        }
    }

    pub fn registry(mut self, registry: Rc<dyn EditorRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replaces the default strategy list.
    pub fn strategies(mut self, strategies: Vec<Box<dyn ProbeStrategy>>) -> Self {
        self.strategies = Some(strategies);
        self
    }

    pub fn sink(mut self, sink: Rc<dyn RunSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> ClearOrchestrator {
        let strategies = self
            .strategies
            .unwrap_or_else(|| default_strategies(&self.config.probe, self.registry));
        ClearOrchestrator {
            shared: Rc::new(Shared {
                page: self.page,
                scheduler: self.scheduler,
                config: self.config,
                strategies,
                sink: self.sink,
            }),
        }
    }
}

struct Run {
    id: u64,
    shared: Rc<Shared>,
    state: RunState,
}

fn execute(mut run: Run) {
    set_current_run(run.id);
    loop {
        let observation = match run.state.phase() {
            RunPhase::SearchingContainer => run.shared.search_container(),
            RunPhase::ProbingSurface => run.shared.probe_surfaces(),
        };
        let (state, step) = advance(run.state, observation);
        run.state = state;
        match step {
            Step::Continue(phase) => {
                clear_debug!("continuing with {}", phase);
            }
            Step::Retry {
                phase,
                delay,
                attempt,
            } => {
                clear_info!(
                    "{} found nothing, retrying ({}/{})",
                    phase,
                    attempt,
                    run.state.policy().max_attempts
                );
                let scheduler = Rc::clone(&run.shared.scheduler);
                scheduler.after(delay, Box::new(move || execute(run)));
                break;
            }
            Step::Finished(outcome) => {
                clear_info!("run finished: {:?}", outcome);
                if let Some(sink) = &run.shared.sink {
                    sink.emit(RunEvent {
                        run_id: run.id,
                        outcome,
                        attempts: run.state.attempt(),
                    });
                }
                break;
            }
        }
    }
    set_current_run(0);
}

enum Applied {
    Written { removed_bytes: usize },
    Unchanged,
}

impl Shared {
    fn container(&self, page: &HtmlPage) -> Option<NodeId> {
        match page.query_first(&self.config.probe.container_selector) {
            Ok(found) => found,
            Err(err) => {
                clear_warn!("container lookup failed: {}", err);
                None
            }
        }
    }

    fn search_container(&self) -> Observation {
        match self.container(&self.page.borrow()) {
            Some(_) => Observation::ContainerFound,
            None => Observation::ContainerMissing,
        }
    }

    fn probe_surfaces(&self) -> Observation {
        let mut page = self.page.borrow_mut();
        // The page may have re-rendered since the container was seen.
        let Some(container) = self.container(&page) else {
            return Observation::NoSurface;
        };

        for strategy in &self.strategies {
            let surface = match strategy.probe(&page, container) {
                Ok(ProbeResult::Found(surface)) => surface,
                Ok(ProbeResult::NotFound) => continue,
                Err(err) => {
                    clear_warn!("strategy {} failed: {}", strategy.name(), err);
                    continue;
                }
            };
            match apply(surface.as_ref(), &mut page) {
                Ok(Applied::Written { removed_bytes }) => {
                    return Observation::Applied {
                        strategy: strategy.name(),
                        removed_bytes,
                    };
                }
                Ok(Applied::Unchanged) => {
                    return Observation::Unchanged {
                        strategy: strategy.name(),
                    };
                }
                Err(err) => {
                    clear_warn!("strategy {} could not apply: {}", strategy.name(), err);
                }
            }
        }
        Observation::NoSurface
    }
}

fn apply(surface: &dyn EditorSurface, page: &mut HtmlPage) -> Result<Applied, SurfaceError> {
    let current = surface.read(page)?;
    // Editors mount before the page fills in the template.
    if current.is_empty() {
        return Err(SurfaceError::Empty);
    }
    let report = truncate_report(&current);
    if !report.changed() {
        clear_debug!("nothing to remove from {}", fingerprint(&current));
        return Ok(Applied::Unchanged);
    }
    surface.write(page, report.retained)?;
    surface.notify_changed(page);
    clear_info!(
        "removed {} bytes ({} -> {})",
        report.removed_bytes,
        fingerprint(&current),
        fingerprint(report.retained)
    );
    Ok(Applied::Written {
        removed_bytes: report.removed_bytes,
    })
}
