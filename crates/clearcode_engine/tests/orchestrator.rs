use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Once;

use clearcode_core::{RunOutcome, RunPhase};
use clearcode_engine::{
    ClearConfig, ClearOrchestrator, EditorInstance, EditorRegistry, EventKind, HtmlPage,
    ManualScheduler, MemoryEditor, MemoryModel, ProbeError, ProbeResult, ProbeStrategy,
    RecordingSink, RunEvent, RunSink, Scheduler, StaticRegistry, TextAccess, TextInputSurface,
};
use ego_tree::NodeId;
use pretty_assertions::assert_eq;

const SOLVED: &str = "class Solution:\n    def twoSum(self, nums, target):\n        \"\"\"\n        Find two indices.\n        \"\"\"\n        return [0, 1]\n";
const BOILERPLATE: &str = "class Solution:\n    def twoSum(self, nums, target):\n        \"\"\"\n        Find two indices.\n        \"\"\"";
const STALE: &str = "class Solution:\n    \"\"\"old\"\"\"\n    stale = 1";

const EDITOR_PAGE: &str = r#"<html><body>
<div class="flexlayout__tabset_content">
  <div class="editor-host">
    <div class="monaco-editor" id="monaco"><textarea class="inputarea">class Solution:
    """old"""
    stale = 1</textarea></div>
  </div>
</div>
<div id="outside"></div>
</body></html>"#;

const EMPTY_PAGE: &str = r#"<html><body><div id="app">loading</div></body></html>"#;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(clearcode_logging::initialize_for_tests);
}

struct Harness {
    page: Rc<RefCell<HtmlPage>>,
    scheduler: Rc<ManualScheduler>,
    sink: Rc<RecordingSink>,
}

impl Harness {
    fn new(html: &str) -> Self {
        init_logging();
        Self {
            page: Rc::new(RefCell::new(HtmlPage::parse(html))),
            scheduler: Rc::new(ManualScheduler::new()),
            sink: Rc::new(RecordingSink::default()),
        }
    }

    fn builder(&self, config: ClearConfig) -> clearcode_engine::Builder {
        ClearOrchestrator::builder(
            Rc::clone(&self.page),
            Rc::clone(&self.scheduler) as Rc<dyn Scheduler>,
            config,
        )
        .sink(Rc::clone(&self.sink) as Rc<dyn RunSink>)
    }

    fn orchestrator(&self) -> ClearOrchestrator {
        self.builder(ClearConfig::default()).build()
    }

    fn node(&self, selector: &str) -> NodeId {
        self.page.borrow().query_first(selector).unwrap().unwrap()
    }

    fn attach(&self, selector: &str, property: &str, editor: Rc<MemoryEditor>) {
        let node = self.node(selector);
        self.page.borrow_mut().attach(node, property, editor);
    }

    fn textarea_value(&self) -> String {
        let node = self.node("textarea");
        self.page.borrow().value(node).unwrap()
    }

    fn outcomes(&self) -> Vec<RunOutcome> {
        self.sink.events().into_iter().map(|e| e.outcome).collect()
    }
}

fn solved_page() -> String {
    EDITOR_PAGE.replace(STALE, SOLVED)
}

#[test]
fn container_appearing_on_fifth_check_still_succeeds() {
    let harness = Harness::new(EMPTY_PAGE);
    harness.orchestrator().start(1);

    for _ in 0..3 {
        assert!(harness.sink.events().is_empty());
        assert!(harness.scheduler.run_next());
    }
    harness.page.borrow_mut().replace_document(&solved_page());
    assert!(harness.scheduler.run_next());

    assert_eq!(
        harness.sink.events(),
        vec![RunEvent {
            run_id: 1,
            outcome: RunOutcome::Applied {
                strategy: "text-input",
                removed_bytes: SOLVED.len() - BOILERPLATE.len(),
            },
            attempts: 4,
        }]
    );
    assert_eq!(harness.textarea_value(), BOILERPLATE);
    assert_eq!(harness.scheduler.pending(), 0);
}

#[test]
fn container_never_appearing_exhausts_without_writing() {
    let harness = Harness::new(EMPTY_PAGE);
    harness.orchestrator().start(1);

    assert_eq!(harness.scheduler.run_until_idle(), 5);
    assert_eq!(
        harness.outcomes(),
        vec![RunOutcome::Exhausted {
            phase: RunPhase::SearchingContainer
        }]
    );
    assert_eq!(harness.scheduler.now().as_millis(), 2_500);
    assert!(harness.page.borrow().events().is_empty());
}

#[test]
fn structured_api_wins_over_stale_text_input() {
    let harness = Harness::new(EDITOR_PAGE);
    let editor = Rc::new(MemoryEditor::with_text(SOLVED));
    harness.attach("#monaco", "__monacoEditor", Rc::clone(&editor));

    harness.orchestrator().start(1);

    assert_eq!(
        harness.outcomes(),
        vec![RunOutcome::Applied {
            strategy: "editor-api",
            removed_bytes: SOLVED.len() - BOILERPLATE.len(),
        }]
    );
    assert_eq!(editor.text().as_deref(), Some(BOILERPLATE));
    assert_eq!(harness.textarea_value(), STALE);
    assert!(harness.page.borrow().events().is_empty());
}

#[test]
fn api_editor_wins_when_textarea_also_holds_solution() {
    let harness = Harness::new(&solved_page());
    let editor = Rc::new(MemoryEditor::with_text(SOLVED));
    harness.attach("#monaco", "editor", Rc::clone(&editor));

    harness.orchestrator().start(1);

    assert_eq!(
        harness.outcomes(),
        vec![RunOutcome::Applied {
            strategy: "editor-api",
            removed_bytes: SOLVED.len() - BOILERPLATE.len(),
        }]
    );
    assert_eq!(editor.text().as_deref(), Some(BOILERPLATE));
    assert_eq!(harness.textarea_value(), SOLVED);
    assert!(harness.page.borrow().events().is_empty());
}

#[test]
fn empty_editor_is_retried_until_its_text_arrives() {
    let harness = Harness::new(NESTED_PAGE);
    let editor = Rc::new(MemoryEditor::with_text(""));
    harness.attach(".monaco-editor", "editor", Rc::clone(&editor));

    harness.orchestrator().start(1);
    assert!(harness.sink.events().is_empty());
    assert_eq!(harness.scheduler.pending(), 1);

    editor.buffer().unwrap().set_value(SOLVED).unwrap();
    assert!(harness.scheduler.run_next());

    assert_eq!(
        harness.sink.events(),
        vec![RunEvent {
            run_id: 1,
            outcome: RunOutcome::Applied {
                strategy: "editor-api",
                removed_bytes: SOLVED.len() - BOILERPLATE.len(),
            },
            attempts: 1,
        }]
    );
    assert_eq!(editor.text().as_deref(), Some(BOILERPLATE));
}

#[test]
fn empty_editor_falls_through_to_text_input() {
    let harness = Harness::new(&solved_page());
    let editor = Rc::new(MemoryEditor::with_text(""));
    harness.attach("#monaco", "__monacoEditor", Rc::clone(&editor));

    harness.orchestrator().start(1);

    assert_eq!(
        harness.outcomes(),
        vec![RunOutcome::Applied {
            strategy: "text-input",
            removed_bytes: SOLVED.len() - BOILERPLATE.len(),
        }]
    );
    assert_eq!(editor.buffer().map(MemoryModel::writes), Some(0));
    assert_eq!(harness.textarea_value(), BOILERPLATE);
}

#[test]
fn nothing_to_remove_is_unchanged_and_writes_nothing() {
    let harness = Harness::new(EDITOR_PAGE);
    let editor = Rc::new(MemoryEditor::with_text(BOILERPLATE));
    harness.attach("#monaco", "editor", Rc::clone(&editor));

    harness.orchestrator().start(1);

    assert_eq!(
        harness.outcomes(),
        vec![RunOutcome::Unchanged {
            strategy: "editor-api"
        }]
    );
    assert_eq!(editor.buffer().map(MemoryModel::writes), Some(0));
    assert_eq!(harness.textarea_value(), STALE);
    assert_eq!(harness.scheduler.pending(), 0);
}

#[test]
fn api_write_keeps_nested_model_in_step() {
    let harness = Harness::new(EDITOR_PAGE);
    let model = Rc::new(MemoryModel::new(SOLVED));
    let editor = Rc::new(MemoryEditor::with_text(SOLVED).with_model(Rc::clone(&model)));
    harness.attach("#monaco", "monacoEditor", Rc::clone(&editor));

    harness.orchestrator().start(1);

    assert_eq!(editor.text().as_deref(), Some(BOILERPLATE));
    assert_eq!(model.text(), BOILERPLATE);
    assert_eq!(model.writes(), 1);
}

#[test]
fn model_is_used_when_editor_has_no_accessors() {
    let harness = Harness::new(EDITOR_PAGE);
    let model = Rc::new(MemoryModel::new(SOLVED));
    harness.attach(
        "#monaco",
        "_editorInstance",
        Rc::new(MemoryEditor::model_only(Rc::clone(&model))),
    );

    harness.orchestrator().start(1);

    assert_eq!(
        harness.outcomes(),
        vec![RunOutcome::Applied {
            strategy: "editor-model",
            removed_bytes: SOLVED.len() - BOILERPLATE.len(),
        }]
    );
    assert_eq!(model.text(), BOILERPLATE);
}

const NESTED_PAGE: &str = r#"<html><body>
<div class="flexlayout__tabset_content">
  <div id="l4"><div id="l3"><div id="l2"><div id="l1">
    <div class="monaco-editor"></div>
  </div></div></div></div>
</div>
</body></html>"#;

#[test]
fn attached_editor_found_up_to_three_ancestors() {
    let harness = Harness::new(NESTED_PAGE);
    let editor = Rc::new(MemoryEditor::with_text(SOLVED));
    harness.attach("#l3", "monaco", Rc::clone(&editor));

    harness.orchestrator().start(1);

    assert_eq!(editor.text().as_deref(), Some(BOILERPLATE));
}

#[test]
fn ancestor_depth_is_configurable() {
    let harness = Harness::new(NESTED_PAGE);
    let editor = Rc::new(MemoryEditor::with_text(SOLVED));
    harness.attach("#l4", "monaco", Rc::clone(&editor));

    let mut config = ClearConfig::default();
    config.retry.max_attempts = 0;
    harness.builder(config.clone()).build().start(1);
    assert_eq!(editor.text().as_deref(), Some(SOLVED));
    assert_eq!(
        harness.outcomes(),
        vec![RunOutcome::Exhausted {
            phase: RunPhase::ProbingSurface
        }]
    );

    config.probe.ancestor_depth = 4;
    harness.builder(config).build().start(2);
    assert_eq!(editor.text().as_deref(), Some(BOILERPLATE));
}

#[test]
fn failing_strategy_does_not_block_later_ones() {
    let harness = Harness::new(&solved_page());
    let editor = Rc::new(MemoryEditor::with_text(SOLVED));
    editor.buffer().unwrap().fail_writes(true);
    harness.attach("#monaco", "__monacoEditor", Rc::clone(&editor));

    harness.orchestrator().start(1);

    assert_eq!(
        harness.outcomes(),
        vec![RunOutcome::Applied {
            strategy: "text-input",
            removed_bytes: SOLVED.len() - BOILERPLATE.len(),
        }]
    );
    assert_eq!(editor.text().as_deref(), Some(SOLVED));
    assert_eq!(harness.textarea_value(), BOILERPLATE);
    let events: Vec<EventKind> = harness.page.borrow().events().iter().map(|e| e.kind).collect();
    assert_eq!(events, vec![EventKind::Input, EventKind::Change]);
    assert!(harness.page.borrow().events().iter().all(|e| e.bubbles));
}

#[test]
fn unreadable_editor_falls_through() {
    let harness = Harness::new(&solved_page());
    let editor = Rc::new(MemoryEditor::with_text(SOLVED));
    editor.buffer().unwrap().fail_reads(true);
    harness.attach("#monaco", "__monacoEditor", editor);

    harness.orchestrator().start(1);

    assert_eq!(harness.textarea_value(), BOILERPLATE);
}

#[test]
fn registry_prefers_editor_rendered_in_container() {
    let harness = Harness::new(EDITOR_PAGE);
    let registry = Rc::new(StaticRegistry::new());
    let outside = Rc::new(MemoryEditor::with_text(SOLVED).rendered_at(harness.node("#outside")));
    let inside = Rc::new(MemoryEditor::with_text(SOLVED).rendered_at(harness.node("#monaco")));
    registry.register(Rc::clone(&outside) as Rc<dyn EditorInstance>);
    registry.register(Rc::clone(&inside) as Rc<dyn EditorInstance>);

    harness
        .builder(ClearConfig::default())
        .registry(registry)
        .build()
        .start(1);

    assert_eq!(
        harness.outcomes(),
        vec![RunOutcome::Applied {
            strategy: "editor-registry",
            removed_bytes: SOLVED.len() - BOILERPLATE.len(),
        }]
    );
    assert_eq!(inside.text().as_deref(), Some(BOILERPLATE));
    assert_eq!(outside.text().as_deref(), Some(SOLVED));
    assert_eq!(harness.textarea_value(), STALE);
}

#[test]
fn registry_falls_back_to_first_editor() {
    let harness = Harness::new(EDITOR_PAGE);
    let registry = Rc::new(StaticRegistry::new());
    let first = Rc::new(MemoryEditor::with_text(SOLVED));
    let second = Rc::new(MemoryEditor::with_text(SOLVED));
    registry.register(Rc::clone(&first) as Rc<dyn EditorInstance>);
    registry.register(Rc::clone(&second) as Rc<dyn EditorInstance>);

    harness
        .builder(ClearConfig::default())
        .registry(registry)
        .build()
        .start(1);

    assert_eq!(first.text().as_deref(), Some(BOILERPLATE));
    assert_eq!(second.text().as_deref(), Some(SOLVED));
}

#[test]
fn registry_editor_without_accessors_uses_its_model() {
    let harness = Harness::new(EDITOR_PAGE);
    let registry = Rc::new(StaticRegistry::new());
    let model = Rc::new(MemoryModel::new(SOLVED));
    registry.register(Rc::new(MemoryEditor::model_only(Rc::clone(&model))) as Rc<dyn EditorInstance>);

    harness
        .builder(ClearConfig::default())
        .registry(registry)
        .build()
        .start(1);

    assert_eq!(
        harness.outcomes(),
        vec![RunOutcome::Applied {
            strategy: "editor-registry",
            removed_bytes: SOLVED.len() - BOILERPLATE.len(),
        }]
    );
    assert_eq!(model.text(), BOILERPLATE);
    assert_eq!(harness.textarea_value(), STALE);
}

#[test]
fn registry_editor_with_no_way_in_is_skipped() {
    let harness = Harness::new(&solved_page());
    let registry = Rc::new(StaticRegistry::new());
    registry.register(Rc::new(MemoryEditor::default()) as Rc<dyn EditorInstance>);

    harness
        .builder(ClearConfig::default())
        .registry(registry)
        .build()
        .start(1);

    assert_eq!(
        harness.outcomes(),
        vec![RunOutcome::Applied {
            strategy: "text-input",
            removed_bytes: SOLVED.len() - BOILERPLATE.len(),
        }]
    );
}

struct BrokenRegistry;

impl EditorRegistry for BrokenRegistry {
    fn editors(&self) -> Result<Vec<Rc<dyn EditorInstance>>, ProbeError> {
        Err(ProbeError::Registry("getEditors is not a function".into()))
    }
}

#[test]
fn broken_registry_is_skipped() {
    let harness = Harness::new(&solved_page());
    harness
        .builder(ClearConfig::default())
        .registry(Rc::new(BrokenRegistry))
        .build()
        .start(1);

    assert_eq!(harness.textarea_value(), BOILERPLATE);
}

#[test]
fn content_editable_is_cleared_and_notified() {
    let html = format!(
        r#"<html><body><div class="flexlayout__tabset_content"><div id="ce" contenteditable="true">{SOLVED}</div></div></body></html>"#
    );
    let harness = Harness::new(&html);
    harness.orchestrator().start(1);

    let ce = harness.node("#ce");
    assert_eq!(harness.page.borrow().text_content(ce).as_deref(), Some(BOILERPLATE));
    assert_eq!(
        harness.outcomes(),
        vec![RunOutcome::Applied {
            strategy: "content-editable",
            removed_bytes: SOLVED.len() - BOILERPLATE.len(),
        }]
    );
    let kinds: Vec<EventKind> = harness.page.borrow().events().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::Input, EventKind::Change]);
}

#[test]
fn alternate_editor_is_reached_through_its_attached_object() {
    let html = r#"<html><body><div class="flexlayout__tabset_content"><div class="CodeMirror" id="cm"></div></div></body></html>"#;
    let harness = Harness::new(html);
    let editor = Rc::new(MemoryEditor::with_text(SOLVED));
    harness.attach("#cm", "CodeMirror", Rc::clone(&editor));

    harness.orchestrator().start(1);

    assert_eq!(
        harness.outcomes(),
        vec![RunOutcome::Applied {
            strategy: "alternate-editor",
            removed_bytes: SOLVED.len() - BOILERPLATE.len(),
        }]
    );
    assert_eq!(editor.text().as_deref(), Some(BOILERPLATE));
}

#[test]
fn fallback_scan_finds_whitespace_only_input() {
    let html = r#"<html><body><div class="flexlayout__tabset_content"><div class="code-editor"><textarea>   </textarea></div></div></body></html>"#;
    let harness = Harness::new(html);
    harness.orchestrator().start(1);

    assert_eq!(
        harness.outcomes(),
        vec![RunOutcome::Unchanged {
            strategy: "editor-fallback"
        }]
    );
}

#[test]
fn empty_container_retries_probing_then_exhausts() {
    let html = r#"<html><body><div class="flexlayout__tabset_content"><textarea></textarea></div></body></html>"#;
    let harness = Harness::new(html);
    harness.orchestrator().start(1);

    assert_eq!(harness.scheduler.pending(), 1);
    assert_eq!(harness.scheduler.run_until_idle(), 5);
    assert_eq!(
        harness.sink.events(),
        vec![RunEvent {
            run_id: 1,
            outcome: RunOutcome::Exhausted {
                phase: RunPhase::ProbingSurface
            },
            attempts: 5,
        }]
    );
}

#[test]
fn editor_loading_late_is_picked_up_on_retry() {
    let html = r#"<html><body><div class="flexlayout__tabset_content"><div class="monaco-editor" id="monaco"></div></div></body></html>"#;
    let harness = Harness::new(html);
    harness.orchestrator().start(1);
    assert!(harness.sink.events().is_empty());

    let editor = Rc::new(MemoryEditor::with_text(SOLVED));
    harness.attach("#monaco", "editor", Rc::clone(&editor));
    assert!(harness.scheduler.run_next());

    assert_eq!(editor.text().as_deref(), Some(BOILERPLATE));
    assert_eq!(harness.sink.events()[0].attempts, 1);
}

#[test]
fn overlapping_runs_write_once() {
    let harness = Harness::new(EDITOR_PAGE);
    let editor = Rc::new(MemoryEditor::with_text(SOLVED));
    harness.attach("#monaco", "editor", Rc::clone(&editor));

    let orchestrator = harness.orchestrator();
    orchestrator.start(1);
    orchestrator.start(2);

    assert_eq!(
        harness.outcomes(),
        vec![
            RunOutcome::Applied {
                strategy: "editor-api",
                removed_bytes: SOLVED.len() - BOILERPLATE.len(),
            },
            RunOutcome::Unchanged {
                strategy: "editor-api"
            },
        ]
    );
    assert_eq!(editor.buffer().map(MemoryModel::writes), Some(1));
}

#[test]
fn invalid_container_selector_exhausts() {
    let harness = Harness::new(EDITOR_PAGE);
    let mut config = ClearConfig::default();
    config.probe.container_selector = "[[".to_string();
    harness.builder(config).build().start(1);
    harness.scheduler.run_until_idle();

    assert_eq!(
        harness.outcomes(),
        vec![RunOutcome::Exhausted {
            phase: RunPhase::SearchingContainer
        }]
    );
}

struct Exploding {
    calls: Rc<Cell<usize>>,
}

impl ProbeStrategy for Exploding {
    fn name(&self) -> &'static str {
        "exploding"
    }

    fn probe(&self, _page: &HtmlPage, _container: NodeId) -> Result<ProbeResult, ProbeError> {
        self.calls.set(self.calls.get() + 1);
        Err(ProbeError::Registry("boom".into()))
    }
}

struct FirstTextarea {
    calls: Rc<Cell<usize>>,
}

impl ProbeStrategy for FirstTextarea {
    fn name(&self) -> &'static str {
        "first-textarea"
    }

    fn probe(&self, page: &HtmlPage, container: NodeId) -> Result<ProbeResult, ProbeError> {
        self.calls.set(self.calls.get() + 1);
        let found = page.query_within(container, "textarea")?;
        Ok(match found.first() {
            Some(node) => ProbeResult::Found(Box::new(TextInputSurface::new(*node))),
            None => ProbeResult::NotFound,
        })
    }
}

#[test]
fn custom_strategies_run_in_order_and_short_circuit() {
    let harness = Harness::new(&solved_page());
    let exploding = Rc::new(Cell::new(0));
    let first = Rc::new(Cell::new(0));
    let never = Rc::new(Cell::new(0));

    harness
        .builder(ClearConfig::default())
        .strategies(vec![
            Box::new(Exploding {
                calls: Rc::clone(&exploding),
            }),
            Box::new(FirstTextarea {
                calls: Rc::clone(&first),
            }),
            Box::new(Exploding {
                calls: Rc::clone(&never),
            }),
        ])
        .build()
        .start(1);

    assert_eq!((exploding.get(), first.get(), never.get()), (1, 1, 0));
    assert_eq!(
        harness.outcomes(),
        vec![RunOutcome::Applied {
            strategy: "first-textarea",
            removed_bytes: SOLVED.len() - BOILERPLATE.len(),
        }]
    );
}
