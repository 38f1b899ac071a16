use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use clearcode_core::{truncate_report, InboundMessage, LifecycleEvent, RunOutcome, ToggleView};
use clearcode_engine::{
    fingerprint, handle_lifecycle, write_atomically, ClearConfig, ClearOrchestrator, ContentScript,
    HtmlPage, Popup, RecordingSink, RonSettingsStore, RunEvent, RunSink, Scheduler, SettingsStore,
};
use clearcode_logging::{clear_info, clear_warn};

use super::timers::LocalTimers;
use crate::cli::Command;

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Truncate { file, in_place } => truncate_file(&file, in_place),
        Command::Clear {
            snapshot,
            url,
            force,
            config,
            output,
            settings_dir,
        } => {
            let config = match config {
                Some(path) => ClearConfig::load(&path)?,
                None => ClearConfig::default(),
            };
            let cleared = clear_snapshot(&snapshot, url, force, config, &settings_dir)?;
            report_clear(&cleared, output.as_deref())
        }
        Command::Toggle {
            state,
            settings_dir,
        } => {
            let popup = open_popup(&settings_dir)?;
            let view = popup.toggle(state.enabled())?;
            print_view(&view);
            Ok(())
        }
        Command::Status { settings_dir } => {
            print_view(&open_popup(&settings_dir)?.view());
            Ok(())
        }
        Command::Install {
            update,
            settings_dir,
        } => {
            let store = RonSettingsStore::in_dir(&settings_dir);
            let event = match update {
                Some(version) => LifecycleEvent::Updated { version },
                None => LifecycleEvent::Installed,
            };
            handle_lifecycle(&store, event)?;
            Ok(())
        }
    }
}

fn truncate_file(path: &Path, in_place: bool) -> anyhow::Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let report = truncate_report(&text);
    if !report.changed() {
        clear_info!("nothing to remove from {}", path.display());
    }
    if in_place {
        if report.changed() {
            write_atomically(path, report.retained)?;
            clear_info!(
                "removed {} bytes from {} ({})",
                report.removed_bytes,
                path.display(),
                fingerprint(report.retained)
            );
        }
    } else {
        println!("{}", report.retained);
    }
    Ok(())
}

/// What one `clear` invocation did to the snapshot.
#[derive(Debug)]
struct ClearedSnapshot {
    events: Vec<RunEvent>,
    /// Editor text after clearing, one entry per element written.
    texts: Vec<String>,
}

fn clear_snapshot(
    snapshot: &Path,
    url: Option<String>,
    force: bool,
    config: ClearConfig,
    settings_dir: &Path,
) -> anyhow::Result<ClearedSnapshot> {
    let bytes = fs::read(snapshot).with_context(|| format!("reading {}", snapshot.display()))?;
    let mut page = HtmlPage::from_snapshot(&bytes, None)?;
    if let Some(url) = url {
        page = page.with_url(url);
    }
    let page = Rc::new(RefCell::new(page));
    let settings: Rc<dyn SettingsStore> = Rc::new(RonSettingsStore::in_dir(settings_dir));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let local = tokio::task::LocalSet::new();
    let sink = Rc::new(RecordingSink::default());
    let run_sink = Rc::clone(&sink) as Rc<dyn RunSink>;
    let live_page = Rc::clone(&page);

    local.block_on(&runtime, async move {
        let timers = Rc::new(LocalTimers::new());
        let settle_delay_ms = config.settle_delay_ms;
        let orchestrator = ClearOrchestrator::builder(
            live_page,
            Rc::clone(&timers) as Rc<dyn Scheduler>,
            config,
        )
        .sink(run_sink)
        .build();
        let script = ContentScript::new(
            orchestrator,
            Rc::clone(&timers) as Rc<dyn Scheduler>,
            settings,
            settle_delay_ms,
        );

        if force {
            let message = InboundMessage::UpdateDeleteSetting { enabled: true };
            script.handle_message(&message.to_json());
        } else {
            script.page_ready();
        }
        timers.idle().await;
    });

    let texts = page.borrow().edits();
    Ok(ClearedSnapshot {
        events: sink.events(),
        texts,
    })
}

fn report_clear(cleared: &ClearedSnapshot, output: Option<&Path>) -> anyhow::Result<()> {
    if cleared.events.is_empty() {
        clear_warn!("no clearing run took place; is the toggle on?");
    }
    for event in &cleared.events {
        println!("run {}: {}", event.run_id, describe(&event.outcome));
    }
    let Some(text) = cleared.texts.last() else {
        return Ok(());
    };
    match output {
        Some(path) => {
            write_atomically(path, text)?;
            clear_info!("wrote cleared editor text to {} ({})", path.display(), fingerprint(text));
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn describe(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::Applied {
            strategy,
            removed_bytes,
        } => format!("cleared via {strategy}, removed {removed_bytes} bytes"),
        RunOutcome::Unchanged { strategy } => format!("nothing to remove ({strategy})"),
        RunOutcome::Exhausted { phase } => format!("gave up during {phase}"),
    }
}

fn open_popup(settings_dir: &Path) -> anyhow::Result<Popup> {
    let store: Rc<dyn SettingsStore> = Rc::new(RonSettingsStore::in_dir(settings_dir));
    Ok(Popup::open(store, None)?)
}

fn print_view(view: &ToggleView) {
    println!("{}: {}", view.status_text, view.description);
}
