//! Clearcode engine: page model, editor probing and effect execution.
mod background;
mod config;
mod content_script;
mod decode;
mod digest;
mod editor;
mod orchestrator;
mod page;
mod persist;
mod popup;
mod probe;
mod scheduler;
mod settings;
mod surface;
mod types;

pub use background::handle_lifecycle;
pub use config::{ClearConfig, ConfigError, ProbeConfig};
pub use content_script::ContentScript;
pub use decode::{decode_snapshot, DecodeError, DecodedSnapshot};
pub use digest::fingerprint;
pub use editor::{EditorInstance, EditorRegistry, MemoryEditor, MemoryModel, StaticRegistry, TextAccess};
pub use orchestrator::{Builder, ClearOrchestrator, RecordingSink, RunSink};
pub use page::HtmlPage;
pub use persist::{write_atomically, PersistError};
pub use popup::{ChannelError, ContentChannel, Popup};
pub use probe::{default_strategies, ProbeResult, ProbeStrategy};
pub use scheduler::{ManualScheduler, Scheduler};
pub use settings::{MemorySettingsStore, RonSettingsStore, SettingsError, SettingsStore, SETTINGS_FILENAME};
pub use surface::{EditableSurface, EditorSurface, InstanceSurface, ModelSurface, TextInputSurface};
pub use types::{DispatchedEvent, EventKind, PageError, ProbeError, RunEvent, SurfaceError};
