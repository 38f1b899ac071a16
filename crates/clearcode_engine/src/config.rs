use std::fs;
use std::path::Path;

use clearcode_core::{RetryPolicy, DEFAULT_SETTLE_DELAY_MS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where and how to look for the editor inside the host page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Host element that wraps the code editor pane.
    pub container_selector: String,
    /// Elements that may carry an attached editor object.
    pub instance_selector: String,
    /// Property names an editor object may be attached under.
    pub instance_properties: Vec<String>,
    /// How many ancestors above a matching element are also checked for an
    /// attached editor object.
    pub ancestor_depth: usize,
    pub text_input_selector: String,
    pub editable_selector: String,
    pub alternate_selector: String,
    pub alternate_property: String,
    /// Tried in order by the last-resort scan for a nested text input.
    pub fallback_selectors: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            container_selector: ".flexlayout__tabset_content".to_string(),
            instance_selector: r#".monaco-editor, [class*="monaco"]"#.to_string(),
            instance_properties: ["__monacoEditor", "_editorInstance", "editor", "monacoEditor", "monaco"]
                .into_iter()
                .map(String::from)
                .collect(),
            ancestor_depth: 3,
            text_input_selector: "textarea".to_string(),
            editable_selector: r#"[contenteditable="true"]"#.to_string(),
            alternate_selector: ".CodeMirror".to_string(),
            alternate_property: "CodeMirror".to_string(),
            fallback_selectors: [
                ".monaco-editor",
                ".editor",
                ".code-editor",
                r#"[class*="editor"]"#,
                r#"[class*="monaco"]"#,
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearConfig {
    pub probe: ProbeConfig,
    pub retry: RetryPolicy,
    /// Pause between page-ready and the first clearing run.
    pub settle_delay_ms: u64,
}

impl Default for ClearConfig {
    fn default() -> Self {
        Self {
            probe: ProbeConfig::default(),
            retry: RetryPolicy::default(),
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {message}")]
    Parse { path: String, message: String },
}

impl ClearConfig {
    /// Loads a RON config file; omitted fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron(&text).map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })
    }

    pub fn from_ron(text: &str) -> Result<Self, String> {
        ron::from_str(text).map_err(|err| err.to_string())
    }
}
