use clearcode_core::RunOutcome;
use ego_tree::NodeId;
use thiserror::Error;

/// Failure while reading or writing an editor's text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("editor accessor unavailable: {0}")]
    Unavailable(String),
    #[error("editor holds no text yet")]
    Empty,
    #[error("node {0:?} is not part of the page")]
    DetachedNode(NodeId),
}

/// Failure inside one probe strategy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error(transparent)]
    Page(#[from] PageError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error("editor registry failed: {0}")]
    Registry(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("invalid selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },
    #[error("node {0:?} is not a text input")]
    NotATextInput(NodeId),
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
}

/// Reported once per run when it reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunEvent {
    pub run_id: u64,
    pub outcome: RunOutcome,
    pub attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Input,
    Change,
}

/// A synthetic DOM event fired at a page element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchedEvent {
    pub node: NodeId,
    pub kind: EventKind,
    pub bubbles: bool,
}
