//! Editor objects a page can expose, described by what they can do.
//!
//! Real editors differ in shape: some offer a get/set pair directly, some
//! only through a nested document model, some are reachable only through a
//! page-level registry. The traits below name those capabilities so probe
//! strategies can ask for them without knowing the concrete editor.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ego_tree::NodeId;

use crate::types::{ProbeError, SurfaceError};

/// A get/set pair over one text buffer.
pub trait TextAccess {
    fn get_value(&self) -> Result<String, SurfaceError>;
    fn set_value(&self, value: &str) -> Result<(), SurfaceError>;
}

pub trait EditorInstance {
    /// Top-level get/set pair, if the editor exposes one.
    fn accessors(&self) -> Option<&dyn TextAccess>;
    /// Underlying document model, if reachable.
    fn model(&self) -> Option<Rc<dyn TextAccess>>;
    /// Root element the editor rendered itself into.
    fn container_node(&self) -> Option<NodeId> {
        None
    }
}

/// Page-level collection of live editors.
pub trait EditorRegistry {
    fn editors(&self) -> Result<Vec<Rc<dyn EditorInstance>>, ProbeError>;
}

/// In-memory text buffer with switchable failures.
#[derive(Debug, Default)]
pub struct MemoryModel {
    text: RefCell<String>,
    writes: Cell<usize>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl MemoryModel {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: RefCell::new(text.into()),
            ..Self::default()
        }
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Number of successful `set_value` calls.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl TextAccess for MemoryModel {
    fn get_value(&self) -> Result<String, SurfaceError> {
        if self.fail_reads.get() {
            return Err(SurfaceError::Unavailable("getValue threw".into()));
        }
        Ok(self.text())
    }

    fn set_value(&self, value: &str) -> Result<(), SurfaceError> {
        if self.fail_writes.get() {
            return Err(SurfaceError::Unavailable("setValue threw".into()));
        }
        *self.text.borrow_mut() = value.to_string();
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// In-memory editor, optionally with its own get/set pair, a nested model,
/// and a rendered root.
#[derive(Default)]
pub struct MemoryEditor {
    buffer: Option<MemoryModel>,
    model: Option<Rc<MemoryModel>>,
    root: Option<NodeId>,
}

impl MemoryEditor {
    /// Editor exposing a get/set pair over `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            buffer: Some(MemoryModel::new(text)),
            ..Self::default()
        }
    }

    /// Editor whose only way in is its document model.
    pub fn model_only(model: Rc<MemoryModel>) -> Self {
        Self {
            model: Some(model),
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: Rc<MemoryModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn rendered_at(mut self, node: NodeId) -> Self {
        self.root = Some(node);
        self
    }

    pub fn buffer(&self) -> Option<&MemoryModel> {
        self.buffer.as_ref()
    }

    /// Text behind the top-level pair, if any.
    pub fn text(&self) -> Option<String> {
        self.buffer.as_ref().map(MemoryModel::text)
    }
}

impl EditorInstance for MemoryEditor {
    fn accessors(&self) -> Option<&dyn TextAccess> {
        self.buffer.as_ref().map(|b| b as &dyn TextAccess)
    }

    fn model(&self) -> Option<Rc<dyn TextAccess>> {
        self.model
            .as_ref()
            .map(|m| Rc::clone(m) as Rc<dyn TextAccess>)
    }

    fn container_node(&self) -> Option<NodeId> {
        self.root
    }
}

/// Registry holding a fixed list of editors in registration order.
#[derive(Default)]
pub struct StaticRegistry {
    editors: RefCell<Vec<Rc<dyn EditorInstance>>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, editor: Rc<dyn EditorInstance>) {
        self.editors.borrow_mut().push(editor);
    }
}

impl EditorRegistry for StaticRegistry {
    fn editors(&self) -> Result<Vec<Rc<dyn EditorInstance>>, ProbeError> {
        Ok(self.editors.borrow().clone())
    }
}
