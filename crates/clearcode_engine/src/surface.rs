use std::rc::Rc;

use clearcode_core::truncate;
use clearcode_logging::clear_warn;
use ego_tree::NodeId;

use crate::editor::{EditorInstance, TextAccess};
use crate::page::HtmlPage;
use crate::types::{EventKind, SurfaceError};

/// Read/write access to one editor's text, whatever implements it.
pub trait EditorSurface {
    fn read(&self, page: &HtmlPage) -> Result<String, SurfaceError>;
    fn write(&self, page: &mut HtmlPage, text: &str) -> Result<(), SurfaceError>;
    /// Lets the page's own state observe a completed write.
    fn notify_changed(&self, page: &mut HtmlPage);
}

/// An editor object's top-level get/set pair.
pub struct InstanceSurface {
    instance: Rc<dyn EditorInstance>,
}

impl InstanceSurface {
    pub fn new(instance: Rc<dyn EditorInstance>) -> Self {
        Self { instance }
    }

    fn accessors(&self) -> Result<&dyn TextAccess, SurfaceError> {
        self.instance
            .accessors()
            .ok_or_else(|| SurfaceError::Unavailable("no get/set pair".into()))
    }
}

impl EditorSurface for InstanceSurface {
    fn read(&self, _page: &HtmlPage) -> Result<String, SurfaceError> {
        self.accessors()?.get_value()
    }

    fn write(&self, _page: &mut HtmlPage, text: &str) -> Result<(), SurfaceError> {
        self.accessors()?.set_value(text)
    }

    // The view and its model can hold separate copies; bring the model in line.
    fn notify_changed(&self, _page: &mut HtmlPage) {
        let Some(model) = self.instance.model() else {
            return;
        };
        let synced = model.get_value().and_then(|current| {
            let retained = truncate(&current);
            if retained == current {
                Ok(())
            } else {
                model.set_value(retained)
            }
        });
        if let Err(err) = synced {
            clear_warn!("could not sync editor model: {}", err);
        }
    }
}

/// A nested document model's get/set pair.
pub struct ModelSurface {
    model: Rc<dyn TextAccess>,
}

impl ModelSurface {
    pub fn new(model: Rc<dyn TextAccess>) -> Self {
        Self { model }
    }
}

impl EditorSurface for ModelSurface {
    fn read(&self, _page: &HtmlPage) -> Result<String, SurfaceError> {
        self.model.get_value()
    }

    fn write(&self, _page: &mut HtmlPage, text: &str) -> Result<(), SurfaceError> {
        self.model.set_value(text)
    }

    fn notify_changed(&self, _page: &mut HtmlPage) {}
}

/// The value of a `textarea` (or `input`) element.
pub struct TextInputSurface {
    node: NodeId,
    events: &'static [EventKind],
}

impl TextInputSurface {
    pub fn new(node: NodeId) -> Self {
        Self::with_events(node, &[EventKind::Input, EventKind::Change])
    }

    pub fn with_events(node: NodeId, events: &'static [EventKind]) -> Self {
        Self { node, events }
    }
}

impl EditorSurface for TextInputSurface {
    fn read(&self, page: &HtmlPage) -> Result<String, SurfaceError> {
        page.value(self.node).ok_or(SurfaceError::DetachedNode(self.node))
    }

    fn write(&self, page: &mut HtmlPage, text: &str) -> Result<(), SurfaceError> {
        page.set_value(self.node, text)
            .map_err(|_| SurfaceError::DetachedNode(self.node))
    }

    fn notify_changed(&self, page: &mut HtmlPage) {
        for kind in self.events {
            page.dispatch(self.node, *kind);
        }
    }
}

/// The text content of a `contenteditable` element.
pub struct EditableSurface {
    node: NodeId,
}

impl EditableSurface {
    pub fn new(node: NodeId) -> Self {
        Self { node }
    }
}

impl EditorSurface for EditableSurface {
    fn read(&self, page: &HtmlPage) -> Result<String, SurfaceError> {
        page.text_content(self.node).ok_or(SurfaceError::DetachedNode(self.node))
    }

    fn write(&self, page: &mut HtmlPage, text: &str) -> Result<(), SurfaceError> {
        page.set_text_content(self.node, text)
            .map_err(|_| SurfaceError::DetachedNode(self.node))
    }

    fn notify_changed(&self, page: &mut HtmlPage) {
        page.dispatch(self.node, EventKind::Input);
        page.dispatch(self.node, EventKind::Change);
    }
}
