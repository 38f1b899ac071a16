//! Probe strategies, one per way an editor can be reached.
//!
//! [`default_strategies`] lists them in priority order: editor objects that
//! own the document come first, raw DOM elements that may hold a stale copy
//! come last. Supporting another editor means appending a strategy.

use std::rc::Rc;

use clearcode_core::is_blank;
use ego_tree::NodeId;

use crate::config::ProbeConfig;
use crate::editor::{EditorInstance, EditorRegistry};
use crate::page::HtmlPage;
use crate::surface::{EditableSurface, EditorSurface, InstanceSurface, ModelSurface, TextInputSurface};
use crate::types::{EventKind, ProbeError, SurfaceError};

pub enum ProbeResult {
    Found(Box<dyn EditorSurface>),
    NotFound,
}

pub trait ProbeStrategy {
    fn name(&self) -> &'static str;
    fn probe(&self, page: &HtmlPage, container: NodeId) -> Result<ProbeResult, ProbeError>;
}

/// Builds the ordered strategy list. The registry strategy is included only
/// when a registry is available.
pub fn default_strategies(
    config: &ProbeConfig,
    registry: Option<Rc<dyn EditorRegistry>>,
) -> Vec<Box<dyn ProbeStrategy>> {
    let finder = AttachedFinder {
        selector: config.instance_selector.clone(),
        properties: config.instance_properties.clone(),
        ancestor_depth: config.ancestor_depth,
    };
    let mut strategies: Vec<Box<dyn ProbeStrategy>> = vec![
        Box::new(AttachedApiProbe {
            finder: finder.clone(),
        }),
        Box::new(AttachedModelProbe { finder }),
    ];
    if let Some(registry) = registry {
        strategies.push(Box::new(RegistryProbe { registry }));
    }
    strategies.push(Box::new(TextInputProbe {
        selector: config.text_input_selector.clone(),
    }));
    strategies.push(Box::new(EditableProbe {
        selector: config.editable_selector.clone(),
    }));
    strategies.push(Box::new(AlternateEditorProbe {
        selector: config.alternate_selector.clone(),
        property: config.alternate_property.clone(),
    }));
    strategies.push(Box::new(FallbackScanProbe {
        selectors: config.fallback_selectors.clone(),
        text_input_selector: config.text_input_selector.clone(),
    }));
    strategies
}

#[derive(Debug, Clone)]
struct AttachedFinder {
    selector: String,
    properties: Vec<String>,
    ancestor_depth: usize,
}

impl AttachedFinder {
    /// First attached editor object accepted by `accept`, checking each
    /// matching element and then its ancestors.
    fn find(
        &self,
        page: &HtmlPage,
        container: NodeId,
        accept: impl Fn(&dyn EditorInstance) -> bool,
    ) -> Result<Option<Rc<dyn EditorInstance>>, ProbeError> {
        for element in page.query_within(container, &self.selector)? {
            let candidates = std::iter::once(element).chain(page.ancestors(element, self.ancestor_depth));
            for node in candidates {
                let found = self
                    .properties
                    .iter()
                    .filter_map(|prop| page.attached(node, prop))
                    .find(|instance| accept(instance.as_ref()));
                if found.is_some() {
                    return Ok(found);
                }
            }
        }
        Ok(None)
    }
}

/// Editor object attached to an element, used through its get/set pair.
struct AttachedApiProbe {
    finder: AttachedFinder,
}

impl ProbeStrategy for AttachedApiProbe {
    fn name(&self) -> &'static str {
        "editor-api"
    }

    fn probe(&self, page: &HtmlPage, container: NodeId) -> Result<ProbeResult, ProbeError> {
        let found = self
            .finder
            .find(page, container, |instance| instance.accessors().is_some())?;
        Ok(match found {
            Some(instance) => ProbeResult::Found(Box::new(InstanceSurface::new(instance))),
            None => ProbeResult::NotFound,
        })
    }
}

/// Attached editor object without a top-level pair, used through its model.
struct AttachedModelProbe {
    finder: AttachedFinder,
}

impl ProbeStrategy for AttachedModelProbe {
    fn name(&self) -> &'static str {
        "editor-model"
    }

    fn probe(&self, page: &HtmlPage, container: NodeId) -> Result<ProbeResult, ProbeError> {
        let found = self.finder.find(page, container, |instance| {
            instance.accessors().is_none() && instance.model().is_some()
        })?;
        Ok(match found.and_then(|instance| instance.model()) {
            Some(model) => ProbeResult::Found(Box::new(ModelSurface::new(model))),
            None => ProbeResult::NotFound,
        })
    }
}

struct RegistryProbe {
    registry: Rc<dyn EditorRegistry>,
}

impl ProbeStrategy for RegistryProbe {
    fn name(&self) -> &'static str {
        "editor-registry"
    }

    fn probe(&self, page: &HtmlPage, container: NodeId) -> Result<ProbeResult, ProbeError> {
        let editors = self.registry.editors()?;
        let positioned = editors.iter().find(|editor| {
            editor
                .container_node()
                .is_some_and(|root| page.contains(container, root))
        });
        let Some(editor) = positioned.or_else(|| editors.first()) else {
            return Ok(ProbeResult::NotFound);
        };
        if editor.accessors().is_some() {
            return Ok(ProbeResult::Found(Box::new(InstanceSurface::new(Rc::clone(editor)))));
        }
        match editor.model() {
            Some(model) => Ok(ProbeResult::Found(Box::new(ModelSurface::new(model)))),
            None => {
                let reason = "registry editor has no get/set pair or model";
                Err(SurfaceError::Unavailable(reason.into()).into())
            }
        }
    }
}

struct TextInputProbe {
    selector: String,
}

impl ProbeStrategy for TextInputProbe {
    fn name(&self) -> &'static str {
        "text-input"
    }

    fn probe(&self, page: &HtmlPage, container: NodeId) -> Result<ProbeResult, ProbeError> {
        let found = page
            .query_within(container, &self.selector)?
            .into_iter()
            .find(|node| page.value(*node).is_some_and(|value| !is_blank(&value)));
        Ok(match found {
            Some(node) => ProbeResult::Found(Box::new(TextInputSurface::new(node))),
            None => ProbeResult::NotFound,
        })
    }
}

struct EditableProbe {
    selector: String,
}

impl ProbeStrategy for EditableProbe {
    fn name(&self) -> &'static str {
        "content-editable"
    }

    fn probe(&self, page: &HtmlPage, container: NodeId) -> Result<ProbeResult, ProbeError> {
        let found = page
            .query_within(container, &self.selector)?
            .into_iter()
            .find(|node| page.text_content(*node).is_some_and(|text| !is_blank(&text)));
        Ok(match found {
            Some(node) => ProbeResult::Found(Box::new(EditableSurface::new(node))),
            None => ProbeResult::NotFound,
        })
    }
}

/// Other editor implementations recognized by a class marker and an
/// attached object with its own get/set pair.
struct AlternateEditorProbe {
    selector: String,
    property: String,
}

impl ProbeStrategy for AlternateEditorProbe {
    fn name(&self) -> &'static str {
        "alternate-editor"
    }

    fn probe(&self, page: &HtmlPage, container: NodeId) -> Result<ProbeResult, ProbeError> {
        let found = page
            .query_within(container, &self.selector)?
            .into_iter()
            .filter_map(|node| page.attached(node, &self.property))
            .find(|instance| instance.accessors().is_some());
        Ok(match found {
            Some(instance) => ProbeResult::Found(Box::new(InstanceSurface::new(instance))),
            None => ProbeResult::NotFound,
        })
    }
}

/// Last resort: anything whose class mentions an editor, with a text input
/// somewhere inside it.
struct FallbackScanProbe {
    selectors: Vec<String>,
    text_input_selector: String,
}

const FALLBACK_EVENTS: &[EventKind] = &[EventKind::Input];

impl ProbeStrategy for FallbackScanProbe {
    fn name(&self) -> &'static str {
        "editor-fallback"
    }

    fn probe(&self, page: &HtmlPage, container: NodeId) -> Result<ProbeResult, ProbeError> {
        for selector in &self.selectors {
            for editor in page.query_within(container, selector)? {
                let nested = page.query_within(editor, &self.text_input_selector)?;
                let Some(input) = nested.first().copied() else {
                    continue;
                };
                if page.value(input).is_some_and(|value| !value.is_empty()) {
                    return Ok(ProbeResult::Found(Box::new(TextInputSurface::with_events(
                        input,
                        FALLBACK_EVENTS,
                    ))));
                }
            }
        }
        Ok(ProbeResult::NotFound)
    }
}
