#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;

use tagform::{
    ChangeEmitter, ChangeOrigin, EditorContext, Entity, FieldContainer, FieldController,
    FieldDefinition, FieldKind, FieldRegistry, FieldRenderer, HelpWidget, ReferenceDescriptor,
    ReferenceWidget, TagMap, TagPatch,
};

/// In-memory stand-in for the host document model.
#[derive(Debug, Default)]
pub struct StaticContext {
    base: HashMap<String, Entity>,
    latest: HashMap<String, Entity>,
}

impl StaticContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(mut self, entity: Entity) -> Self {
        self.base.insert(entity.id.clone(), entity);
        self
    }

    pub fn with_latest(mut self, entity: Entity) -> Self {
        self.latest.insert(entity.id.clone(), entity);
        self
    }
}

impl EditorContext for StaticContext {
    fn base_entity(&self, id: &str) -> Option<Entity> {
        self.base.get(id).cloned()
    }

    fn latest_entity(&self, id: &str) -> Option<Entity> {
        self.latest.get(id).cloned()
    }
}

/// Everything the probe renderer observed.
#[derive(Debug, Default)]
pub struct ProbeLog {
    pub created: usize,
    pub mounts: usize,
    pub pushes: Vec<TagMap>,
    pub focused: usize,
    pub bound_entities: Vec<String>,
}

/// Renderer double: records lifecycle calls and proposes a patch for any
/// character key it is handed.
pub struct ProbeRenderer {
    kind: FieldKind,
    key: String,
    emitter: ChangeEmitter,
    log: Rc<RefCell<ProbeLog>>,
}

impl FieldRenderer for ProbeRenderer {
    fn kind(&self) -> FieldKind {
        self.kind
    }

    fn mount(&mut self, container: &mut FieldContainer) {
        self.log.borrow_mut().mounts += 1;
        container.mount_editor();
    }

    fn push_tags(&mut self, tags: &TagMap) {
        self.log.borrow_mut().pushes.push(tags.clone());
    }

    fn wants_entity(&self) -> bool {
        true
    }

    fn bind_entity(&mut self, entity: &Entity) {
        self.log.borrow_mut().bound_entities.push(entity.id.clone());
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if let KeyCode::Char(c) = key.code {
            let mut patch = TagPatch::new();
            patch.insert(self.key.clone(), Some(c.to_string()));
            self.emitter.emit(&patch, ChangeOrigin::Input);
            true
        } else {
            false
        }
    }

    fn focus(&mut self) {
        self.log.borrow_mut().focused += 1;
    }

    fn draw(&self, _frame: &mut Frame<'_>, _area: Rect) {}
}

/// Registers a probe factory for each kind; all share one log.
pub fn probe_registry(kinds: &[FieldKind]) -> (FieldRegistry, Rc<RefCell<ProbeLog>>) {
    let log = Rc::new(RefCell::new(ProbeLog::default()));
    let mut registry = FieldRegistry::new();
    for &kind in kinds {
        let log = Rc::clone(&log);
        registry.register(
            kind,
            move |field: &FieldDefinition,
                  _context: Rc<dyn EditorContext>,
                  emitter: ChangeEmitter|
                  -> Box<dyn FieldRenderer> {
                log.borrow_mut().created += 1;
                Box::new(ProbeRenderer {
                    kind,
                    key: field.key.clone(),
                    emitter,
                    log: Rc::clone(&log),
                })
            },
        );
    }
    (registry, log)
}

#[derive(Debug)]
pub struct StubReference {
    collapsed: bool,
}

impl ReferenceWidget for StubReference {
    fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    fn draw_body(&self, _frame: &mut Frame<'_>, _area: Rect) {}

    fn draw_button(&self, _frame: &mut Frame<'_>, _area: Rect) {}
}

/// Hooks a stub reference factory in and returns the descriptors it saw.
pub fn stub_reference_factory(registry: &mut FieldRegistry) -> Rc<RefCell<Vec<ReferenceDescriptor>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    registry.register_reference(move |descriptor| {
        log.borrow_mut().push(descriptor.clone());
        Box::new(StubReference { collapsed: false })
    });
    seen
}

#[derive(Debug)]
pub struct StubHelp {
    topic: String,
}

impl HelpWidget for StubHelp {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn draw_body(&self, _frame: &mut Frame<'_>, _area: Rect) {}

    fn draw_button(&self, _frame: &mut Frame<'_>, _area: Rect) {}
}

pub fn stub_help_factory(registry: &mut FieldRegistry) {
    registry.register_help(|topic| {
        Box::new(StubHelp {
            topic: topic.to_string(),
        })
    });
}

pub type ChangeRecord = (String, TagPatch, ChangeOrigin);

/// Subscribes a recording handler and returns the captured changes.
pub fn record_changes(controller: &mut FieldController) -> Rc<RefCell<Vec<ChangeRecord>>> {
    let records = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&records);
    controller.on_change(move |field, patch, origin| {
        log.borrow_mut().push((field.id.clone(), patch.clone(), origin));
    });
    records
}

pub fn tag_map(pairs: &[(&str, &str)]) -> TagMap {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

pub fn patch(pairs: &[(&str, Option<&str>)]) -> TagPatch {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.map(str::to_string)))
        .collect()
}
