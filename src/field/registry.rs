use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use super::change::ChangeEmitter;
use super::surface::FieldContainer;
use crate::context::EditorContext;
use crate::domain::{Entity, FieldDefinition, FieldKind, ReferenceDescriptor, TagMap};

/// Narrow contract every concrete field editor plugs into. Renderers own
/// their editing state, draw themselves, and propose patches through the
/// [`ChangeEmitter`] they were constructed with; they never touch the
/// document model.
pub trait FieldRenderer {
    fn kind(&self) -> FieldKind;

    /// Attaches the editor to the field's container. Called on every
    /// render; must reconcile, not duplicate.
    fn mount(&mut self, container: &mut FieldContainer);

    /// Receives the full current snapshot, replacing whatever was pushed
    /// before. Always called after `mount` within a render pass.
    fn push_tags(&mut self, tags: &TagMap);

    /// Renderers that care about entity context opt in here and receive
    /// the bound entity once, at creation.
    fn wants_entity(&self) -> bool {
        false
    }

    fn bind_entity(&mut self, entity: &Entity) {
        let _ = entity;
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let _ = key;
        false
    }

    fn focus(&mut self) {}

    fn draw(&self, frame: &mut Frame<'_>, area: Rect);
}

/// Produces a renderer bound to the host context. Implemented for free by
/// any matching closure.
pub trait RendererFactory {
    fn create(
        &self,
        field: &FieldDefinition,
        context: Rc<dyn EditorContext>,
        emitter: ChangeEmitter,
    ) -> Box<dyn FieldRenderer>;
}

impl<F> RendererFactory for F
where
    F: Fn(&FieldDefinition, Rc<dyn EditorContext>, ChangeEmitter) -> Box<dyn FieldRenderer>,
{
    fn create(
        &self,
        field: &FieldDefinition,
        context: Rc<dyn EditorContext>,
        emitter: ChangeEmitter,
    ) -> Box<dyn FieldRenderer> {
        self(field, context, emitter)
    }
}

/// Reference popover for a tag key, with independently mountable body and
/// button parts.
pub trait ReferenceWidget {
    fn set_collapsed(&mut self, collapsed: bool);

    fn is_collapsed(&self) -> bool;

    fn toggle(&mut self) {
        let expanded = !self.is_collapsed();
        self.set_collapsed(expanded);
    }

    fn draw_body(&self, frame: &mut Frame<'_>, area: Rect);

    fn draw_button(&self, frame: &mut Frame<'_>, area: Rect);
}

/// Inline help for field kinds that need it (currently only restrictions).
pub trait HelpWidget {
    fn topic(&self) -> &str;

    fn draw_body(&self, frame: &mut Frame<'_>, area: Rect);

    fn draw_button(&self, frame: &mut Frame<'_>, area: Rect);
}

type ReferenceFactory = Box<dyn Fn(&ReferenceDescriptor) -> Box<dyn ReferenceWidget>>;
type HelpFactory = Box<dyn Fn(&str) -> Box<dyn HelpWidget>>;

/// Maps field kinds to renderer factories, plus the optional widget hooks.
/// A kind without a factory is a configuration error surfaced by the
/// controller, not a silent miss.
#[derive(Default)]
pub struct FieldRegistry {
    factories: HashMap<FieldKind, Box<dyn RendererFactory>>,
    reference: Option<ReferenceFactory>,
    help: Option<HelpFactory>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: FieldKind, factory: impl RendererFactory + 'static) {
        self.factories.insert(kind, Box::new(factory));
    }

    pub fn register_reference(
        &mut self,
        factory: impl Fn(&ReferenceDescriptor) -> Box<dyn ReferenceWidget> + 'static,
    ) {
        self.reference = Some(Box::new(factory));
    }

    pub fn register_help(&mut self, factory: impl Fn(&str) -> Box<dyn HelpWidget> + 'static) {
        self.help = Some(Box::new(factory));
    }

    pub fn supports(&self, kind: FieldKind) -> bool {
        self.factories.contains_key(&kind)
    }

    pub(crate) fn factory(&self, kind: FieldKind) -> Option<&dyn RendererFactory> {
        self.factories.get(&kind).map(|factory| &**factory)
    }

    pub(crate) fn reference(&self, descriptor: &ReferenceDescriptor) -> Option<Box<dyn ReferenceWidget>> {
        self.reference.as_ref().map(|factory| factory(descriptor))
    }

    pub(crate) fn help(&self, topic: &str) -> Option<Box<dyn HelpWidget>> {
        self.help.as_ref().map(|factory| factory(topic))
    }
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.factories.keys().map(|kind| kind.as_str()).collect();
        kinds.sort_unstable();
        f.debug_struct("FieldRegistry")
            .field("kinds", &kinds)
            .field("reference", &self.reference.is_some())
            .field("help", &self.help.is_some())
            .finish()
    }
}
