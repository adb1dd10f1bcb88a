use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::change::{ChangeEmitter, ChangeHandler, ChangeOrigin, InputSignal};
use super::error::FieldError;
use super::options::{DisplayState, FieldOptions};
use super::registry::{FieldRegistry, FieldRenderer};
use super::surface::Surface;
use crate::context::EditorContext;
use crate::domain::{
    Entity, EntityId, FieldDefinition, FieldKind, ReferenceDescriptor, TagMap, TagPatch,
};

/// Controller for one editable field bound to one entity. Decides whether
/// the field is shown, modified, or allowed at all, and turns user edits
/// (including revert and clear) into [`TagPatch`] change notifications.
/// Created per (definition, entity) pairing by the host panel and dropped
/// when the panel discards the field.
pub struct FieldController {
    context: Rc<dyn EditorContext>,
    registry: Rc<FieldRegistry>,
    definition: Rc<FieldDefinition>,
    entity: Option<Entity>,
    entity_id: Option<EntityId>,
    options: FieldOptions,
    shown: bool,
    display: DisplayState,
    tags: TagMap,
    renderer: Option<Box<dyn FieldRenderer>>,
    handlers: Rc<RefCell<Vec<ChangeHandler>>>,
    emitter: ChangeEmitter,
}

impl FieldController {
    /// Builds a controller over a normalized copy of the definition. With
    /// `options.show` the renderer is created immediately; otherwise
    /// creation waits for the first `show` or `render`. Fails when the
    /// definition's kind has no registered renderer factory.
    pub fn new(
        context: Rc<dyn EditorContext>,
        registry: Rc<FieldRegistry>,
        definition: FieldDefinition,
        entity: Option<Entity>,
        options: FieldOptions,
    ) -> Result<Self, FieldError> {
        let definition = Rc::new(definition.normalized());
        let handlers: Rc<RefCell<Vec<ChangeHandler>>> = Rc::default();
        let emitter = ChangeEmitter::new(Rc::clone(&definition), Rc::clone(&handlers));
        let mut controller = Self {
            context,
            registry,
            definition,
            entity,
            entity_id: None,
            options,
            shown: options.show,
            display: DisplayState::default(),
            tags: TagMap::new(),
            renderer: None,
            handlers,
            emitter,
        };
        if controller.shown {
            controller.create_renderer()?;
        }
        Ok(controller)
    }

    pub fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    pub fn options(&self) -> FieldOptions {
        self.options
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    /// Subscribes to the controller's change notifications. Every patch a
    /// renderer or action proposes arrives here, with the definition and
    /// the origin flag forwarded unchanged.
    pub fn on_change(
        &mut self,
        handler: impl FnMut(&FieldDefinition, &TagPatch, ChangeOrigin) + 'static,
    ) -> &mut Self {
        self.handlers.borrow_mut().push(Box::new(handler));
        self
    }

    fn create_renderer(&mut self) -> Result<(), FieldError> {
        if self.renderer.is_some() {
            return Ok(());
        }
        let factory =
            self.registry
                .factory(self.definition.kind)
                .ok_or_else(|| FieldError::UnknownFieldKind {
                    field: self.definition.id.clone(),
                    kind: self.definition.kind,
                })?;
        #[cfg(feature = "tracing")]
        tracing::debug!(field = %self.definition.id, kind = %self.definition.kind, "creating renderer");
        let mut renderer = factory.create(
            &self.definition,
            Rc::clone(&self.context),
            self.emitter.clone(),
        );
        if let Some(entity) = &self.entity {
            self.entity_id = Some(entity.id.clone());
            if renderer.wants_entity() {
                renderer.bind_entity(entity);
            }
        }
        self.renderer = Some(renderer);
        Ok(())
    }

    /// True when any relevant key has a value in the current snapshot.
    /// Multi-key fields match by prefix so namespaced tag families count;
    /// the prefix check is deliberate and also matches unrelated keys that
    /// merely start with a relevant key.
    pub fn is_present(&self) -> bool {
        self.definition.keys.iter().any(|key| {
            if self.definition.kind.is_multi_key() {
                self.tags.keys().any(|tag_key| tag_key.starts_with(key.as_str()))
            } else {
                self.tags.contains_key(key.as_str())
            }
        })
    }

    /// True when any relevant key differs from the baseline entity. A
    /// missing baseline counts as "no value for every key", so this reduces
    /// to presence in the snapshot.
    pub fn is_modified(&self) -> bool {
        let Some(entity) = &self.entity else {
            return false;
        };
        let base = self.context.base_entity(&entity.id);
        self.definition.keys.iter().any(|key| match &base {
            Some(base) => self.tags.get(key) != base.tags.get(key),
            None => self.tags.contains_key(key.as_str()),
        })
    }

    /// Explicitly shown, or carrying a value. Data is never hidden behind
    /// an unexpanded field list.
    pub fn is_shown(&self) -> bool {
        self.shown || self.is_present()
    }

    /// Whether the field may be offered at all. A field with a value always
    /// may; otherwise the prerequisite rule is evaluated against the latest
    /// committed entity, failing open when that entity cannot be found.
    pub fn is_allowed(&self) -> bool {
        let Some(entity) = &self.entity else {
            return true;
        };
        if self.is_present() {
            return true;
        }
        let Some(latest) = self.context.latest_entity(&entity.id) else {
            return true;
        };
        let Some(rule) = &self.definition.prerequisite else {
            return true;
        };
        if rule.key.is_empty() {
            return true;
        }
        // An empty value counts as absent, like the original editor.
        let value = match latest.tags.get(&rule.key) {
            Some(value) if !value.is_empty() => value,
            _ => return false,
        };
        if let Some(forbidden) = &rule.value_not {
            return forbidden != value;
        }
        if let Some(required) = &rule.value {
            return required == value;
        }
        true
    }

    /// Proposes restoring every relevant key to its baseline value, or
    /// unsetting it when the baseline lacks it. No-op without a bound
    /// entity. The snapshot itself is untouched; the host applies the patch
    /// and re-renders.
    pub fn revert(&mut self, input: &mut InputSignal) {
        input.consume();
        let Some(entity) = &self.entity else {
            return;
        };
        let base = self.context.base_entity(&entity.id);
        let patch: TagPatch = self
            .definition
            .keys
            .iter()
            .map(|key| {
                let value = base.as_ref().and_then(|base| base.tags.get(key).cloned());
                (key.clone(), value)
            })
            .collect();
        self.emitter.emit(&patch, ChangeOrigin::Committed);
    }

    /// Proposes unsetting every relevant key, regardless of current values.
    pub fn remove(&mut self, input: &mut InputSignal) {
        input.consume();
        let patch: TagPatch = self
            .definition
            .keys
            .iter()
            .map(|key| (key.clone(), None))
            .collect();
        self.emitter.emit(&patch, ChangeOrigin::Committed);
    }

    /// Marks the field explicitly shown and ensures the renderer exists.
    /// When the definition declares a non-empty default and the snapshot
    /// disagrees, proposes setting the primary key to it, so "add field"
    /// pre-populates without the renderer knowing about defaulting.
    pub fn show(&mut self) -> Result<(), FieldError> {
        self.shown = true;
        self.create_renderer()?;
        if let Some(default) = &self.definition.default {
            if !default.is_empty()
                && !self.definition.key.is_empty()
                && self.tags.get(&self.definition.key).map(String::as_str)
                    != Some(default.as_str())
            {
                let mut patch = TagPatch::new();
                patch.insert(self.definition.key.clone(), Some(default.clone()));
                self.emitter.emit(&patch, ChangeOrigin::Committed);
            }
        }
        Ok(())
    }

    /// Reconciles the field onto the surface: one container per field id,
    /// chrome created once, modified/present flags refreshed, renderer
    /// lazily created and mounted, help and reference widgets rebuilt, and
    /// finally the current snapshot pushed down. Safe to call on every
    /// panel redraw.
    pub fn render(&mut self, surface: &mut Surface) -> Result<(), FieldError> {
        let modified = self.is_modified();
        let present = self.is_present();

        let container = surface.ensure_container(&self.definition.id, self.options.wrap);
        if self.options.wrap {
            container.ensure_chrome(
                &self.definition.label,
                self.options.remove,
                self.options.revert,
            );
        }
        container.set_flags(modified, present);

        self.create_renderer()?;

        let help = if self.options.wrap && self.definition.kind == FieldKind::Restrictions {
            self.registry.help("restrictions")
        } else {
            None
        };

        let reference = if self.options.wrap && self.options.info {
            let descriptor = self.definition.reference.clone().unwrap_or_else(|| {
                ReferenceDescriptor {
                    key: self.definition.reference_key().to_string(),
                    value: None,
                }
            });
            self.registry.reference(&descriptor).map(|mut widget| {
                if self.display == DisplayState::Hover {
                    widget.set_collapsed(true);
                }
                widget
            })
        } else {
            None
        };

        if let Some(renderer) = self.renderer.as_mut() {
            renderer.mount(container);
            container.set_help(help);
            container.set_reference(reference);
            renderer.push_tags(&self.tags);
        }
        Ok(())
    }

    /// Draws the field into `area`: chrome line first when wrapped, editor
    /// body underneath.
    pub fn draw(&self, frame: &mut Frame<'_>, surface: &Surface, area: Rect) {
        let Some(container) = surface.container(&self.definition.id) else {
            return;
        };
        let body = if container.chrome().is_some() {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(1)])
                .split(area);
            container.draw(frame, chunks[0]);
            chunks[1]
        } else {
            area
        };
        if let Some(renderer) = &self.renderer {
            renderer.draw(frame, body);
        }
    }

    pub fn state(&self) -> DisplayState {
        self.display
    }

    pub fn set_state(&mut self, state: DisplayState) -> &mut Self {
        self.display = state;
        self
    }

    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    /// Replaces the snapshot wholesale. The controller never keeps a
    /// previous entity's tags across a rebind.
    pub fn set_tags(&mut self, tags: TagMap) -> &mut Self {
        self.tags = tags;
        self
    }

    /// Forwards to the renderer's focus behavior; no-op before creation.
    pub fn focus(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.focus();
        }
    }

    /// Forwards a key to the renderer, which may emit changes through the
    /// controller's change event while handling it.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match self.renderer.as_mut() {
            Some(renderer) => renderer.handle_key(key),
            None => false,
        }
    }
}

impl std::fmt::Debug for FieldController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldController")
            .field("field", &self.definition.id)
            .field("kind", &self.definition.kind)
            .field("entity", &self.entity_id)
            .field("shown", &self.shown)
            .field("display", &self.display)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}
