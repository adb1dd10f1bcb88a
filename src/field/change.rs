use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::domain::{FieldDefinition, TagPatch};

/// Distinguishes live input (a keystroke mid-edit) from a completed action
/// such as revert, remove, or a committed editor change. Forwarded
/// unchanged from the renderer that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    Input,
    Committed,
}

impl ChangeOrigin {
    pub fn is_input(self) -> bool {
        matches!(self, ChangeOrigin::Input)
    }
}

/// Callback invoked for every change a field proposes. The host merges the
/// patch into the document model and triggers the next render.
pub type ChangeHandler = Box<dyn FnMut(&FieldDefinition, &TagPatch, ChangeOrigin)>;

/// The single outbound channel of a controller. Cloned into the renderer at
/// creation so renderer changes and controller actions flow through the
/// same subscriber list, synchronously.
#[derive(Clone)]
pub struct ChangeEmitter {
    definition: Rc<FieldDefinition>,
    handlers: Rc<RefCell<Vec<ChangeHandler>>>,
}

impl ChangeEmitter {
    pub(crate) fn new(
        definition: Rc<FieldDefinition>,
        handlers: Rc<RefCell<Vec<ChangeHandler>>>,
    ) -> Self {
        Self {
            definition,
            handlers,
        }
    }

    pub fn emit(&self, patch: &TagPatch, origin: ChangeOrigin) {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            field = %self.definition.id,
            keys = patch.len(),
            input = origin.is_input(),
            "field change"
        );
        for handler in self.handlers.borrow_mut().iter_mut() {
            handler(&self.definition, patch, origin);
        }
    }
}

impl fmt::Debug for ChangeEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeEmitter")
            .field("field", &self.definition.id)
            .field("handlers", &self.handlers.borrow().len())
            .finish()
    }
}

/// Consumption flags for the interaction that triggered an action, standing
/// in for the host event loop's propagation controls. Actions consume the
/// signal so the triggering click or keypress is not handled twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSignal {
    consumed: bool,
    default_prevented: bool,
}

impl InputSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops further dispatch and suppresses the default handling.
    pub fn consume(&mut self) {
        self.consumed = true;
        self.default_prevented = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}
