mod change;
mod controller;
mod error;
mod options;
mod registry;
mod surface;

pub use change::{ChangeEmitter, ChangeHandler, ChangeOrigin, InputSignal};
pub use controller::FieldController;
pub use error::FieldError;
pub use options::{DisplayState, FieldOptions};
pub use registry::{FieldRegistry, FieldRenderer, HelpWidget, ReferenceWidget, RendererFactory};
pub use surface::{ActionButton, Chrome, FieldAction, FieldContainer, Surface};
