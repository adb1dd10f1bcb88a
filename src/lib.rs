#![deny(rust_2018_idioms)]

pub mod context;
pub mod domain;
pub mod field;

pub use context::EditorContext;
pub use domain::{
    Entity, EntityId, FieldDefinition, FieldKind, PrerequisiteRule, ReferenceDescriptor, TagMap,
    TagPatch,
};
pub use field::{
    ChangeEmitter, ChangeOrigin, DisplayState, FieldContainer, FieldController, FieldError,
    FieldOptions, FieldRegistry, FieldRenderer, HelpWidget, InputSignal, ReferenceWidget,
    RendererFactory, Surface,
};

pub mod prelude {
    pub use super::{
        ChangeOrigin, DisplayState, EditorContext, Entity, FieldController, FieldDefinition,
        FieldKind, FieldOptions, FieldRegistry, FieldRenderer, InputSignal, Surface, TagMap,
        TagPatch,
    };
}
