mod entity;
mod preset;

pub use entity::{Entity, EntityId, TagMap, TagPatch};
pub use preset::{FieldDefinition, FieldKind, PrerequisiteRule, ReferenceDescriptor};
