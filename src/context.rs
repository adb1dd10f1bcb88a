use crate::domain::Entity;

/// Host services a field controller needs: entity lookups against the
/// document model. Both lookups may miss; a miss is a defined state, never
/// an error. Returns owned snapshots so hosts backed by interior-mutability
/// graphs can implement the trait without lending references out.
pub trait EditorContext {
    /// The unmodified, pre-edit-session version of the entity.
    fn base_entity(&self, id: &str) -> Option<Entity>;

    /// The most recently committed version of the entity.
    fn latest_entity(&self, id: &str) -> Option<Entity>;
}
