use indexmap::IndexMap;

/// Identity of an edited entity, e.g. `"w42"` for a way.
pub type EntityId = String;

/// Tags currently bound to a field, keyed by tag key. A missing key means
/// the tag has no value; empty strings are stored as-is.
pub type TagMap = IndexMap<String, String>;

/// A proposed change to the document model: `Some` sets a key, `None`
/// unsets it. Controllers only propose patches; the host applies them.
pub type TagPatch = IndexMap<String, Option<String>>;

/// A versioned snapshot of an entity as the host's document model sees it.
/// Controllers read these through [`EditorContext`](crate::EditorContext)
/// lookups and never hold one past a single predicate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub tags: TagMap,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            tags: TagMap::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_tag_preserves_insertion_order() {
        let entity = Entity::new("w1")
            .with_tag("highway", "residential")
            .with_tag("name", "Elm Street");
        let keys: Vec<_> = entity.tags.keys().cloned().collect();
        assert_eq!(keys, vec!["highway", "name"]);
        assert_eq!(entity.tag("name"), Some("Elm Street"));
        assert_eq!(entity.tag("oneway"), None);
    }
}
