use std::fmt;

use serde::Deserialize;

/// Selects which concrete renderer a field binds to. Mirrors the type tags
/// used in preset files, hence the camelCase serde names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    Number,
    Email,
    Url,
    Textarea,
    Combo,
    TypeCombo,
    MultiCombo,
    SemiCombo,
    Check,
    Radio,
    Localized,
    Maxspeed,
    Restrictions,
    Wikipedia,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Email => "email",
            FieldKind::Url => "url",
            FieldKind::Textarea => "textarea",
            FieldKind::Combo => "combo",
            FieldKind::TypeCombo => "typeCombo",
            FieldKind::MultiCombo => "multiCombo",
            FieldKind::SemiCombo => "semiCombo",
            FieldKind::Check => "check",
            FieldKind::Radio => "radio",
            FieldKind::Localized => "localized",
            FieldKind::Maxspeed => "maxspeed",
            FieldKind::Restrictions => "restrictions",
            FieldKind::Wikipedia => "wikipedia",
        }
    }

    /// Kinds whose relevant keys are prefixes of a dynamic family of tag
    /// keys (e.g. `recycling:` covering `recycling:glass`, `recycling:cans`).
    pub fn is_multi_key(self) -> bool {
        matches!(self, FieldKind::MultiCombo)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A precondition on another tag that must hold on the latest committed
/// entity before this field may be offered. With neither `value` nor
/// `value_not` set, mere presence of the key is enough.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerequisiteRule {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub value_not: Option<String>,
}

/// Lookup descriptor for the reference popover.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceDescriptor {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// One editable field as declared by a preset file. Read-mostly and owned
/// by the preset registry; controllers keep a normalized per-instance copy
/// and hold their mutable state (renderer handle, bound entity id) outside
/// of it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: String,
    pub key: String,
    /// All keys the field edits. Empty in most presets; normalization
    /// fills in `[key]`.
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub label: String,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default, rename = "prerequisiteTag")]
    pub prerequisite: Option<PrerequisiteRule>,
    #[serde(default)]
    pub reference: Option<ReferenceDescriptor>,
}

impl FieldDefinition {
    pub fn new(
        id: impl Into<String>,
        key: impl Into<String>,
        kind: FieldKind,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            keys: Vec::new(),
            kind,
            label: label.into(),
            default: None,
            prerequisite: None,
            reference: None,
        }
    }

    pub fn with_keys(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_prerequisite(mut self, prerequisite: PrerequisiteRule) -> Self {
        self.prerequisite = Some(prerequisite);
        self
    }

    pub fn with_reference(mut self, reference: ReferenceDescriptor) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Guarantees `keys` is non-empty, defaulting to the primary key.
    pub fn normalized(mut self) -> Self {
        if self.keys.is_empty() {
            self.keys = vec![self.key.clone()];
        }
        self
    }

    /// The key the reference popover is looked up under. Multi-key fields
    /// store their namespace separator on the primary key, so one trailing
    /// `:` is stripped.
    pub fn reference_key(&self) -> &str {
        if self.kind.is_multi_key() {
            self.key.strip_suffix(':').unwrap_or(&self.key)
        } else {
            &self.key
        }
    }
}
