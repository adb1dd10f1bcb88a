use std::fmt;

use indexmap::IndexMap;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthChar;

use super::registry::{HelpWidget, ReferenceWidget};

/// Which controller action a chrome button triggers. The host maps clicks
/// on a button back to [`FieldController::remove`] or
/// [`FieldController::revert`].
///
/// [`FieldController::remove`]: super::FieldController::remove
/// [`FieldController::revert`]: super::FieldController::revert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAction {
    Remove,
    Revert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub action: FieldAction,
    pub title: String,
}

/// Label and controls around the editor. Created once per container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chrome {
    pub label: String,
    pub buttons: Vec<ActionButton>,
}

/// One mounted field on a surface. Reused across renders; flags and widget
/// slots are refreshed, chrome and the editor marker are created once.
pub struct FieldContainer {
    field_id: String,
    wrap: bool,
    modified: bool,
    present: bool,
    chrome: Option<Chrome>,
    editor_mounted: bool,
    help: Option<Box<dyn HelpWidget>>,
    reference: Option<Box<dyn ReferenceWidget>>,
}

impl FieldContainer {
    fn new(field_id: &str, wrap: bool) -> Self {
        Self {
            field_id: field_id.to_string(),
            wrap,
            modified: false,
            present: false,
            chrome: None,
            editor_mounted: false,
            help: None,
            reference: None,
        }
    }

    pub fn field_id(&self) -> &str {
        &self.field_id
    }

    pub fn is_wrapped(&self) -> bool {
        self.wrap
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn is_present(&self) -> bool {
        self.present
    }

    pub fn chrome(&self) -> Option<&Chrome> {
        self.chrome.as_ref()
    }

    pub fn editor_mounted(&self) -> bool {
        self.editor_mounted
    }

    pub fn help(&self) -> Option<&dyn HelpWidget> {
        self.help.as_deref()
    }

    pub fn reference(&self) -> Option<&dyn ReferenceWidget> {
        self.reference.as_deref()
    }

    /// Marks the editor as attached. Safe for renderers to call on every
    /// mount.
    pub fn mount_editor(&mut self) {
        self.editor_mounted = true;
    }

    pub(crate) fn set_flags(&mut self, modified: bool, present: bool) {
        self.modified = modified;
        self.present = present;
    }

    pub(crate) fn ensure_chrome(&mut self, label: &str, remove: bool, revert: bool) {
        if self.chrome.is_some() {
            return;
        }
        let mut buttons = Vec::new();
        if remove {
            buttons.push(ActionButton {
                action: FieldAction::Remove,
                title: "Remove".to_string(),
            });
        }
        if revert {
            buttons.push(ActionButton {
                action: FieldAction::Revert,
                title: "Undo".to_string(),
            });
        }
        self.chrome = Some(Chrome {
            label: label.to_string(),
            buttons,
        });
    }

    pub(crate) fn set_help(&mut self, help: Option<Box<dyn HelpWidget>>) {
        self.help = help;
    }

    pub(crate) fn set_reference(&mut self, reference: Option<Box<dyn ReferenceWidget>>) {
        self.reference = reference;
    }

    /// Draws the chrome line: label plus button titles, styled by the
    /// modified/present flags. Editor and widget bodies draw themselves.
    pub fn draw(&self, frame: &mut Frame<'_>, area: Rect) {
        let Some(chrome) = &self.chrome else {
            return;
        };
        let reserved: usize = chrome
            .buttons
            .iter()
            .map(|button| button.title.len() + 3)
            .sum();
        let label_width = (area.width as usize).saturating_sub(reserved);
        let mut label_style = Style::default();
        if self.modified {
            label_style = label_style.fg(Color::Yellow).add_modifier(Modifier::ITALIC);
        }
        if self.present {
            label_style = label_style.add_modifier(Modifier::BOLD);
        }
        let mut spans = vec![Span::styled(
            truncate_to_width(&chrome.label, label_width),
            label_style,
        )];
        for button in &chrome.buttons {
            spans.push(Span::raw(format!(" [{}]", button.title)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl fmt::Debug for FieldContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldContainer")
            .field("field_id", &self.field_id)
            .field("wrap", &self.wrap)
            .field("modified", &self.modified)
            .field("present", &self.present)
            .field("chrome", &self.chrome)
            .field("editor_mounted", &self.editor_mounted)
            .field("help", &self.help.is_some())
            .field("reference", &self.reference.is_some())
            .finish()
    }
}

/// Retained mounting tree for a panel: one container per field id, reused
/// across renders so repeated rendering never duplicates structure.
#[derive(Debug, Default)]
pub struct Surface {
    containers: IndexMap<String, FieldContainer>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn ensure_container(&mut self, field_id: &str, wrap: bool) -> &mut FieldContainer {
        self.containers
            .entry(field_id.to_string())
            .or_insert_with(|| FieldContainer::new(field_id, wrap))
    }

    pub fn container(&self, field_id: &str) -> Option<&FieldContainer> {
        self.containers.get(field_id)
    }

    pub fn container_mut(&mut self, field_id: &str) -> Option<&mut FieldContainer> {
        self.containers.get_mut(field_id)
    }

    /// Discards a field's container, e.g. when its controller is dropped.
    pub fn remove_container(&mut self, field_id: &str) -> bool {
        self.containers.shift_remove(field_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

/// Truncates to a display width on character boundaries, appending an
/// ellipsis when anything was cut.
pub(crate) fn truncate_to_width(text: &str, width: usize) -> String {
    let total: usize = text.chars().map(|ch| ch.width().unwrap_or(0)).sum();
    if total <= width {
        return text.to_string();
    }
    let budget = width.saturating_sub(1);
    let mut used = 0usize;
    let mut out = String::new();
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > budget {
            break;
        }
        used += ch_width;
        out.push(ch);
    }
    out.push('…');
    out
}
