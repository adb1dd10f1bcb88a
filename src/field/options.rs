/// Per-field presentation options. Every flag defaults to `true`; partial
/// overrides merge over the defaults with struct update syntax:
///
/// ```
/// use tagform::FieldOptions;
///
/// let options = FieldOptions { show: false, ..Default::default() };
/// assert!(options.wrap && options.remove && options.revert && options.info);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOptions {
    /// Initial visibility; a hidden field defers renderer construction.
    pub show: bool,
    /// Render the label/controls chrome around the editor.
    pub wrap: bool,
    /// Offer a clear action.
    pub remove: bool,
    /// Offer a revert-to-baseline action.
    pub revert: bool,
    /// Offer the reference popover.
    pub info: bool,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            show: true,
            wrap: true,
            remove: true,
            revert: true,
            info: true,
        }
    }
}

/// Lifecycle of the surrounding panel. `Hover` previews keep the reference
/// popover collapsed. Transitions are free in both directions; the
/// explicit-shown flag lives on the controller and only ever moves to shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayState {
    #[default]
    Normal,
    Hover,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_to_all_enabled() {
        let options = FieldOptions::default();
        assert!(options.show && options.wrap && options.remove && options.revert && options.info);
    }

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let options = FieldOptions {
            wrap: false,
            info: false,
            ..Default::default()
        };
        assert!(options.show);
        assert!(!options.wrap);
        assert!(options.remove);
        assert!(options.revert);
        assert!(!options.info);
    }
}
