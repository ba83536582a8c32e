use std::collections::HashMap;

/// Arrow image of a hidden panel
pub const HIDDEN_ARROW: &str = "harrow.png";
/// Arrow image of a shown panel
pub const SHOWN_ARROW: &str = "varrow.png";

/// A collapsible panel and its arrow image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub displayed: bool,
    /// Source URL of the arrow image next to the panel title
    pub arrow_src: String,
}

/// Collapsible panels of a page, keyed by element id
#[derive(Debug, Clone, Default)]
pub struct CollapsiblePanels {
    panels: HashMap<String, Panel>,
}

impl CollapsiblePanels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a panel
    pub fn insert(&mut self, id: impl Into<String>, displayed: bool, arrow_src: impl Into<String>) {
        self.panels.insert(
            id.into(),
            Panel {
                displayed,
                arrow_src: arrow_src.into(),
            },
        );
    }

    pub fn get(&self, id: &str) -> Option<&Panel> {
        self.panels.get(id)
    }

    /// Show a hidden panel or hide a shown one, swapping its arrow image
    ///
    /// Returns the new display state, or None if there is no such panel.
    pub fn switch_display(&mut self, id: &str) -> Option<bool> {
        let panel = self.panels.get_mut(id)?;

        let (from, to) = if panel.displayed {
            (SHOWN_ARROW, HIDDEN_ARROW)
        } else {
            (HIDDEN_ARROW, SHOWN_ARROW)
        };
        panel.displayed = !panel.displayed;
        panel.arrow_src = panel.arrow_src.replacen(from, to, 1);

        tracing::trace!("switch_display {} -> {}", id, panel.displayed);
        Some(panel.displayed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_panels() -> CollapsiblePanels {
        let mut panels = CollapsiblePanels::new();
        panels.insert("details", false, "http://host/@@/harrow.png");
        panels.insert("source", true, "http://host/@@/varrow.png");
        panels
    }

    #[test]
    fn test_show_hidden_panel() {
        let mut panels = create_panels();

        assert_eq!(panels.switch_display("details"), Some(true));

        let panel = panels.get("details").unwrap();
        assert!(panel.displayed);
        assert_eq!(panel.arrow_src, "http://host/@@/varrow.png");
    }

    #[test]
    fn test_hide_shown_panel() {
        let mut panels = create_panels();

        assert_eq!(panels.switch_display("source"), Some(false));

        let panel = panels.get("source").unwrap();
        assert!(!panel.displayed);
        assert_eq!(panel.arrow_src, "http://host/@@/harrow.png");
    }

    #[test]
    fn test_switch_twice_restores_state() {
        let mut panels = create_panels();
        let before = panels.get("details").cloned();

        panels.switch_display("details");
        panels.switch_display("details");

        assert_eq!(panels.get("details").cloned(), before);
    }

    #[test]
    fn test_only_first_arrow_name_is_swapped() {
        let mut panels = CollapsiblePanels::new();
        panels.insert("odd", false, "http://host/harrow.png/@@/harrow.png");

        panels.switch_display("odd");

        assert_eq!(
            panels.get("odd").unwrap().arrow_src,
            "http://host/varrow.png/@@/harrow.png"
        );
    }

    #[test]
    fn test_unknown_panel_is_ignored() {
        let mut panels = create_panels();
        assert_eq!(panels.switch_display("missing"), None);
    }
}
