pub const SHOW_HINT_LABEL: &str = "🤯 I need a hint!";
pub const HIDE_HINT_LABEL: &str = "Hide hints 😃";

/// Word list shown on demand next to the grid. Hidden until first toggled.
#[derive(Debug, Clone, Default)]
pub struct HintPanel {
    words: Vec<String>,
    visible: bool,
}

impl HintPanel {
    pub fn new(words: Vec<String>) -> Self {
        Self {
            words,
            visible: false,
        }
    }

    /// Label of the toggle button for the current state.
    pub fn label(&self) -> &'static str {
        if self.visible {
            HIDE_HINT_LABEL
        } else {
            SHOW_HINT_LABEL
        }
    }

    /// Flips visibility and returns the new button label.
    pub fn toggle(&mut self) -> &'static str {
        self.visible = !self.visible;
        self.label()
    }

    pub fn visible_words(&self) -> Option<&[String]> {
        self.visible.then_some(self.words.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_hidden_and_toggles_labels() {
        let mut panel = HintPanel::new(vec!["BEAM".into(), "LIGHT".into()]);
        assert_eq!(panel.label(), SHOW_HINT_LABEL);
        assert_eq!(panel.visible_words(), None);

        assert_eq!(panel.toggle(), HIDE_HINT_LABEL);
        assert_eq!(
            panel.visible_words(),
            Some(&["BEAM".to_string(), "LIGHT".to_string()][..])
        );

        assert_eq!(panel.toggle(), SHOW_HINT_LABEL);
        assert_eq!(panel.visible_words(), None);
    }
}
