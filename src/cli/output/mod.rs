pub mod bars;
pub mod todo;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SCREEN_WIDTH: usize = 100;
pub const MIN_SCREEN_WIDTH: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ViewConfig {
    pub screen_width: Option<usize>,
    /// Top level label value to zoom into.
    pub focus_group: Option<String>,
}

impl ViewConfig {
    pub fn screen_width(&self) -> usize {
        self.screen_width
            .map_or(DEFAULT_SCREEN_WIDTH, |v| v.max(MIN_SCREEN_WIDTH))
    }

    pub fn focus_group(&self) -> Option<&str> {
        self.focus_group.as_deref().filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::ViewConfig;

    #[test]
    fn test_screen_width_bounds() {
        assert_eq!(ViewConfig::default().screen_width(), 100);
        let narrow = ViewConfig {
            screen_width: Some(3),
            ..Default::default()
        };
        assert_eq!(narrow.screen_width(), 20);
    }

    #[test]
    fn test_empty_focus_is_no_focus() {
        let view = ViewConfig {
            focus_group: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(view.focus_group(), None);
    }
}
