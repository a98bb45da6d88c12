/// Which content layer the host should be drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// The slide grid, with `focused` drawn highlighted.
    Slides { focused: usize },
    /// The outline list.
    Outline,
}

/// Counter and control state pushed to the host after every navigation change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationStatus {
    /// 1-based index of the current slide, 0 for an empty deck.
    pub current: usize,
    pub total: usize,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub overview: bool,
}

impl NavigationStatus {
    pub fn new(current_slide: usize, total: usize, overview: bool) -> Self {
        Self {
            current: if total > 0 { current_slide + 1 } else { 0 },
            total,
            prev_enabled: current_slide > 0,
            next_enabled: current_slide + 1 < total,
            overview,
        }
    }

    pub fn counter_label(&self) -> String {
        format!("Slide {} of {}", self.current, self.total)
    }
}

/// Surface through which the presenter talks to its host UI.
pub trait HostUi {
    fn show_status(&mut self, status: &NavigationStatus);

    fn set_title(&mut self, title: &str);

    /// The active layer changed or needs redrawing.
    fn render_layer(&mut self, _layer: Layer) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_deck_status() {
        let status = NavigationStatus::new(0, 0, false);
        assert_eq!(status.current, 0);
        assert!(!status.prev_enabled);
        assert!(!status.next_enabled);
        assert_eq!(status.counter_label(), "Slide 0 of 0");
    }

    #[test]
    fn test_middle_slide_status() {
        let status = NavigationStatus::new(1, 3, true);
        assert_eq!(status.counter_label(), "Slide 2 of 3");
        assert!(status.prev_enabled);
        assert!(status.next_enabled);
        assert!(status.overview);
    }

    #[test]
    fn test_last_slide_disables_next() {
        let status = NavigationStatus::new(2, 3, false);
        assert!(status.prev_enabled);
        assert!(!status.next_enabled);
    }
}
