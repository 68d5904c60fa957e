//! Keyboard selection over the result list.
//!
//! A new result set starts with the first item active. ArrowDown/ArrowUp move
//! the active item without wrapping and Enter opens it.

/// Keys the search box reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Other,
}

impl Key {
    pub fn parse(name: &str) -> Key {
        match name {
            "down" | "ArrowDown" => Key::ArrowDown,
            "up" | "ArrowUp" => Key::ArrowUp,
            "enter" | "Enter" => Key::Enter,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Selected(usize),
}

/// What a keystroke did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not ours; the input keeps its native behavior
    Ignored,
    /// Handled, nothing changed
    Unchanged,
    Moved(usize),
    /// Navigate to the result at this index
    Open(usize),
}

impl KeyOutcome {
    pub fn prevent_default(&self) -> bool {
        !matches!(self, KeyOutcome::Ignored)
    }
}

impl Selection {
    /// Selection for a freshly computed result set
    pub fn initial(count: usize) -> Self {
        if count > 0 {
            Selection::Selected(0)
        } else {
            Selection::None
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Selection::None => None,
            Selection::Selected(i) => Some(*i),
        }
    }

    pub fn handle(&mut self, key: Key, count: usize) -> KeyOutcome {
        if count == 0 || key == Key::Other {
            return KeyOutcome::Ignored;
        }

        match (key, *self) {
            (Key::ArrowDown, Selection::None) => {
                *self = Selection::Selected(0);
                KeyOutcome::Moved(0)
            }
            (Key::ArrowDown, Selection::Selected(i)) if i + 1 < count => {
                *self = Selection::Selected(i + 1);
                KeyOutcome::Moved(i + 1)
            }
            (Key::ArrowUp, Selection::Selected(i)) if i > 0 => {
                *self = Selection::Selected(i - 1);
                KeyOutcome::Moved(i - 1)
            }
            (Key::Enter, Selection::Selected(i)) => KeyOutcome::Open(i),
            _ => KeyOutcome::Unchanged,
        }
    }
}

/// Visible window of the results container, in rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub scroll_offset: usize,
    pub visible_rows: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            scroll_offset: 0,
            visible_rows: 8,
        }
    }
}

impl Viewport {
    /// Scroll just enough to bring `index` into view
    pub fn ensure_visible(&mut self, index: usize) {
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if self.visible_rows > 0 && index >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = index + 1 - self.visible_rows;
        }
    }

    pub fn reset(&mut self) {
        self.scroll_offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_result_set_selects_first() {
        assert_eq!(Selection::initial(3), Selection::Selected(0));
        assert_eq!(Selection::initial(0), Selection::None);
    }

    #[test]
    fn down_stops_at_last() {
        let mut sel = Selection::initial(2);
        assert_eq!(sel.handle(Key::ArrowDown, 2), KeyOutcome::Moved(1));
        assert_eq!(sel.handle(Key::ArrowDown, 2), KeyOutcome::Unchanged);
        assert_eq!(sel, Selection::Selected(1));
    }

    #[test]
    fn up_stops_at_first() {
        let mut sel = Selection::Selected(1);
        assert_eq!(sel.handle(Key::ArrowUp, 3), KeyOutcome::Moved(0));
        assert_eq!(sel.handle(Key::ArrowUp, 3), KeyOutcome::Unchanged);
        assert_eq!(sel, Selection::Selected(0));
    }

    #[test]
    fn up_without_selection_is_noop() {
        let mut sel = Selection::None;
        let outcome = sel.handle(Key::ArrowUp, 3);
        assert_eq!(outcome, KeyOutcome::Unchanged);
        assert!(outcome.prevent_default());
        assert_eq!(sel, Selection::None);
    }

    #[test]
    fn enter_opens_selected_only() {
        let mut sel = Selection::Selected(2);
        assert_eq!(sel.handle(Key::Enter, 3), KeyOutcome::Open(2));
        let mut none = Selection::None;
        assert_eq!(none.handle(Key::Enter, 3), KeyOutcome::Unchanged);
    }

    #[test]
    fn keys_are_ignored_without_results() {
        let mut sel = Selection::None;
        for key in [Key::ArrowDown, Key::ArrowUp, Key::Enter] {
            let outcome = sel.handle(key, 0);
            assert_eq!(outcome, KeyOutcome::Ignored);
            assert!(!outcome.prevent_default());
        }
    }

    #[test]
    fn other_keys_pass_through() {
        let mut sel = Selection::Selected(0);
        assert_eq!(sel.handle(Key::Other, 3), KeyOutcome::Ignored);
    }

    #[test]
    fn index_never_leaves_bounds() {
        let count = 4;
        let mut sel = Selection::initial(count);
        for _ in 0..10 {
            sel.handle(Key::ArrowDown, count);
        }
        assert_eq!(sel.index(), Some(count - 1));
        for _ in 0..10 {
            sel.handle(Key::ArrowUp, count);
        }
        assert_eq!(sel.index(), Some(0));
    }

    #[test]
    fn viewport_scrolls_only_when_needed() {
        let mut view = Viewport {
            scroll_offset: 0,
            visible_rows: 3,
        };
        view.ensure_visible(2);
        assert_eq!(view.scroll_offset, 0);
        view.ensure_visible(3);
        assert_eq!(view.scroll_offset, 1);
        view.ensure_visible(0);
        assert_eq!(view.scroll_offset, 0);
    }
}
