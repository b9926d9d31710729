//! Main menu

use crate::platform::InputSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Start,
    Exit,
}

impl MenuItem {
    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Start => "start",
            MenuItem::Exit => "exit",
        }
    }
}

/// Vertical list with a cyclic selection
#[derive(Debug, Clone)]
pub struct Menu {
    items: [MenuItem; 2],
    selected: usize,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu {
    pub fn new() -> Self {
        Self {
            items: [MenuItem::Start, MenuItem::Exit],
            selected: 0,
        }
    }

    /// Move the selection on a fresh up/down press
    pub fn handle_input(&mut self, pressed: &InputSnapshot) {
        let len = self.items.len();
        if pressed.down {
            self.selected = (self.selected + 1) % len;
        }
        if pressed.up {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    /// The chosen item when enter was pressed
    pub fn handle_return(&self, pressed: &InputSnapshot) -> Option<MenuItem> {
        pressed.enter.then(|| self.selected_item())
    }

    pub fn selected_item(&self) -> MenuItem {
        self.items[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }
}
