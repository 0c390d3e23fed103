use std::cell::RefCell;
use std::rc::Rc;

use crate::types::AgentId;

/// Read access to the application state the input core consults.
pub trait StateAccessor {
    fn selected_agents(&self) -> Vec<AgentId>;

    fn drawing_mode_active(&self) -> bool {
        false
    }

    fn building_drag_enabled(&self) -> bool {
        true
    }

    /// Flag the application keeps for its terminal overlay.
    fn terminal_open(&self) -> bool {
        false
    }

    /// Whether the terminal overlay is actually on screen.
    fn terminal_visible(&self) -> bool {
        false
    }

    fn set_terminal_open(&mut self, _open: bool) {}
}

impl<T: StateAccessor> StateAccessor for Rc<RefCell<T>> {
    fn selected_agents(&self) -> Vec<AgentId> {
        self.borrow().selected_agents()
    }

    fn drawing_mode_active(&self) -> bool {
        self.borrow().drawing_mode_active()
    }

    fn building_drag_enabled(&self) -> bool {
        self.borrow().building_drag_enabled()
    }

    fn terminal_open(&self) -> bool {
        self.borrow().terminal_open()
    }

    fn terminal_visible(&self) -> bool {
        self.borrow().terminal_visible()
    }

    fn set_terminal_open(&mut self, open: bool) {
        self.borrow_mut().set_terminal_open(open);
    }
}

/// Fixed state for tests and tools without a live store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticState {
    pub selected: Vec<AgentId>,
    pub drawing: bool,
    pub building_drag_disabled: bool,
    pub terminal_open: bool,
    pub terminal_visible: bool,
}

impl StaticState {
    pub fn with_selection(selected: Vec<AgentId>) -> Self {
        Self {
            selected,
            ..Self::default()
        }
    }
}

impl StateAccessor for StaticState {
    fn selected_agents(&self) -> Vec<AgentId> {
        self.selected.clone()
    }

    fn drawing_mode_active(&self) -> bool {
        self.drawing
    }

    fn building_drag_enabled(&self) -> bool {
        !self.building_drag_disabled
    }

    fn terminal_open(&self) -> bool {
        self.terminal_open
    }

    fn terminal_visible(&self) -> bool {
        self.terminal_visible
    }

    fn set_terminal_open(&mut self, open: bool) {
        self.terminal_open = open;
    }
}
