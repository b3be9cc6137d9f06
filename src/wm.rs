//! Window manager: the only owner of the window collection.
//!
//! Focus is exclusive: opening or focusing a window unfocuses every other one. Closing or
//! minimizing the focused window leaves nothing focused. Stacking order follows the order in
//! which windows last gained focus, never their position in the collection.

use crate::error::InvariantViolation;
use crate::window::{Position, Window, WindowId, WindowKind};
use std::collections::HashSet;

/// Placement of the first window; later ones cascade diagonally from here.
pub const CASCADE_ORIGIN: Position = Position { x: 80, y: 40 };
/// Per-window cascade offset in pixels.
pub const CASCADE_STEP: i32 = 25;

pub struct WindowManager {
    windows: Vec<Window>,
    next_window_id: WindowId,
    focus_counter: u64,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowManager {
    pub fn new() -> Self {
        WindowManager {
            windows: Vec::new(),
            next_window_id: 1,
            focus_counter: 0,
        }
    }

    /// Open a window of `kind`, or bring forward the live one if the kind is exclusive.
    pub fn open(&mut self, kind: WindowKind, data: serde_json::Value) -> WindowId {
        if kind.exclusive() {
            if let Some(existing) = self.find_kind(kind).map(|w| w.id) {
                log::debug!("{} already open as window {}, focusing it", kind.as_str(), existing);
                self.focus(existing);
                return existing;
            }
        }

        let id = self.next_window_id;
        self.next_window_id += 1;
        let n = self.windows.len() as i32;
        let position = Position::new(
            CASCADE_ORIGIN.x + n * CASCADE_STEP,
            CASCADE_ORIGIN.y + n * CASCADE_STEP,
        );
        for w in &mut self.windows {
            w.focused = false;
        }
        self.focus_counter += 1;
        let mut win = Window::new(id, kind, position, data);
        win.focused = true;
        win.focus_stamp = self.focus_counter;
        self.windows.push(win);
        log::info!("opened {} window {} at ({}, {})", kind.as_str(), id, position.x, position.y);
        self.debug_check();
        id
    }

    /// Remove a window. Closing an unknown or already closed id does nothing.
    pub fn close(&mut self, id: WindowId) -> bool {
        let before = self.windows.len();
        self.windows.retain(|w| w.id != id);
        let removed = self.windows.len() != before;
        if removed {
            log::info!("closed window {}", id);
        }
        removed
    }

    /// Close whichever window holds focus.
    pub fn close_focused(&mut self) -> Option<WindowId> {
        let id = self.focused()?;
        self.close(id);
        Some(id)
    }

    /// Focus a window, restoring it first if it was minimized.
    pub fn focus(&mut self, id: WindowId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.focus_counter += 1;
        let stamp = self.focus_counter;
        for w in &mut self.windows {
            if w.id == id {
                w.focused = true;
                w.minimized = false;
                w.focus_stamp = stamp;
            } else {
                w.focused = false;
            }
        }
        self.debug_check();
        true
    }

    /// Minimize a window. Focus does not move to another window.
    pub fn minimize(&mut self, id: WindowId) -> bool {
        match self.get_mut(id) {
            Some(w) => {
                w.minimized = true;
                w.focused = false;
                true
            }
            None => false,
        }
    }

    /// Drag target. Unknown ids are ignored since drags can race with close.
    pub fn move_window(&mut self, id: WindowId, x: i32, y: i32) -> bool {
        match self.get_mut(id) {
            Some(w) => {
                w.position = Position::new(x, y);
                true
            }
            None => false,
        }
    }

    pub fn maximize(&mut self, id: WindowId) -> bool {
        self.set_maximized(id, true)
    }

    /// Leave the maximized state; the stored position applies again.
    pub fn restore(&mut self, id: WindowId) -> bool {
        self.set_maximized(id, false)
    }

    pub fn toggle_maximize(&mut self, id: WindowId) -> bool {
        match self.get(id).map(|w| w.maximized) {
            Some(maximized) => self.set_maximized(id, !maximized),
            None => false,
        }
    }

    fn set_maximized(&mut self, id: WindowId, maximized: bool) -> bool {
        match self.get_mut(id) {
            Some(w) => {
                w.maximized = maximized;
                if maximized {
                    w.minimized = false;
                }
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == id)
    }

    fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.windows.iter().find(|w| w.focused).map(|w| w.id)
    }

    pub fn find_kind(&self, kind: WindowKind) -> Option<&Window> {
        self.windows.iter().find(|w| w.kind == kind)
    }

    /// Window ids from bottom to top of the stack.
    pub fn z_order(&self) -> Vec<WindowId> {
        let mut order: Vec<&Window> = self.windows.iter().collect();
        order.sort_by_key(|w| (w.focused, w.focus_stamp));
        order.into_iter().map(|w| w.id).collect()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let focused: Vec<WindowId> = self
            .windows
            .iter()
            .filter(|w| w.focused)
            .map(|w| w.id)
            .collect();
        if focused.len() > 1 {
            return Err(InvariantViolation::MultipleFocused(focused));
        }
        let mut ids = HashSet::new();
        let mut kinds = HashSet::new();
        for w in &self.windows {
            if !ids.insert(w.id) {
                return Err(InvariantViolation::DuplicateId(w.id));
            }
            if w.kind.exclusive() && !kinds.insert(w.kind) {
                return Err(InvariantViolation::DuplicateExclusive(w.kind));
            }
        }
        Ok(())
    }

    fn debug_check(&self) {
        debug_assert_eq!(self.check_invariants(), Ok(()));
    }
}
