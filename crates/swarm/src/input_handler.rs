//! Turn parsed input events into things the app should do.

use crate::config::input::{KeybindingAction, KeybindingsAsEvents};
use crate::simulation::mode::SimulationMode;

/// Something the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    /// Switch the simulation mode.
    SetMode(SimulationMode),
    /// Remove every particle.
    Clear,
    /// Exit the app.
    Quit,
    /// The mouse moved onto a new cell.
    PointerMoved {
        /// Zero-based column
        column: usize,
        /// Zero-based row
        row: usize,
    },
    /// The left mouse button was pressed.
    PointerClicked {
        /// Zero-based column
        column: usize,
        /// Zero-based row
        row: usize,
    },
}

/// Tracks just enough mouse state to tell moves and clicks apart.
pub(crate) struct InputHandler {
    /// All the active keybindings.
    keybindings: KeybindingsAsEvents,
    /// The mouse buttons held down in the previous mouse event.
    last_buttons: termwiz::input::MouseButtons,
    /// The last cell the mouse was seen on.
    last_position: Option<(usize, usize)>,
}

impl InputHandler {
    /// Instantiate
    #[must_use]
    pub fn new(keybindings: KeybindingsAsEvents) -> Self {
        Self {
            keybindings,
            last_buttons: termwiz::input::MouseButtons::NONE,
            last_position: None,
        }
    }

    /// Use new keybindings, say after the config has been edited.
    pub fn set_keybindings(&mut self, keybindings: KeybindingsAsEvents) {
        self.keybindings = keybindings;
    }

    /// Work out what, if anything, an input event means.
    pub fn handle(&mut self, event: &termwiz::input::InputEvent) -> Vec<Action> {
        match event {
            termwiz::input::InputEvent::Key(key_event) => {
                self.handle_key_event(key_event).into_iter().collect()
            }
            termwiz::input::InputEvent::Mouse(mouse_event) => self.handle_mouse_event(mouse_event),
            termwiz::input::InputEvent::PixelMouse(_)
            | termwiz::input::InputEvent::Resized { .. }
            | termwiz::input::InputEvent::Paste(_)
            | termwiz::input::InputEvent::Wake => Vec::new(),
        }
    }

    /// Handle a key event that we have a keybinding for.
    fn handle_key_event(&self, key_event: &termwiz::input::KeyEvent) -> Option<Action> {
        let is_ctrl_c = key_event.key == termwiz::input::KeyCode::Char('c')
            && key_event.modifiers == termwiz::input::Modifiers::CTRL;
        if is_ctrl_c {
            return Some(Action::Quit);
        }

        let trigger = self
            .keybindings
            .iter()
            .find_map(|(action, binding)| (binding == key_event).then_some(*action))?;
        tracing::trace!("Keybinding triggered: {trigger:?}");

        Some(match trigger {
            KeybindingAction::Clear => Action::Clear,
            KeybindingAction::Quit => Action::Quit,
            KeybindingAction::Trails
            | KeybindingAction::Gravity
            | KeybindingAction::Attraction
            | KeybindingAction::Repulsion => Action::SetMode(trigger.mode()?),
        })
    }

    /// Mouse coordinates from the terminal are 1-based. A left button that wasn't down in the
    /// previous event is a click, and any change of cell is a move.
    fn handle_mouse_event(&mut self, mouse_event: &termwiz::input::MouseEvent) -> Vec<Action> {
        let mut actions = Vec::new();
        let column = usize::from(mouse_event.x.saturating_sub(1));
        let row = usize::from(mouse_event.y.saturating_sub(1));

        let left = termwiz::input::MouseButtons::LEFT;
        let is_left_down = mouse_event.mouse_buttons.contains(left.clone());
        let was_left_down = self.last_buttons.contains(left);
        self.last_buttons = mouse_event.mouse_buttons.clone();

        if self.last_position != Some((column, row)) {
            self.last_position = Some((column, row));
            actions.push(Action::PointerMoved { column, row });
        }

        if is_left_down && !was_left_down {
            actions.push(Action::PointerClicked { column, row });
        }

        actions
    }
}
