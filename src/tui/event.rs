//! Keyboard event handling for the TUI.
//!
//! Maps crossterm keyboard events to actions on the controller's documented
//! operations. The search box is always focused, so plain characters edit the
//! input buffer and the remaining bindings all carry a modifier or are
//! non-character keys.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::App;

/// What the event loop should do in response to a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No controller operation needed (input edit or ignored key)
    None,
    /// Submit the current input buffer as a query
    Dispatch(String),
    /// Toggle the chat (history) surface
    ToggleChat,
    /// Dismiss whichever surface is visible
    DismissSurfaces,
    /// Exit the application
    Quit,
}

/// Handles a keyboard event, editing the input buffer in place and returning
/// the action the event loop should take.
///
/// # Bindings
///
/// - `Enter`: dispatch the input buffer
/// - `Ctrl+K`: clear the search input (focus-search shortcut)
/// - `Esc`: dismiss the chat/results surfaces
/// - `Tab`: toggle the chat surface
/// - `Up`/`Down`: scroll the results surface
/// - `Ctrl+C`: quit
/// - anything else printable: edit the input buffer
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if key.code == KeyCode::Char('k') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.clear_input();
        return Action::None;
    }

    match key.code {
        KeyCode::Enter => Action::Dispatch(app.input().to_string()),
        KeyCode::Esc => Action::DismissSurfaces,
        KeyCode::Tab => Action::ToggleChat,
        KeyCode::Up => {
            app.scroll_results_up(1);
            Action::None
        }
        KeyCode::Down => {
            app.scroll_results_down(1);
            Action::None
        }
        KeyCode::Backspace => {
            app.pop_input_char();
            Action::None
        }
        KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            app.push_input_char(c);
            Action::None
        }
        _ => Action::None,
    }
}
