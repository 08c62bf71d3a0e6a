//! Terminal user interface for kbq.
//!
//! A single search box over two mutually exclusive surfaces (results and
//! chat history) plus a loading spinner and a transient error toast, using
//! ratatui for rendering and crossterm for terminal management. All behavior
//! flows through the controller's documented operations; this module only
//! wires key bindings to them and paints what the controller recorded.

use std::io;
use std::panic;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self as crossterm_event, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::backend::BackendClientBuilder;
use crate::controller::{
    DispatchOutcome, DisplayState, ERROR_TOAST_MS, QueryController, RenderTarget,
};

mod app;
pub mod event;
mod ui;

pub use app::App;

use event::Action;

/// Initializes the terminal for TUI rendering.
///
/// Enables raw mode and enters the alternate screen.
///
/// # Errors
///
/// Returns an error if terminal initialization fails.
fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// Disables raw mode and leaves the alternate screen. Always called before
/// exiting, even in error cases, to prevent terminal corruption.
///
/// # Errors
///
/// Returns an error if terminal restoration fails.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Minimal terminal restoration for the panic handler.
///
/// Does not require a Terminal reference, making it safe to call from a
/// panic hook. Ignores errors since we're likely already in a bad state.
fn restore_terminal_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Installs a panic hook that restores the terminal before panicking.
///
/// The original panic hook is preserved and called after restoration.
fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_panic();
        original_hook(panic_info);
    }));
}

/// Runs the main event loop for the TUI.
///
/// Polls for keyboard events, maps them to controller operations, and
/// re-renders. Exits on Ctrl+C or when an error occurs.
///
/// # Errors
///
/// Returns an error if event polling, rendering, or terminal operations
/// fail. Terminal state is always restored, even on error.
pub fn run_event_loop(app: &mut App, controller: &mut QueryController) -> Result<()> {
    let mut terminal = init_terminal()?;

    let result = run_event_loop_internal(app, controller, &mut terminal);

    if let Err(e) = restore_terminal(&mut terminal) {
        eprintln!("Error restoring terminal: {e}");
    }

    result
}

/// Internal event loop implementation.
///
/// Separated from `run_event_loop` to ensure terminal restoration happens in
/// the outer function.
fn run_event_loop_internal(
    app: &mut App,
    controller: &mut QueryController,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            ui::draw(frame, app, controller);
        })?;

        // Auto-dismiss the error toast after its timeout has elapsed
        if controller.should_dismiss_error(ERROR_TOAST_MS) {
            controller.dismiss_error();
            app.clear_error();
        }

        if crossterm_event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = crossterm_event::read()?
        {
            match event::handle_key_event(app, key) {
                Action::Quit => break,
                Action::Dispatch(query) => {
                    // Dispatch blocks for the round-trip (or the fallback's
                    // simulated latency), so paint the spinner frame first.
                    if !query.trim().is_empty() {
                        app.render_loading();
                        terminal.draw(|frame| {
                            ui::draw(frame, app, controller);
                        })?;
                    }

                    if controller.dispatch(&query, app) == DispatchOutcome::Answered {
                        app.clear_input();
                    }
                }
                Action::ToggleChat => {
                    if controller.state() == DisplayState::ShowingChat {
                        controller.hide_chat();
                    } else {
                        controller.show_chat();
                    }
                }
                Action::DismissSurfaces => {
                    controller.reset_view();
                    app.clear_error();
                }
                Action::None => {}
            }
        }
    }

    Ok(())
}

/// Entry point for the TUI application.
///
/// Builds the backend client, the controller, and the presentation state,
/// then starts the event loop.
///
/// # Errors
///
/// Returns an error if the backend URL is invalid or if terminal setup or
/// the event loop fails.
pub fn run(api_url: Option<String>) -> Result<()> {
    init_panic_hook();

    let mut builder = BackendClientBuilder::new();
    if let Some(url) = api_url {
        builder = builder.base_url(url);
    }
    let client = builder.build().context("Failed to create backend client")?;

    let mut controller = QueryController::new(Arc::new(client));
    let mut app = App::new();

    run_event_loop(&mut app, &mut controller).context("TUI event loop failed")?;

    Ok(())
}
