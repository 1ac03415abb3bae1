//! The terminal event loop.

use std::io;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use super::render::render;
use super::App;
use crate::core::event::InputEvent;
use crate::runtime::AppMessage;
use crate::tui::{install_termination_signals, TerminalGuard};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs until the app asks to quit, a termination signal arrives, or the
/// terminal fails. The terminal is restored on every exit path.
pub fn run(app: &mut App, messages: Receiver<AppMessage>) -> io::Result<()> {
    let guard = TerminalGuard::new()?;
    let (signal_tx, signal_rx) = mpsc::channel();
    if let Err(err) = install_termination_signals(guard.restorer(), signal_tx) {
        tracing::warn!(error = %err, "signal handlers unavailable");
    }

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;

    let mut disconnected = false;
    loop {
        if let Ok(signal) = signal_rx.try_recv() {
            tracing::info!(?signal, "shutting down on signal");
            break;
        }
        if !disconnected && drain_messages(app, &messages) {
            tracing::warn!("storage worker disconnected");
            disconnected = true;
        }
        if app.should_quit() {
            break;
        }

        let area = terminal.draw(|frame| render(app, frame))?.area;
        app.set_viewport(area);

        if crossterm::event::poll(POLL_INTERVAL)? {
            let event = InputEvent::from(crossterm::event::read()?);
            app.handle_input(event);
        }
    }

    drop(terminal);
    drop(guard);
    Ok(())
}

/// Applies every pending storage reply. Returns `true` once the sender side
/// is gone.
fn drain_messages(app: &mut App, messages: &Receiver<AppMessage>) -> bool {
    loop {
        match messages.try_recv() {
            Ok(message) => app.on_message(message),
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => return true,
        }
    }
}
