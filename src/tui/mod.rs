//! Terminal setup and teardown.

pub mod terminal_guard;

pub use terminal_guard::{
    install_termination_signals, TerminalGuard, TerminalRestorer, TerminationSignal,
};
