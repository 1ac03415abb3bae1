//! geeklife - a terminal task manager.
//!
//! Layout:
//! - app: focus routing, modal overlays, rendering and the event loop
//! - panes: the project, task and detail panes
//! - keymap: configured key names resolved into bindings
//! - config / cli: settings file and command-line overrides
//! - storage / runtime: the JSON database and the effects that reach it
//! - tui: terminal setup and teardown

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod keymap;
pub mod models;
pub mod panes;
pub mod runtime;
pub mod storage;
pub mod tui;
